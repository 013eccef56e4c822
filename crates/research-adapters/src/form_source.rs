//! Fuente de datos de un paso de formulario.
//!
//! Convierte un `FormUiStep` en secciones y grupos de ítems, traduce entre
//! índice plano de fila e `IndexPath`, guarda las respuestas del
//! participante y las entrega como `CollectionResult`.
//!
//! Reglas de secciones:
//! - un campo de elección con más de una opción ocupa una sección exclusiva
//!   titulada con su `prompt` / `prompt_detail`;
//! - el resto de los campos comparte la última sección no exclusiva.
use chrono::{DateTime, Utc};
use log::{debug, error, warn};
use research_domain::{AnswerValue, DomainError, FormUiStep, InputField, InputUiHint, Step};
use research_sdk::{AnswerResult, CollectionResult, ResultBase};
use std::collections::BTreeMap;

use crate::items::{FormItem, FormSection, IndexPath, ItemGroup};

/// Resultado de `select_choice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOutcome {
    pub is_selected: bool,
    /// Otras filas del grupo cambiaron y deben redibujarse.
    pub reload: bool,
}

#[derive(Debug, Clone)]
pub struct FormDataSource {
    step_identifier: String,
    sections: Vec<FormSection>,
    item_groups: Vec<ItemGroup>,
}

/// Hint de UI a usar para `field`.
///
/// El hint propio del campo tiene prioridad; sin hint, los campos de elección
/// usan `list` y el resto `textfield`. Un hint desconocido en un campo de
/// elección se muestra como `list`.
pub fn preferred_ui_hint(field: &InputField) -> &str {
    match field.ui_hint() {
        Some(hint) if field.data_type().is_choice() && !InputUiHint::is_standard(hint) => {
            warn!("form_source:ui_hint unsupported hint={hint} field={:?}; using list", field.identifier());
            InputUiHint::LIST
        }
        Some(hint) => hint,
        None if field.data_type().is_choice() => InputUiHint::LIST,
        None => InputUiHint::TEXTFIELD,
    }
}

impl FormDataSource {
    pub fn new(step: &dyn Step) -> Self {
        let step_identifier = step.identifier().to_string();
        let Some(form) = step.downcast_ref::<FormUiStep>() else {
            error!("form_source:new step={} type={} is not a form step", step_identifier, step.step_type());
            return FormDataSource { step_identifier,
                                    sections: Vec::new(),
                                    item_groups: Vec::new() };
        };

        let mut sections: Vec<FormSection> = Vec::new();
        let mut item_groups = Vec::with_capacity(form.input_fields().len());
        for (position, field) in form.input_fields().iter().enumerate() {
            let needs_exclusive = field.data_type().is_choice() && field.choices().len() > 1;
            let reuse_last = !needs_exclusive && sections.last().is_some_and(|s| !s.exclusive);
            if !reuse_last {
                let mut section = FormSection::new(sections.len(), needs_exclusive);
                if needs_exclusive {
                    section.title = field.prompt().map(str::to_string);
                    section.subtitle = field.prompt_detail().map(str::to_string);
                }
                sections.push(section);
            }
            let section_index = sections.len() - 1;
            let section = &mut sections[section_index];
            let identifier = field.identifier().map(str::to_string).unwrap_or_else(|| position.to_string());
            let group = ItemGroup::build(identifier, field, preferred_ui_hint(field), section_index, section.row_count);
            section.row_count += group.items().len();
            item_groups.push(group);
        }
        debug!("form_source:new step={} sections={} groups={}",
               step_identifier,
               sections.len(),
               item_groups.len());
        FormDataSource { step_identifier,
                         sections,
                         item_groups }
    }

    pub fn step_identifier(&self) -> &str {
        &self.step_identifier
    }

    pub fn sections(&self) -> &[FormSection] {
        &self.sections
    }

    pub fn item_groups(&self) -> &[ItemGroup] {
        &self.item_groups
    }

    /// Total de filas en todas las secciones.
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.row_count).sum()
    }

    pub fn index_path(&self, flat_index: usize) -> Option<IndexPath> {
        let mut offset = 0;
        for section in &self.sections {
            if flat_index < offset + section.row_count {
                return Some(IndexPath::new(section.index, flat_index - offset));
            }
            offset += section.row_count;
        }
        warn!("form_source:index_path out of range index={flat_index} count={offset}");
        None
    }

    pub fn flat_index(&self, path: IndexPath) -> Option<usize> {
        let Some(section) = self.sections.get(path.section) else {
            warn!("form_source:flat_index section={} out of range sections={}",
                  path.section,
                  self.sections.len());
            return None;
        };
        if path.row >= section.row_count {
            warn!("form_source:flat_index row={} out of range rows={}", path.row, section.row_count);
            return None;
        }
        let before: usize = self.sections[..path.section].iter().map(|s| s.row_count).sum();
        Some(before + path.row)
    }

    pub fn item(&self, flat_index: usize) -> Option<&FormItem> {
        self.index_path(flat_index).and_then(|path| self.item_at(path))
    }

    pub fn item_at(&self, path: IndexPath) -> Option<&FormItem> {
        self.item_group(path).and_then(|group| group.item_at(path))
    }

    pub fn item_group(&self, path: IndexPath) -> Option<&ItemGroup> {
        self.item_groups.iter().find(|g| g.contains(path))
    }

    pub fn item_group_for_field(&self, identifier: &str) -> Option<&ItemGroup> {
        self.item_groups.iter().find(|g| g.identifier() == identifier)
    }

    /// Marca o desmarca la opción en `path`.
    ///
    /// En elección simple seleccionar una opción desmarca las demás; una
    /// opción exclusiva desmarca el resto y una no exclusiva desmarca las
    /// exclusivas.
    ///
    /// # Errores
    /// `DomainError::InvalidArgument` si `path` no apunta a una opción.
    pub fn select_choice(&mut self, path: IndexPath, selected: bool) -> Result<SelectOutcome, DomainError> {
        let Some(group) = self.item_groups.iter_mut().find(|g| g.contains(path)) else {
            return Err(DomainError::invalid_argument(format!("no item at {path:?}")));
        };
        if !group.is_choice() {
            return Err(DomainError::invalid_argument(format!("item at {path:?} is not a choice")));
        }
        let offset = path.row - group.beginning_row();
        let reload = group.toggle_choice(offset, selected);
        debug!("form_source:select_choice step={} group={} selected={} reload={}",
               self.step_identifier,
               group.identifier(),
               selected,
               reload);
        Ok(SelectOutcome { is_selected: selected,
                           reload })
    }

    /// Respuesta de un campo de entrada libre.
    ///
    /// # Errores
    /// `DomainError::InvalidArgument` si el campo no existe o es de elección.
    pub fn set_answer(&mut self, field_identifier: &str, answer: impl Into<AnswerValue>) -> Result<(), DomainError> {
        let group = self.text_group_mut(field_identifier)?;
        group.set_answer(Some(answer.into()));
        Ok(())
    }

    pub fn clear_answer(&mut self, field_identifier: &str) -> Result<(), DomainError> {
        let group = self.text_group_mut(field_identifier)?;
        group.set_answer(None);
        Ok(())
    }

    fn text_group_mut(&mut self, field_identifier: &str) -> Result<&mut ItemGroup, DomainError> {
        let group = self.item_groups
                        .iter_mut()
                        .find(|g| g.identifier() == field_identifier)
                        .ok_or_else(|| DomainError::invalid_argument(format!("unknown input field `{field_identifier}`")))?;
        if group.is_choice() {
            return Err(DomainError::invalid_argument(format!("input field `{field_identifier}` expects a choice selection")));
        }
        Ok(group)
    }

    /// `true` si todo campo no opcional tiene respuesta.
    pub fn all_answers_valid(&self) -> bool {
        self.item_groups.iter().all(|g| g.input_field().is_optional() || g.answer().is_some())
    }

    /// Respuestas actuales indexadas por identificador de campo.
    pub fn answers(&self) -> BTreeMap<&str, &AnswerValue> {
        self.item_groups
            .iter()
            .filter_map(|g| g.answer().map(|a| (g.identifier(), a)))
            .collect()
    }

    /// Resultado del formulario: un `AnswerResult` por campo respondido, en
    /// el orden de los campos.
    pub fn collection_result(&self,
                             start_date: DateTime<Utc>,
                             end_date: DateTime<Utc>)
                             -> Result<CollectionResult, DomainError> {
        let mut collection = CollectionResult::new(self.step_identifier.clone(), start_date, end_date, Vec::new())?;
        for group in &self.item_groups {
            let Some(answer) = group.answer() else { continue };
            let base = ResultBase::identified(group.identifier(), start_date, end_date)?;
            collection.append_input_result(Box::new(AnswerResult::from_base(base, answer.clone(), BTreeMap::new())));
        }
        Ok(collection)
    }
}
