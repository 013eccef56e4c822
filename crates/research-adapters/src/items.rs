//! Ítems, grupos y secciones que presenta un formulario.
//!
//! Un `ItemGroup` corresponde a un `InputField` y agrupa las filas que lo
//! representan: una por opción en campos de elección, una sola fila de
//! entrada de texto en el resto. Las secciones sólo cuentan filas; los
//! ítems viven en sus grupos.
use research_domain::{AnswerValue, Choice, FormDataType, InputField};

/// Posición de una fila: sección y fila dentro de la sección.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub fn new(section: usize, row: usize) -> Self {
        IndexPath { section, row }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSection {
    pub identifier: String,
    pub index: usize,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub row_count: usize,
    /// Sección reservada para un único grupo de elección.
    pub exclusive: bool,
}

impl FormSection {
    pub(crate) fn new(index: usize, exclusive: bool) -> Self {
        FormSection { identifier: index.to_string(),
                      index,
                      title: None,
                      subtitle: None,
                      row_count: 0,
                      exclusive }
    }
}

/// Fila de una opción de elección.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceItem {
    pub identifier: String,
    pub index_path: IndexPath,
    pub ui_hint: String,
    pub choice: Choice,
    pub selected: bool,
}

/// Fila de entrada libre (texto, número, fecha, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct TextEntryItem {
    pub identifier: String,
    pub index_path: IndexPath,
    pub ui_hint: String,
    pub placeholder_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormItem {
    Choice(ChoiceItem),
    TextEntry(TextEntryItem),
}

impl FormItem {
    pub fn identifier(&self) -> &str {
        match self {
            FormItem::Choice(item) => &item.identifier,
            FormItem::TextEntry(item) => &item.identifier,
        }
    }

    pub fn index_path(&self) -> IndexPath {
        match self {
            FormItem::Choice(item) => item.index_path,
            FormItem::TextEntry(item) => item.index_path,
        }
    }

    pub fn ui_hint(&self) -> &str {
        match self {
            FormItem::Choice(item) => &item.ui_hint,
            FormItem::TextEntry(item) => &item.ui_hint,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemGroup {
    identifier: String,
    input_field: InputField,
    section_index: usize,
    beginning_row: usize,
    items: Vec<FormItem>,
    answer: Option<AnswerValue>,
}

impl ItemGroup {
    pub(crate) fn build(identifier: String,
                        input_field: &InputField,
                        ui_hint: &str,
                        section_index: usize,
                        beginning_row: usize)
                        -> Self {
        let items = if input_field.data_type().is_choice() {
            input_field.choices()
                       .iter()
                       .enumerate()
                       .map(|(k, choice)| {
                           FormItem::Choice(ChoiceItem { identifier: format!("{identifier}.{k}"),
                                                         index_path: IndexPath::new(section_index, beginning_row + k),
                                                         ui_hint: ui_hint.to_string(),
                                                         choice: choice.clone(),
                                                         selected: false })
                       })
                       .collect()
        } else {
            vec![FormItem::TextEntry(TextEntryItem { identifier: identifier.clone(),
                                                     index_path: IndexPath::new(section_index, beginning_row),
                                                     ui_hint: ui_hint.to_string(),
                                                     placeholder_text: input_field.placeholder_text()
                                                                                  .map(str::to_string) })]
        };
        ItemGroup { identifier,
                    input_field: input_field.clone(),
                    section_index,
                    beginning_row,
                    items,
                    answer: None }
    }

    /// Identificador del campo, o su posición en el formulario si no tiene.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn input_field(&self) -> &InputField {
        &self.input_field
    }

    pub fn section_index(&self) -> usize {
        self.section_index
    }

    pub fn beginning_row(&self) -> usize {
        self.beginning_row
    }

    pub fn items(&self) -> &[FormItem] {
        &self.items
    }

    pub fn answer(&self) -> Option<&AnswerValue> {
        self.answer.as_ref()
    }

    pub fn is_choice(&self) -> bool {
        self.input_field.data_type().is_choice()
    }

    pub(crate) fn contains(&self, path: IndexPath) -> bool {
        self.section_index == path.section
        && path.row >= self.beginning_row
        && path.row < self.beginning_row + self.items.len()
    }

    pub(crate) fn item_at(&self, path: IndexPath) -> Option<&FormItem> {
        if !self.contains(path) {
            return None;
        }
        self.items.get(path.row - self.beginning_row)
    }

    pub(crate) fn set_answer(&mut self, answer: Option<AnswerValue>) {
        self.answer = answer;
    }

    /// Cambia la selección de la opción en `offset` aplicando las reglas de
    /// exclusividad. Devuelve `true` si cambió alguna otra fila.
    pub(crate) fn toggle_choice(&mut self, offset: usize, selected: bool) -> bool {
        let single = self.input_field.data_type() == FormDataType::SingleChoice;
        let exclusive = match self.items.get(offset) {
            Some(FormItem::Choice(item)) => item.choice.is_exclusive(),
            _ => return false,
        };
        let mut others_changed = false;
        for (k, item) in self.items.iter_mut().enumerate() {
            let FormItem::Choice(choice_item) = item else { continue };
            if k == offset {
                choice_item.selected = selected;
                continue;
            }
            let clear = selected && (single || exclusive || choice_item.choice.is_exclusive());
            if clear && choice_item.selected {
                choice_item.selected = false;
                others_changed = true;
            }
        }
        self.answer = self.choice_answer();
        others_changed
    }

    fn choice_answer(&self) -> Option<AnswerValue> {
        let mut selected = self.items.iter().filter_map(|item| match item {
                                                    FormItem::Choice(c) if c.selected => Some(c.choice.answer_value().clone()),
                                                    _ => None,
                                                });
        match self.input_field.data_type() {
            FormDataType::SingleChoice => selected.next(),
            _ => {
                let values: Vec<AnswerValue> = selected.collect();
                if values.is_empty() {
                    None
                } else {
                    Some(AnswerValue::List(values))
                }
            }
        }
    }
}
