use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};

use super::ui_step::delegate_ui_setters;
use super::{Step, UiStepBase, UiStepBuilder};
use crate::form::InputField;
use crate::layered::{FieldList, Layered};
use crate::registry::{decode_payload, encode_tagged};
use crate::{layered_value, DomainError};

/// Paso de formulario: campos de presentación más una secuencia ordenada de
/// `InputField`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormUiStep {
    #[serde(flatten)]
    base: UiStepBase,
    #[serde(default)]
    input_fields: Vec<InputField>,
}

impl FormUiStep {
    pub const TYPE_KEY: &'static str = "form";

    pub fn new(base: UiStepBase, input_fields: Vec<InputField>) -> Self {
        FormUiStep { base, input_fields }
    }

    pub fn builder(identifier: impl Into<String>) -> FormUiStepBuilder {
        FormUiStepBuilder { ui: UiStepBuilder::new(identifier),
                            input_fields: Vec::new() }
    }

    pub fn base(&self) -> &UiStepBase {
        &self.base
    }

    pub fn input_fields(&self) -> &[InputField] {
        &self.input_fields
    }

    /// Busca un campo por identificador.
    pub fn input_field(&self, identifier: &str) -> Option<&InputField> {
        self.input_fields.iter().find(|f| f.identifier() == Some(identifier))
    }

    pub(crate) fn decode_boxed(value: &Value) -> Result<Box<dyn Step>, DomainError> {
        let step: FormUiStep = decode_payload(value)?;
        step.base.validate()?;
        Ok(Box::new(step))
    }
}

impl Layered for FormUiStep {
    fn hash_fields<H: Hasher>(&self, state: &mut H) {
        self.base.hash_fields(state);
        self.input_fields.hash(state);
    }

    fn eq_fields(&self, other: &Self) -> bool {
        self.base.eq_fields(&other.base) && self.input_fields == other.input_fields
    }

    fn describe_fields(&self, fields: &mut FieldList) {
        self.base.describe_fields(fields);
        fields.add("inputFields", &self.input_fields);
    }
}

layered_value!(FormUiStep, "FormUiStep");

impl Step for FormUiStep {
    fn identifier(&self) -> &str {
        self.base.identifier()
    }

    fn step_type(&self) -> &str {
        Self::TYPE_KEY
    }

    fn ui(&self) -> Option<&UiStepBase> {
        Some(&self.base)
    }

    fn to_json(&self) -> Result<Value, DomainError> {
        encode_tagged(self, Self::TYPE_KEY)
    }
}

#[derive(Debug, Clone)]
pub struct FormUiStepBuilder {
    ui: UiStepBuilder,
    input_fields: Vec<InputField>,
}

impl FormUiStepBuilder {
    delegate_ui_setters!();

    pub fn input_field(mut self, field: InputField) -> Self {
        self.input_fields.push(field);
        self
    }

    pub fn input_fields(mut self, fields: impl IntoIterator<Item = InputField>) -> Self {
        self.input_fields.extend(fields);
        self
    }

    pub fn build(self) -> Result<FormUiStep, DomainError> {
        Ok(FormUiStep::new(self.ui.build()?, self.input_fields))
    }
}
