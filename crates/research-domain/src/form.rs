//! Campos de entrada de un formulario (`InputField`) y sus opciones (`Choice`).
//!
//! Para el modelo de pasos son valores opacos con igualdad propia; el
//! `FormDataSource` de `research-adapters` es quien los interpreta.
use serde::{Deserialize, Serialize};

use crate::value::AnswerValue;

/// Pistas de UI reconocidas para un campo.
pub struct InputUiHint;

impl InputUiHint {
    pub const LIST: &'static str = "list";
    pub const CHECKBOX: &'static str = "checkbox";
    pub const RADIO_BUTTON: &'static str = "radioButton";
    pub const TEXTFIELD: &'static str = "textfield";
    pub const PICKER: &'static str = "picker";
    pub const SLIDER: &'static str = "slider";
    pub const TOGGLE: &'static str = "toggle";

    pub const ALL: [&'static str; 7] = [Self::LIST,
                                        Self::CHECKBOX,
                                        Self::RADIO_BUTTON,
                                        Self::TEXTFIELD,
                                        Self::PICKER,
                                        Self::SLIDER,
                                        Self::TOGGLE];

    pub fn is_standard(hint: &str) -> bool {
        Self::ALL.contains(&hint)
    }
}

/// Tipo de dato esperado por un campo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormDataType {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
    SingleChoice,
    MultipleChoice,
}

impl FormDataType {
    pub fn is_choice(&self) -> bool {
        matches!(self, FormDataType::SingleChoice | FormDataType::MultipleChoice)
    }
}

/// Una opción seleccionable de un campo de elección.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    answer_value: AnswerValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon_name: Option<String>,
    /// Si se selecciona, deselecciona el resto de opciones.
    #[serde(default)]
    is_exclusive: bool,
}

impl Choice {
    pub fn new(answer_value: impl Into<AnswerValue>, text: impl Into<String>) -> Self {
        Choice { answer_value: answer_value.into(),
                 text: Some(text.into()),
                 detail: None,
                 icon_name: None,
                 is_exclusive: false }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_icon_name(mut self, icon_name: impl Into<String>) -> Self {
        self.icon_name = Some(icon_name.into());
        self
    }

    pub fn exclusive(mut self) -> Self {
        self.is_exclusive = true;
        self
    }

    pub fn answer_value(&self) -> &AnswerValue { &self.answer_value }
    pub fn text(&self) -> Option<&str> { self.text.as_deref() }
    pub fn detail(&self) -> Option<&str> { self.detail.as_deref() }
    pub fn icon_name(&self) -> Option<&str> { self.icon_name.as_deref() }
    pub fn is_exclusive(&self) -> bool { self.is_exclusive }
}

/// Descriptor de una pregunta dentro de un `FormUiStep`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder_text: Option<String>,
    #[serde(default)]
    is_optional: bool,
    data_type: FormDataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ui_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    choices: Vec<Choice>,
}

impl InputField {
    pub fn new(data_type: FormDataType) -> Self {
        InputField { identifier: None,
                     prompt: None,
                     prompt_detail: None,
                     placeholder_text: None,
                     is_optional: false,
                     data_type,
                     ui_hint: None,
                     choices: Vec::new() }
    }

    /// Atajo para un campo de elección con sus opciones.
    pub fn choice(identifier: impl Into<String>, data_type: FormDataType, choices: Vec<Choice>) -> Self {
        InputField::new(data_type).with_identifier(identifier).with_choices(choices)
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_prompt_detail(mut self, detail: impl Into<String>) -> Self {
        self.prompt_detail = Some(detail.into());
        self
    }

    pub fn with_placeholder_text(mut self, text: impl Into<String>) -> Self {
        self.placeholder_text = Some(text.into());
        self
    }

    pub fn with_ui_hint(mut self, hint: impl Into<String>) -> Self {
        self.ui_hint = Some(hint.into());
        self
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn identifier(&self) -> Option<&str> { self.identifier.as_deref() }
    pub fn prompt(&self) -> Option<&str> { self.prompt.as_deref() }
    pub fn prompt_detail(&self) -> Option<&str> { self.prompt_detail.as_deref() }
    pub fn placeholder_text(&self) -> Option<&str> { self.placeholder_text.as_deref() }
    pub fn is_optional(&self) -> bool { self.is_optional }
    pub fn data_type(&self) -> FormDataType { self.data_type }
    pub fn ui_hint(&self) -> Option<&str> { self.ui_hint.as_deref() }
    pub fn choices(&self) -> &[Choice] { &self.choices }
}
