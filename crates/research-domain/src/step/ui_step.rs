use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};

use super::Step;
use crate::error::ensure_identifier;
use crate::layered::{FieldList, Layered};
use crate::registry::{decode_payload, encode_tagged};
use crate::{layered_value, DomainError};

/// Paso base con campos de presentación. Las demás variantes lo contienen
/// (aplanado en JSON) y extienden su contribución a igualdad y hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiStepBase {
    identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    footnote: Option<String>,
}

impl UiStepBase {
    pub const TYPE_KEY: &'static str = "ui";

    /// # Errores
    /// `DomainError::InvalidArgument` si `identifier` está vacío.
    pub fn new(identifier: impl Into<String>,
               title: Option<String>,
               text: Option<String>,
               detail: Option<String>,
               footnote: Option<String>)
               -> Result<Self, DomainError> {
        let identifier = identifier.into();
        ensure_identifier(&identifier, "step")?;
        Ok(UiStepBase { identifier,
                        title,
                        text,
                        detail,
                        footnote })
    }

    pub fn builder(identifier: impl Into<String>) -> UiStepBuilder {
        UiStepBuilder::new(identifier)
    }

    pub fn identifier(&self) -> &str { &self.identifier }
    pub fn title(&self) -> Option<&str> { self.title.as_deref() }
    pub fn text(&self) -> Option<&str> { self.text.as_deref() }
    pub fn detail(&self) -> Option<&str> { self.detail.as_deref() }
    pub fn footnote(&self) -> Option<&str> { self.footnote.as_deref() }

    /// Revalida invariantes tras deserializar.
    pub(crate) fn validate(&self) -> Result<(), DomainError> {
        ensure_identifier(&self.identifier, "step")
    }

    pub(crate) fn decode_boxed(value: &Value) -> Result<Box<dyn Step>, DomainError> {
        let step: UiStepBase = decode_payload(value)?;
        step.validate()?;
        Ok(Box::new(step))
    }
}

impl Layered for UiStepBase {
    fn hash_fields<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
        self.title.hash(state);
        self.text.hash(state);
        self.detail.hash(state);
        self.footnote.hash(state);
    }

    fn eq_fields(&self, other: &Self) -> bool {
        self.identifier == other.identifier
        && self.title == other.title
        && self.text == other.text
        && self.detail == other.detail
        && self.footnote == other.footnote
    }

    fn describe_fields(&self, fields: &mut FieldList) {
        fields.add("identifier", &self.identifier)
              .add("title", &self.title)
              .add("text", &self.text)
              .add("detail", &self.detail)
              .add("footnote", &self.footnote);
    }
}

layered_value!(UiStepBase, "UiStepBase");

impl Step for UiStepBase {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn step_type(&self) -> &str {
        Self::TYPE_KEY
    }

    fn ui(&self) -> Option<&UiStepBase> {
        Some(self)
    }

    fn to_json(&self) -> Result<Value, DomainError> {
        encode_tagged(self, Self::TYPE_KEY)
    }
}

/// Builder de los campos de presentación; lo reutilizan los builders de las
/// variantes.
#[derive(Debug, Clone, Default)]
pub struct UiStepBuilder {
    identifier: String,
    title: Option<String>,
    text: Option<String>,
    detail: Option<String>,
    footnote: Option<String>,
}

impl UiStepBuilder {
    pub fn new(identifier: impl Into<String>) -> Self {
        UiStepBuilder { identifier: identifier.into(),
                        ..Default::default() }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn footnote(mut self, footnote: impl Into<String>) -> Self {
        self.footnote = Some(footnote.into());
        self
    }

    pub fn build(self) -> Result<UiStepBase, DomainError> {
        UiStepBase::new(self.identifier, self.title, self.text, self.detail, self.footnote)
    }
}

/// Genera los setters de presentación en builders que envuelven un
/// `UiStepBuilder` en el campo `ui`.
macro_rules! delegate_ui_setters {
    () => {
        pub fn title(mut self, title: impl Into<String>) -> Self {
            self.ui = self.ui.title(title);
            self
        }

        pub fn text(mut self, text: impl Into<String>) -> Self {
            self.ui = self.ui.text(text);
            self
        }

        pub fn detail(mut self, detail: impl Into<String>) -> Self {
            self.ui = self.ui.detail(detail);
            self
        }

        pub fn footnote(mut self, footnote: impl Into<String>) -> Self {
            self.ui = self.ui.footnote(footnote);
            self
        }
    };
}
pub(crate) use delegate_ui_setters;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifier_is_invalid_argument() {
        let err = UiStepBase::builder("").title("t").build().unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn whitespace_identifier_is_accepted_verbatim() {
        let step = UiStepBase::builder("  ").build().unwrap();
        assert_eq!(step.identifier(), "  ");
    }

    #[test]
    fn display_lists_every_field() {
        let step = UiStepBase::builder("intro").title("Welcome").build().unwrap();
        assert_eq!(step.to_string(),
                   "UiStepBase{identifier=\"intro\", title=Some(\"Welcome\"), text=None, detail=None, footnote=None}");
    }

    #[test]
    fn json_carries_type_and_skips_absent_fields() {
        let step = UiStepBase::builder("intro").text("Hello").build().unwrap();
        let json = step.to_json().unwrap();
        assert_eq!(json, serde_json::json!({"type": "ui", "identifier": "intro", "text": "Hello"}));
    }
}
