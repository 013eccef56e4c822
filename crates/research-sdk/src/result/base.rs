use chrono::{DateTime, Utc};
use research_domain::error::ensure_identifier;
use research_domain::layered::{FieldList, Layered};
use research_domain::registry::{decode_payload, encode_tagged};
use research_domain::{layered_value, DomainError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};

use super::ResultRecord;

/// Campos comunes a todo resultado. Inmutable tras construirse.
///
/// `end_date >= start_date` no se valida: es responsabilidad del llamador.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

impl ResultBase {
    pub const TYPE_KEY: &'static str = "base";

    pub fn new(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        ResultBase { identifier: None,
                     start_date,
                     end_date }
    }

    /// Resultado correlacionado con un paso por identificador.
    ///
    /// # Errores
    /// `DomainError::InvalidArgument` si `identifier` está vacío.
    pub fn identified(identifier: impl Into<String>,
                      start_date: DateTime<Utc>,
                      end_date: DateTime<Utc>)
                      -> Result<Self, DomainError> {
        let identifier = identifier.into();
        ensure_identifier(&identifier, "result")?;
        Ok(ResultBase { identifier: Some(identifier),
                        start_date,
                        end_date })
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }

    pub(crate) fn validate(&self) -> Result<(), DomainError> {
        match &self.identifier {
            Some(identifier) => ensure_identifier(identifier, "result"),
            None => Ok(()),
        }
    }

    pub(crate) fn decode_boxed(value: &Value) -> Result<Box<dyn ResultRecord>, DomainError> {
        let base: ResultBase = decode_payload(value)?;
        base.validate()?;
        Ok(Box::new(base))
    }
}

impl Layered for ResultBase {
    fn hash_fields<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
        self.start_date.hash(state);
        self.end_date.hash(state);
    }

    fn eq_fields(&self, other: &Self) -> bool {
        self.identifier == other.identifier && self.start_date == other.start_date && self.end_date == other.end_date
    }

    fn describe_fields(&self, fields: &mut FieldList) {
        fields.add("identifier", &self.identifier)
              .add_display("startDate", self.start_date.to_rfc3339())
              .add_display("endDate", self.end_date.to_rfc3339());
    }
}

layered_value!(ResultBase, "ResultBase");

impl ResultRecord for ResultBase {
    fn base(&self) -> &ResultBase {
        self
    }

    fn result_type(&self) -> &str {
        Self::TYPE_KEY
    }

    fn to_json(&self) -> Result<Value, DomainError> {
        encode_tagged(self, Self::TYPE_KEY)
    }
}
