use chrono::{DateTime, Utc};
use research_domain::layered::{FieldList, Layered};
use research_domain::registry::{decode_payload, encode_tagged};
use research_domain::{layered_value, DomainError};
use serde_json::Value;
use std::hash::{Hash, Hasher};

use super::{encode_all, result_registry, ResultBase, ResultRecord};

/// Resultados de entrada de un paso de formulario, en orden de llegada.
#[derive(Debug, Clone)]
pub struct CollectionResult {
    base: ResultBase,
    input_results: Vec<Box<dyn ResultRecord>>,
}

impl CollectionResult {
    pub const TYPE_KEY: &'static str = "collection";
    const INPUT_RESULTS_FIELD: &'static str = "inputResults";

    /// # Errores
    /// `DomainError::InvalidArgument` si `identifier` está vacío.
    pub fn new(identifier: impl Into<String>,
               start_date: DateTime<Utc>,
               end_date: DateTime<Utc>,
               input_results: Vec<Box<dyn ResultRecord>>)
               -> Result<Self, DomainError> {
        Ok(CollectionResult { base: ResultBase::identified(identifier, start_date, end_date)?,
                              input_results })
    }

    pub fn input_results(&self) -> &[Box<dyn ResultRecord>] {
        &self.input_results
    }

    pub fn append_input_result(&mut self, result: Box<dyn ResultRecord>) {
        self.input_results.push(result);
    }

    /// Último resultado de entrada con ese identificador.
    pub fn find(&self, identifier: &str) -> Option<&dyn ResultRecord> {
        self.input_results.iter().rev().find(|r| r.identifier() == Some(identifier)).map(|r| &**r)
    }

    pub(crate) fn decode_boxed(value: &Value) -> Result<Box<dyn ResultRecord>, DomainError> {
        let base: ResultBase = decode_payload(value)?;
        if base.identifier().is_none() {
            return Err(DomainError::deserialization("collection result requires an identifier"));
        }
        base.validate()?;
        let input_results = match value.get(Self::INPUT_RESULTS_FIELD) {
            Some(items) => result_registry().decode_all(items)?,
            None => Vec::new(),
        };
        Ok(Box::new(CollectionResult { base, input_results }))
    }
}

impl Layered for CollectionResult {
    fn hash_fields<H: Hasher>(&self, state: &mut H) {
        self.base.hash_fields(state);
        self.input_results.hash(state);
    }

    fn eq_fields(&self, other: &Self) -> bool {
        self.base.eq_fields(&other.base) && self.input_results == other.input_results
    }

    fn describe_fields(&self, fields: &mut FieldList) {
        self.base.describe_fields(fields);
        fields.add_display_all("inputResults", &self.input_results);
    }
}

layered_value!(CollectionResult, "CollectionResult");

impl ResultRecord for CollectionResult {
    fn base(&self) -> &ResultBase {
        &self.base
    }

    fn result_type(&self) -> &str {
        Self::TYPE_KEY
    }

    fn to_json(&self) -> Result<Value, DomainError> {
        let mut json = encode_tagged(&self.base, Self::TYPE_KEY)?;
        if let Some(map) = json.as_object_mut() {
            map.insert(Self::INPUT_RESULTS_FIELD.to_string(), Value::Array(encode_all(&self.input_results)?));
        }
        Ok(json)
    }
}
