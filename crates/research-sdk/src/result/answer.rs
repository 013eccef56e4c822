use chrono::{DateTime, Utc};
use research_domain::layered::{FieldList, Layered};
use research_domain::registry::{decode_payload, encode_tagged};
use research_domain::{AnswerValue, DomainError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::{ResultBase, ResultRecord};

/// Respuesta del participante (`answer`) más metadatos opcionales por clave
/// (unidades, valor crudo del sensor, ...), del mismo tipo que la respuesta.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult<T> {
    #[serde(flatten)]
    base: ResultBase,
    answer: T,
    #[serde(default = "BTreeMap::new", skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, T>,
}

impl<T> AnswerResult<T> {
    pub const TYPE_KEY: &'static str = "answer";

    /// Resultado sin metadatos.
    pub fn new(start_date: DateTime<Utc>, end_date: DateTime<Utc>, answer: T) -> Self {
        Self::from_base(ResultBase::new(start_date, end_date), answer, BTreeMap::new())
    }

    pub fn with_metadata<I>(start_date: DateTime<Utc>, end_date: DateTime<Utc>, answer: T, metadata: I) -> Self
        where I: IntoIterator<Item = (String, T)>
    {
        Self::from_base(ResultBase::new(start_date, end_date), answer, metadata.into_iter().collect())
    }

    pub fn from_base(base: ResultBase, answer: T, metadata: BTreeMap<String, T>) -> Self {
        AnswerResult { base, answer, metadata }
    }

    pub fn builder() -> AnswerResultBuilder<T> {
        AnswerResultBuilder::default()
    }

    pub fn answer(&self) -> &T {
        &self.answer
    }

    /// Metadato para `key`, o `None` si no existe. Nunca falla.
    pub fn metadata(&self, key: &str) -> Option<&T> {
        self.metadata.get(key)
    }

    pub fn metadata_map(&self) -> &BTreeMap<String, T> {
        &self.metadata
    }
}

impl<T: Into<AnswerValue>> AnswerResult<T> {
    /// Convierte respuesta y metadatos a `AnswerValue`, la única forma que el
    /// registro sabe decodificar bajo `"answer"`.
    pub fn into_answer_value(self) -> AnswerResult<AnswerValue> {
        let metadata = self.metadata.into_iter().map(|(k, v)| (k, v.into())).collect();
        AnswerResult { base: self.base, answer: self.answer.into(), metadata }
    }
}

impl AnswerResult<AnswerValue> {
    pub(crate) fn decode_boxed(value: &Value) -> Result<Box<dyn ResultRecord>, DomainError> {
        let result: AnswerResult<AnswerValue> = decode_payload(value)?;
        result.base.validate()?;
        Ok(Box::new(result))
    }
}

impl<T> Layered for AnswerResult<T> where T: Eq + Hash + fmt::Debug
{
    fn hash_fields<H: Hasher>(&self, state: &mut H) {
        self.base.hash_fields(state);
        self.answer.hash(state);
        self.metadata.hash(state);
    }

    fn eq_fields(&self, other: &Self) -> bool {
        self.base.eq_fields(&other.base) && self.answer == other.answer && self.metadata == other.metadata
    }

    fn describe_fields(&self, fields: &mut FieldList) {
        self.base.describe_fields(fields);
        fields.add("answer", &self.answer).add("metadata", &self.metadata);
    }
}

// Genérico: `layered_value!` sólo cubre tipos sin parámetros.
impl<T> PartialEq for AnswerResult<T> where T: Eq + Hash + fmt::Debug
{
    fn eq(&self, other: &Self) -> bool {
        self.eq_fields(other)
    }
}

impl<T> Eq for AnswerResult<T> where T: Eq + Hash + fmt::Debug {}

impl<T> Hash for AnswerResult<T> where T: Eq + Hash + fmt::Debug
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_fields(state)
    }
}

impl<T> fmt::Display for AnswerResult<T> where T: Eq + Hash + fmt::Debug
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = FieldList::default();
        self.describe_fields(&mut fields);
        fields.render("AnswerResult", f)
    }
}

// Sólo la forma `AnswerValue` se registra: otro `T` se codificaría como
// "answer" sin poder leerse de vuelta. Ver `into_answer_value`.
impl ResultRecord for AnswerResult<AnswerValue> {
    fn base(&self) -> &ResultBase {
        &self.base
    }

    fn result_type(&self) -> &str {
        Self::TYPE_KEY
    }

    fn to_json(&self) -> Result<Value, DomainError> {
        encode_tagged(self, Self::TYPE_KEY)
    }
}

/// Builder con validación: `answer` y ambas fechas son obligatorias.
#[derive(Debug, Clone)]
pub struct AnswerResultBuilder<T> {
    identifier: Option<String>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    answer: Option<T>,
    metadata: BTreeMap<String, T>,
}

impl<T> Default for AnswerResultBuilder<T> {
    fn default() -> Self {
        AnswerResultBuilder { identifier: None,
                              start_date: None,
                              end_date: None,
                              answer: None,
                              metadata: BTreeMap::new() }
    }
}

impl<T> AnswerResultBuilder<T> {
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn start_date(mut self, date: DateTime<Utc>) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: DateTime<Utc>) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn answer(mut self, answer: impl Into<T>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<T>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// # Errores
    /// `DomainError::InvalidArgument` si falta la respuesta o alguna fecha, o
    /// si el identificador está vacío.
    pub fn build(self) -> Result<AnswerResult<T>, DomainError> {
        let answer = self.answer.ok_or_else(|| DomainError::invalid_argument("answer result requires an answer"))?;
        let start = self.start_date.ok_or_else(|| DomainError::invalid_argument("answer result requires a start date"))?;
        let end = self.end_date.ok_or_else(|| DomainError::invalid_argument("answer result requires an end date"))?;
        let base = match self.identifier {
            Some(identifier) => ResultBase::identified(identifier, start, end)?,
            None => ResultBase::new(start, end),
        };
        Ok(AnswerResult::from_base(base, answer, self.metadata))
    }
}
