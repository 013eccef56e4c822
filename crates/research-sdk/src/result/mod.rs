//! Modelo de resultados.
//!
//! Un resultado registra el desenlace de un paso (o de un colector
//! asíncrono) entre `start_date` y `end_date`. Variantes integradas:
//! - `ResultBase` (`"base"`): sólo fechas e identificador opcional.
//! - `AnswerResult<T>` (`"answer"`): respuesta tipada + metadatos por clave.
//! - `CollectionResult` (`"collection"`): resultados de entrada de un formulario.
//! - `TaskResult` (`"task"`): agregado de una ejecución de tarea.
//!
//! La correlación resultado → paso es por convención (identificador
//! compartido); no hay clave foránea explícita.
mod answer;
mod base;
mod collection;
mod task;

pub use answer::{AnswerResult, AnswerResultBuilder};
pub use base::ResultBase;
pub use collection::CollectionResult;
pub use task::TaskResult;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use research_domain::{AnswerValue, DomainError, DynValue, TypeRegistry};
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Capacidades comunes de un resultado.
pub trait ResultRecord: DynValue + ResultClone + fmt::Debug + fmt::Display {
    /// Campos base (fechas e identificador).
    fn base(&self) -> &ResultBase;

    /// Discriminador de la variante concreta.
    fn result_type(&self) -> &str;

    fn identifier(&self) -> Option<&str> {
        self.base().identifier()
    }

    fn start_date(&self) -> DateTime<Utc> {
        self.base().start_date()
    }

    fn end_date(&self) -> DateTime<Utc> {
        self.base().end_date()
    }

    /// Representación JSON con todos los campos y `type`.
    fn to_json(&self) -> Result<Value, DomainError>;
}

pub trait ResultClone {
    fn clone_box(&self) -> Box<dyn ResultRecord>;
}

impl<T> ResultClone for T where T: ResultRecord + Clone
{
    fn clone_box(&self) -> Box<dyn ResultRecord> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn ResultRecord> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

impl PartialEq for dyn ResultRecord {
    fn eq(&self, other: &Self) -> bool {
        self.eq_dyn(other.as_any())
    }
}

impl Eq for dyn ResultRecord {}

impl Hash for dyn ResultRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_dyn(state)
    }
}

impl dyn ResultRecord {
    pub fn downcast_ref<T: ResultRecord>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

pub type ResultRegistry = TypeRegistry<dyn ResultRecord>;

/// Registro con las variantes integradas. Las respuestas se decodifican como
/// `AnswerResult<AnswerValue>`.
pub fn default_result_registry() -> ResultRegistry {
    let mut registry = ResultRegistry::new("result");
    registry.register(ResultBase::TYPE_KEY, ResultBase::decode_boxed);
    registry.register(AnswerResult::<AnswerValue>::TYPE_KEY, AnswerResult::<AnswerValue>::decode_boxed);
    registry.register(CollectionResult::TYPE_KEY, CollectionResult::decode_boxed);
    registry.register(TaskResult::TYPE_KEY, TaskResult::decode_boxed);
    registry
}

static RESULT_REGISTRY: Lazy<ResultRegistry> = Lazy::new(default_result_registry);

pub fn result_registry() -> &'static ResultRegistry {
    &RESULT_REGISTRY
}

/// Decodifica un resultado usando el registro global. Los resultados
/// anidados (colecciones, tareas) también se resuelven con este registro.
pub fn decode_result(value: &Value) -> Result<Box<dyn ResultRecord>, DomainError> {
    result_registry().decode(value)
}

/// Serializa una secuencia de resultados en orden.
pub(crate) fn encode_all<'a, I>(results: I) -> Result<Vec<Value>, DomainError>
    where I: IntoIterator<Item = &'a Box<dyn ResultRecord>>
{
    results.into_iter().map(|r| r.to_json()).collect()
}
