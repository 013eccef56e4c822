//! Agregado de resultados de una ejecución de tarea.
//!
//! Ciclo de vida: se crea al iniciar la ejecución, acumula resultados de
//! pasos (en orden) y resultados asíncronos (conjunto, sin orden) y se
//! entrega a quien lo persiste/transmite. No existe operación de "sellado":
//! tras la entrega no debe mutarse, por convención.
//!
//! No hay sincronización interna; con varios productores el llamador debe
//! serializar el acceso.
use chrono::{DateTime, Utc};
use log::debug;
use research_domain::layered::{FieldList, Layered};
use research_domain::registry::{decode_payload, encode_tagged};
use research_domain::{layered_value, DomainError};
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

use super::{encode_all, result_registry, ResultBase, ResultRecord};
use crate::hashing::{hash_value, to_canonical_json};

#[derive(Debug, Clone)]
pub struct TaskResult {
    base: ResultBase,
    task_run_uuid: Uuid,
    step_results: Vec<Box<dyn ResultRecord>>,
    async_results: HashSet<Box<dyn ResultRecord>>,
}

impl TaskResult {
    pub const TYPE_KEY: &'static str = "task";
    const RUN_UUID_FIELD: &'static str = "taskRunUUID";
    const STEP_RESULTS_FIELD: &'static str = "stepResults";
    const ASYNC_RESULTS_FIELD: &'static str = "asyncResults";

    /// Nueva ejecución con un `task_run_uuid` aleatorio (v4), asignado una
    /// sola vez.
    pub fn new(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        TaskResult { base: ResultBase::new(start_date, end_date),
                     task_run_uuid: Uuid::new_v4(),
                     step_results: Vec::new(),
                     async_results: HashSet::new() }
    }

    pub fn task_run_uuid(&self) -> Uuid {
        self.task_run_uuid
    }

    /// Resultados de pasos en el orden en que se completaron.
    pub fn step_results(&self) -> &[Box<dyn ResultRecord>] {
        &self.step_results
    }

    pub fn async_results(&self) -> &HashSet<Box<dyn ResultRecord>> {
        &self.async_results
    }

    /// Agrega al final. Sin deduplicación ni reordenamiento; una corrección
    /// es un resultado posterior con el mismo identificador.
    pub fn add_step_result(&mut self, result: Box<dyn ResultRecord>) {
        debug!("task_result:add_step run={} identifier={:?} type={}",
               self.task_run_uuid,
               result.identifier(),
               result.result_type());
        self.step_results.push(result);
    }

    /// Inserta un resultado asíncrono. Devuelve `false` si ya había uno
    /// igual.
    pub fn add_async_result(&mut self, result: Box<dyn ResultRecord>) -> bool {
        let inserted = self.async_results.insert(result);
        if !inserted {
            debug!("task_result:add_async run={} duplicate ignored", self.task_run_uuid);
        }
        inserted
    }

    /// Último resultado de paso con ese identificador (el más reciente gana).
    pub fn step_result(&self, identifier: &str) -> Option<&dyn ResultRecord> {
        self.step_results.iter().rev().find(|r| r.identifier() == Some(identifier)).map(|r| &**r)
    }

    /// Huella blake3 del JSON canónico; no depende del orden de inserción de
    /// los resultados asíncronos.
    pub fn fingerprint(&self) -> Result<String, DomainError> {
        Ok(hash_value(&self.to_json()?))
    }

    pub(crate) fn decode_boxed(value: &Value) -> Result<Box<dyn ResultRecord>, DomainError> {
        let base: ResultBase = decode_payload(value)?;
        base.validate()?;
        let task_run_uuid: Uuid = match value.get(Self::RUN_UUID_FIELD) {
            Some(raw) => decode_payload(raw)?,
            None => return Err(DomainError::deserialization(format!("task result is missing `{}`", Self::RUN_UUID_FIELD))),
        };
        let step_results = match value.get(Self::STEP_RESULTS_FIELD) {
            Some(items) => result_registry().decode_all(items)?,
            None => Vec::new(),
        };
        let async_results = match value.get(Self::ASYNC_RESULTS_FIELD) {
            Some(items) => result_registry().decode_all(items)?.into_iter().collect(),
            None => HashSet::new(),
        };
        Ok(Box::new(TaskResult { base,
                                 task_run_uuid,
                                 step_results,
                                 async_results }))
    }

    /// Resultados asíncronos en orden determinista (por JSON canónico).
    fn sorted_async_json(&self) -> Result<Vec<Value>, DomainError> {
        let mut encoded = encode_all(&self.async_results)?;
        encoded.sort_by_cached_key(to_canonical_json);
        Ok(encoded)
    }
}

impl Layered for TaskResult {
    fn hash_fields<H: Hasher>(&self, state: &mut H) {
        self.base.hash_fields(state);
        self.task_run_uuid.hash(state);
        self.step_results.hash(state);
        // Conjunto: combinación conmutativa de los hashes individuales.
        let combined = self.async_results.iter().fold(0u64, |acc, r| {
                                                    let mut h = DefaultHasher::new();
                                                    r.hash(&mut h);
                                                    acc.wrapping_add(h.finish())
                                                });
        self.async_results.len().hash(state);
        combined.hash(state);
    }

    fn eq_fields(&self, other: &Self) -> bool {
        self.base.eq_fields(&other.base)
        && self.task_run_uuid == other.task_run_uuid
        && self.step_results == other.step_results
        && self.async_results == other.async_results
    }

    fn describe_fields(&self, fields: &mut FieldList) {
        self.base.describe_fields(fields);
        // el conjunto no tiene orden; se ordena el texto para que sea estable
        let mut async_shown: Vec<String> = self.async_results.iter().map(|r| r.to_string()).collect();
        async_shown.sort();
        fields.add_display("taskRunUUID", self.task_run_uuid)
              .add_display_all("stepResults", &self.step_results)
              .add_display_all("asyncResults", async_shown);
    }
}

layered_value!(TaskResult, "TaskResult");

impl ResultRecord for TaskResult {
    fn base(&self) -> &ResultBase {
        &self.base
    }

    fn result_type(&self) -> &str {
        Self::TYPE_KEY
    }

    fn to_json(&self) -> Result<Value, DomainError> {
        let mut json = encode_tagged(&self.base, Self::TYPE_KEY)?;
        if let Some(map) = json.as_object_mut() {
            map.insert(Self::RUN_UUID_FIELD.to_string(), Value::String(self.task_run_uuid.to_string()));
            map.insert(Self::STEP_RESULTS_FIELD.to_string(), Value::Array(encode_all(&self.step_results)?));
            map.insert(Self::ASYNC_RESULTS_FIELD.to_string(), Value::Array(self.sorted_async_json()?));
        }
        Ok(json)
    }
}
