//! Registro discriminador → fábrica para deserialización polimórfica.
//!
//! Cada variante concreta (de paso o de resultado) se registra con su clave
//! `type`. Decodificar lee ese campo y delega en la fábrica; una clave
//! ausente o desconocida es `DomainError::Deserialization`, nunca un valor
//! por defecto.
use indexmap::IndexMap;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::DomainError;

/// Nombre del campo discriminador en la representación JSON.
pub const TYPE_FIELD: &str = "type";

/// Construye un valor concreto a partir de su representación JSON.
pub type Factory<T> = fn(&Value) -> Result<Box<T>, DomainError>;

pub struct TypeRegistry<T: ?Sized> {
    /// Familia de tipos ("step", "result"); sólo para mensajes.
    family: &'static str,
    factories: IndexMap<String, Factory<T>>,
}

impl<T: ?Sized> TypeRegistry<T> {
    pub fn new(family: &'static str) -> Self {
        Self { family,
               factories: IndexMap::new() }
    }

    /// Registra (o reemplaza) la fábrica para `type_key`. Devuelve la anterior
    /// si existía.
    pub fn register(&mut self, type_key: impl Into<String>, factory: Factory<T>) -> Option<Factory<T>> {
        let type_key = type_key.into();
        debug!("registry:{} register type={type_key}", self.family);
        self.factories.insert(type_key, factory)
    }

    pub fn contains(&self, type_key: &str) -> bool {
        self.factories.contains_key(type_key)
    }

    /// Claves registradas, en orden de registro.
    pub fn type_keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn decode(&self, value: &Value) -> Result<Box<T>, DomainError> {
        let Some(type_key) = value.get(TYPE_FIELD).and_then(Value::as_str) else {
            warn!("registry:{} payload without discriminator", self.family);
            return Err(DomainError::deserialization(format!("{} payload is missing the `{TYPE_FIELD}` field", self.family)));
        };
        let Some(factory) = self.factories.get(type_key) else {
            warn!("registry:{} unknown type={type_key}", self.family);
            return Err(DomainError::deserialization(format!("unknown {} type `{type_key}`", self.family)));
        };
        factory(value)
    }

    /// Decodifica un arreglo JSON elemento a elemento, preservando el orden.
    pub fn decode_all(&self, value: &Value) -> Result<Vec<Box<T>>, DomainError> {
        let items = value.as_array()
                         .ok_or_else(|| DomainError::deserialization(format!("expected an array of {} payloads", self.family)))?;
        items.iter().map(|item| self.decode(item)).collect()
    }
}

impl<T: ?Sized> fmt::Debug for TypeRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
         .field("family", &self.family)
         .field("types", &self.factories.keys().collect::<Vec<_>>())
         .finish()
    }
}

/// Serializa `value` como objeto JSON y añade el discriminador.
pub fn encode_tagged<S: Serialize + ?Sized>(value: &S, type_key: &str) -> Result<Value, DomainError> {
    let mut json = serde_json::to_value(value).map_err(|e| DomainError::Serialization(e.to_string()))?;
    match json.as_object_mut() {
        Some(map) => {
            map.insert(TYPE_FIELD.to_string(), Value::String(type_key.to_string()));
            Ok(json)
        }
        None => Err(DomainError::Serialization(format!("`{type_key}` did not serialize to a JSON object"))),
    }
}

/// Deserializa el payload de una variante concreta. El campo `type` se
/// ignora (serde descarta claves desconocidas).
pub fn decode_payload<D: DeserializeOwned>(value: &Value) -> Result<D, DomainError> {
    Ok(D::deserialize(value)?)
}
