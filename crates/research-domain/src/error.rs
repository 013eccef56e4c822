use thiserror::Error;

/// Error del modelo de dominio. Todos los fallos son síncronos y se producen
/// en construcción o (de)serialización; no hay reintentos.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Falta un campo requerido (o viene vacío) al construir un valor.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Discriminador ausente/desconocido o payload mal formado.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        DomainError::InvalidArgument(msg.into())
    }

    pub fn deserialization(msg: impl Into<String>) -> Self {
        DomainError::Deserialization(msg.into())
    }
}

// La mayoría de errores de serde_json aparecen al decodificar payloads.
impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Deserialization(e.to_string())
    }
}

/// Valida que un identificador requerido no esté vacío. Los espacios cuentan
/// como contenido: `" "` es un identificador válido.
pub fn ensure_identifier(identifier: &str, what: &str) -> Result<(), DomainError> {
    if identifier.is_empty() {
        return Err(DomainError::invalid_argument(format!("{what} requires a non-empty identifier")));
    }
    Ok(())
}
