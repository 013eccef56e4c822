use research_domain::DomainError;
use thiserror::Error;

/// Errores de la aplicación de demostración (carga de tareas y salida).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de dominio: {0}")]
    Domain(#[from] DomainError),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Error de configuración: {0}")]
    Config(String),
}
