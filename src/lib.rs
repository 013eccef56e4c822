//! research-kit
//!
//! Fachada del workspace:
//! - Re-exporta `research_domain` (pasos), `research_sdk` (resultados) y
//!   `research_adapters` (fuente de datos de formularios).
//! - Expone `config` (variables de entorno) y `errors` (`AppError`).
//! - `session` carga definiciones de tarea y simula una ejecución.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod config;
pub mod errors;
pub mod session;

pub use research_adapters as adapters;
pub use research_domain as domain;
pub use research_sdk as sdk;

use config::AppConfig;

/// Instala `env_logger` con el nivel configurado. Llamadas repetidas son
/// inofensivas.
pub fn init_logging(config: &AppConfig) {
    let _ = env_logger::Builder::new().parse_filters(&config.log_level)
                                      .format_timestamp_millis()
                                      .try_init();
}
