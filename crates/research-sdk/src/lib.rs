//! research-sdk: modelo de resultados de una ejecución de tarea.
//!
//! Complementa a `research-domain` (pasos) con los registros de lo que el
//! participante produjo. El controlador de flujo (externo) crea un
//! `TaskResult` al iniciar y le agrega resultados a medida que avanza.
pub mod hashing;
pub mod result;

pub use result::{decode_result, default_result_registry, result_registry, AnswerResult, AnswerResultBuilder,
                 CollectionResult, ResultBase, ResultRecord, ResultRegistry, TaskResult};
