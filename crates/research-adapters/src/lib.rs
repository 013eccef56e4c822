//! research-adapters: capa de presentación de formularios.
//!
//! Adapta un `FormUiStep` del dominio a filas y secciones listas para una
//! vista de lista, y convierte las respuestas capturadas en resultados del
//! SDK (`CollectionResult` de `AnswerResult<AnswerValue>`).
pub mod form_source;
pub mod items;

pub use form_source::{preferred_ui_hint, FormDataSource, SelectOutcome};
pub use items::{ChoiceItem, FormItem, FormSection, IndexPath, ItemGroup, TextEntryItem};
