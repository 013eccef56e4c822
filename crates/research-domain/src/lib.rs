//! research-domain: modelo de pasos de una tarea de investigación.
//!
//! Tipos de valor inmutables (pasos, campos de formulario, acciones,
//! respuestas) más el registro de discriminadores usado por la capa de
//! serialización.
pub mod action;
pub mod error;
pub mod form;
pub mod layered;
pub mod registry;
pub mod step;
pub mod value;

pub use action::{Action, ActionBase, ActionType, ReminderAction};
pub use error::DomainError;
pub use form::{Choice, FormDataType, InputField, InputUiHint};
pub use layered::{DynValue, FieldList, Layered};
pub use registry::{TypeRegistry, TYPE_FIELD};
pub use step::{decode_step, default_step_registry, step_registry, ActionStep, FormUiStep, Step, StepRegistry, UiStepBase};
pub use value::AnswerValue;
