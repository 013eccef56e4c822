//! Modelo de pasos.
//!
//! Un `Step` es una unidad de una tarea presentada al participante. Las
//! variantes concretas se distinguen por su discriminador `type`:
//! - `UiStepBase` (`"ui"`): paso con campos de presentación.
//! - `FormUiStep` (`"form"`): agrega una lista ordenada de `InputField`.
//! - `ActionStep` (`"action"`): agrega acciones por `ActionType`.
//!
//! El conjunto es abierto: otros crates pueden implementar `Step` y
//! registrarse en un `StepRegistry` propio.
mod action_step;
mod form_step;
mod ui_step;

pub use action_step::{ActionStep, ActionStepBuilder};
pub use form_step::{FormUiStep, FormUiStepBuilder};
pub use ui_step::{UiStepBase, UiStepBuilder};

use once_cell::sync::Lazy;
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::layered::DynValue;
use crate::registry::TypeRegistry;
use crate::DomainError;

/// Capacidades comunes de un paso.
pub trait Step: DynValue + StepClone + fmt::Debug + fmt::Display {
    /// Identificador provisto por el autor de la tarea; no vacío.
    fn identifier(&self) -> &str;

    /// Discriminador fijo de la variante concreta.
    fn step_type(&self) -> &str;

    /// Campos de presentación, si la variante los tiene.
    fn ui(&self) -> Option<&UiStepBase> {
        None
    }

    /// Representación JSON con todos los campos (heredados incluidos) y `type`.
    fn to_json(&self) -> Result<Value, DomainError>;
}

/// Clonado de `Box<dyn Step>`; implementado para todo `Step + Clone`.
pub trait StepClone {
    fn clone_box(&self) -> Box<dyn Step>;
}

impl<T> StepClone for T where T: Step + Clone
{
    fn clone_box(&self) -> Box<dyn Step> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Step> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

// Dos pasos son iguales sólo si son de la misma variante concreta.
impl PartialEq for dyn Step {
    fn eq(&self, other: &Self) -> bool {
        self.eq_dyn(other.as_any())
    }
}

impl Eq for dyn Step {}

impl Hash for dyn Step {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_dyn(state)
    }
}

impl dyn Step {
    /// Acceso tipado a la variante concreta.
    pub fn downcast_ref<T: Step>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

pub type StepRegistry = TypeRegistry<dyn Step>;

/// Registro con las variantes integradas (`ui`, `form`, `action`).
pub fn default_step_registry() -> StepRegistry {
    let mut registry = StepRegistry::new("step");
    registry.register(UiStepBase::TYPE_KEY, UiStepBase::decode_boxed);
    registry.register(FormUiStep::TYPE_KEY, FormUiStep::decode_boxed);
    registry.register(ActionStep::TYPE_KEY, ActionStep::decode_boxed);
    registry
}

static STEP_REGISTRY: Lazy<StepRegistry> = Lazy::new(default_step_registry);

/// Registro global de pasos, poblado en el primer uso.
pub fn step_registry() -> &'static StepRegistry {
    &STEP_REGISTRY
}

/// Decodifica un paso usando el registro global.
pub fn decode_step(value: &Value) -> Result<Box<dyn Step>, DomainError> {
    step_registry().decode(value)
}
