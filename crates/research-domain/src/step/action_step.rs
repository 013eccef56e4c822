use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use super::ui_step::delegate_ui_setters;
use super::{Step, UiStepBase, UiStepBuilder};
use crate::action::{Action, ActionType};
use crate::layered::{FieldList, Layered};
use crate::registry::{decode_payload, encode_tagged};
use crate::{layered_value, DomainError};

/// Paso con acciones: cada `ActionType` puede tener una acción propia y
/// algunas pueden ocultarse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStep {
    #[serde(flatten)]
    base: UiStepBase,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    actions: BTreeMap<ActionType, Action>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    hidden_actions: BTreeSet<ActionType>,
}

impl ActionStep {
    pub const TYPE_KEY: &'static str = "action";

    pub fn builder(identifier: impl Into<String>) -> ActionStepBuilder {
        ActionStepBuilder { ui: UiStepBuilder::new(identifier),
                            actions: BTreeMap::new(),
                            hidden_actions: BTreeSet::new() }
    }

    pub fn base(&self) -> &UiStepBase {
        &self.base
    }

    pub fn actions(&self) -> &BTreeMap<ActionType, Action> {
        &self.actions
    }

    pub fn action(&self, action_type: &ActionType) -> Option<&Action> {
        self.actions.get(action_type)
    }

    pub fn hidden_actions(&self) -> &BTreeSet<ActionType> {
        &self.hidden_actions
    }

    pub fn should_hide(&self, action_type: &ActionType) -> bool {
        self.hidden_actions.contains(action_type)
    }

    pub(crate) fn decode_boxed(value: &Value) -> Result<Box<dyn Step>, DomainError> {
        let step: ActionStep = decode_payload(value)?;
        step.base.validate()?;
        Ok(Box::new(step))
    }
}

impl Layered for ActionStep {
    fn hash_fields<H: Hasher>(&self, state: &mut H) {
        self.base.hash_fields(state);
        self.actions.hash(state);
        self.hidden_actions.hash(state);
    }

    fn eq_fields(&self, other: &Self) -> bool {
        self.base.eq_fields(&other.base) && self.actions == other.actions && self.hidden_actions == other.hidden_actions
    }

    fn describe_fields(&self, fields: &mut FieldList) {
        self.base.describe_fields(fields);
        fields.add("actions", &self.actions).add("hiddenActions", &self.hidden_actions);
    }
}

layered_value!(ActionStep, "ActionStep");

impl Step for ActionStep {
    fn identifier(&self) -> &str {
        self.base.identifier()
    }

    fn step_type(&self) -> &str {
        Self::TYPE_KEY
    }

    fn ui(&self) -> Option<&UiStepBase> {
        Some(&self.base)
    }

    fn to_json(&self) -> Result<Value, DomainError> {
        encode_tagged(self, Self::TYPE_KEY)
    }
}

#[derive(Debug, Clone)]
pub struct ActionStepBuilder {
    ui: UiStepBuilder,
    actions: BTreeMap<ActionType, Action>,
    hidden_actions: BTreeSet<ActionType>,
}

impl ActionStepBuilder {
    delegate_ui_setters!();

    pub fn action(mut self, action_type: impl Into<ActionType>, action: impl Into<Action>) -> Self {
        self.actions.insert(action_type.into(), action.into());
        self
    }

    pub fn hide(mut self, action_type: impl Into<ActionType>) -> Self {
        self.hidden_actions.insert(action_type.into());
        self
    }

    pub fn build(self) -> Result<ActionStep, DomainError> {
        Ok(ActionStep { base: self.ui.build()?,
                        actions: self.actions,
                        hidden_actions: self.hidden_actions })
    }
}
