//! Acciones de navegación asociadas a un paso (botones "siguiente",
//! "recordarme", etc.).
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Clave bajo la que un paso registra una acción. Dos valores son iguales si
/// tienen la misma clave: `Custom("skip")` equivale a `Skip`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    GoForward,
    GoBackward,
    Skip,
    Cancel,
    LearnMore,
    ReviewInstructions,
    Custom(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            ActionType::GoForward => "goForward",
            ActionType::GoBackward => "goBackward",
            ActionType::Skip => "skip",
            ActionType::Cancel => "cancel",
            ActionType::LearnMore => "learnMore",
            ActionType::ReviewInstructions => "reviewInstructions",
            ActionType::Custom(key) => key,
        }
    }
}

impl PartialEq for ActionType {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ActionType {}

impl Hash for ActionType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

impl PartialOrd for ActionType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ActionType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl From<String> for ActionType {
    fn from(key: String) -> Self {
        match key.as_str() {
            "goForward" => ActionType::GoForward,
            "goBackward" => ActionType::GoBackward,
            "skip" => ActionType::Skip,
            "cancel" => ActionType::Cancel,
            "learnMore" => ActionType::LearnMore,
            "reviewInstructions" => ActionType::ReviewInstructions,
            _ => ActionType::Custom(key),
        }
    }
}

impl From<&str> for ActionType {
    fn from(key: &str) -> Self {
        ActionType::from(key.to_string())
    }
}

impl From<ActionType> for String {
    fn from(t: ActionType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Campos comunes a toda acción.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionBase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_icon_name: Option<String>,
}

/// Acción que además programa un recordatorio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderAction {
    #[serde(flatten)]
    pub base: ActionBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_identifier: Option<String>,
}

impl ReminderAction {
    pub fn builder() -> ReminderActionBuilder {
        ReminderActionBuilder::default()
    }
}

#[derive(Debug, Default, Clone)]
pub struct ReminderActionBuilder {
    inner: ReminderAction,
}

impl ReminderActionBuilder {
    pub fn button_title(mut self, title: impl Into<String>) -> Self {
        self.inner.base.button_title = Some(title.into());
        self
    }

    pub fn button_icon_name(mut self, icon: impl Into<String>) -> Self {
        self.inner.base.button_icon_name = Some(icon.into());
        self
    }

    pub fn reminder_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.inner.reminder_identifier = Some(identifier.into());
        self
    }

    pub fn build(self) -> ReminderAction {
        self.inner
    }
}

/// Acción de un paso, discriminada por `type` (`default` | `reminder`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Default(ActionBase),
    Reminder(ReminderAction),
}

impl Action {
    pub fn button(title: impl Into<String>) -> Self {
        Action::Default(ActionBase { button_title: Some(title.into()),
                                     button_icon_name: None })
    }

    pub fn base(&self) -> &ActionBase {
        match self {
            Action::Default(base) => base,
            Action::Reminder(reminder) => &reminder.base,
        }
    }

    pub fn button_title(&self) -> Option<&str> {
        self.base().button_title.as_deref()
    }

    pub fn button_icon_name(&self) -> Option<&str> {
        self.base().button_icon_name.as_deref()
    }
}

impl From<ReminderAction> for Action {
    fn from(r: ReminderAction) -> Self {
        Action::Reminder(r)
    }
}
