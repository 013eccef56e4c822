//! `AnswerValue`: unión etiquetada con los tipos de respuesta que maneja la
//! aplicación (texto, número, booleano, fecha y listas de ellos).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Valor de una respuesta. Serializa como `{"type": "...", "value": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum AnswerValue {
    String(String),
    Integer(i64),
    /// Los decimales se comparan por patrón de bits (`-0.0` se normaliza a
    /// `0.0`); `NaN` es igual a sí mismo pero no sobrevive a JSON.
    Decimal(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    List(Vec<AnswerValue>),
}

impl AnswerValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnswerValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AnswerValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnswerValue::Decimal(d) => Some(*d),
            AnswerValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnswerValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AnswerValue]> {
        match self {
            AnswerValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Nombre del discriminador serializado.
    pub fn kind(&self) -> &'static str {
        match self {
            AnswerValue::String(_) => "string",
            AnswerValue::Integer(_) => "integer",
            AnswerValue::Decimal(_) => "decimal",
            AnswerValue::Boolean(_) => "boolean",
            AnswerValue::Date(_) => "date",
            AnswerValue::List(_) => "list",
        }
    }
}

fn decimal_bits(d: f64) -> u64 {
    if d == 0.0 {
        0.0f64.to_bits()
    } else {
        d.to_bits()
    }
}

impl PartialEq for AnswerValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AnswerValue::String(a), AnswerValue::String(b)) => a == b,
            (AnswerValue::Integer(a), AnswerValue::Integer(b)) => a == b,
            (AnswerValue::Decimal(a), AnswerValue::Decimal(b)) => decimal_bits(*a) == decimal_bits(*b),
            (AnswerValue::Boolean(a), AnswerValue::Boolean(b)) => a == b,
            (AnswerValue::Date(a), AnswerValue::Date(b)) => a == b,
            (AnswerValue::List(a), AnswerValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AnswerValue {}

impl Hash for AnswerValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            AnswerValue::String(s) => s.hash(state),
            AnswerValue::Integer(i) => i.hash(state),
            AnswerValue::Decimal(d) => decimal_bits(*d).hash(state),
            AnswerValue::Boolean(b) => b.hash(state),
            AnswerValue::Date(d) => d.hash(state),
            AnswerValue::List(items) => items.hash(state),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::String(s) => write!(f, "{s}"),
            AnswerValue::Integer(i) => write!(f, "{i}"),
            AnswerValue::Decimal(d) => write!(f, "{d}"),
            AnswerValue::Boolean(b) => write!(f, "{b}"),
            AnswerValue::Date(d) => write!(f, "{}", d.to_rfc3339()),
            AnswerValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(v: &str) -> Self {
        AnswerValue::String(v.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(v: String) -> Self {
        AnswerValue::String(v)
    }
}

impl From<i64> for AnswerValue {
    fn from(v: i64) -> Self {
        AnswerValue::Integer(v)
    }
}

impl From<f64> for AnswerValue {
    fn from(v: f64) -> Self {
        AnswerValue::Decimal(v)
    }
}

impl From<bool> for AnswerValue {
    fn from(v: bool) -> Self {
        AnswerValue::Boolean(v)
    }
}

impl From<DateTime<Utc>> for AnswerValue {
    fn from(v: DateTime<Utc>) -> Self {
        AnswerValue::Date(v)
    }
}

impl From<Vec<AnswerValue>> for AnswerValue {
    fn from(v: Vec<AnswerValue>) -> Self {
        AnswerValue::List(v)
    }
}
