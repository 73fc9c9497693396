//! Frame results and the typed messages derived from them

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// One value of a frame result as the script runtime handed it over.
///
/// `Unsupported` keeps the runtime's type name so the drainer can report it.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    Bool(bool),
    Number(f64),
    String(String),
    Unsupported { type_name: String },
}

/// Associative result of one frame cycle. Iteration order is unspecified.
pub type FrameResult = HashMap<String, ResultValue>;

/// Value delivered to observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl MessageValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MessageValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            MessageValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MessageValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for MessageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageValue::Bool(value) => write!(f, "{value}"),
            MessageValue::Number(value) => write!(f, "{value}"),
            MessageValue::String(value) => write!(f, "{value:?}"),
        }
    }
}

impl TryFrom<ResultValue> for MessageValue {
    /// The runtime type name of the rejected value.
    type Error = String;

    fn try_from(value: ResultValue) -> Result<Self, Self::Error> {
        match value {
            ResultValue::Bool(value) => Ok(MessageValue::Bool(value)),
            ResultValue::Number(value) => Ok(MessageValue::Number(value)),
            ResultValue::String(value) => Ok(MessageValue::String(value)),
            ResultValue::Unsupported { type_name } => Err(type_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub key: String,
    pub value: MessageValue,
}

impl Message {
    pub fn new(key: impl Into<String>, value: MessageValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_values_do_not_convert() {
        let value = ResultValue::Unsupported {
            type_name: "Function".to_string(),
        };
        assert_eq!(MessageValue::try_from(value), Err("Function".to_string()));
        assert_eq!(
            MessageValue::try_from(ResultValue::Number(42.0)),
            Ok(MessageValue::Number(42.0))
        );
    }
}
