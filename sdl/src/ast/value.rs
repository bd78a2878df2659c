use crate::position::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    /// The number lexeme as written, e.g. `-1.50`.
    Number(String),
    Boolean(bool),
}

/// An attribute value. Lists and maps keep their written order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    List(Vec<Value>),
    /// Keys are meant to be unique; duplicates survive parsing and are
    /// reported by validation.
    Map(Vec<MapEntry>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: String,
    pub value: Value,
    pub position: Position,
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::String(s.into()))
    }

    pub fn number(lexeme: impl Into<String>) -> Self {
        Value::Scalar(Scalar::Number(lexeme.into()))
    }

    pub fn boolean(b: bool) -> Self {
        Value::Scalar(Scalar::Boolean(b))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Short human description used in diagnostics: "a string", "a list", ...
    pub fn describe(&self) -> &'static str {
        match self {
            Value::Scalar(Scalar::String(_)) => "a string",
            Value::Scalar(Scalar::Number(_)) => "a number",
            Value::Scalar(Scalar::Boolean(_)) => "a boolean",
            Value::List(_) => "a list",
            Value::Map(_) => "a map",
        }
    }

    pub(crate) fn erase_positions(&mut self) {
        match self {
            Value::Scalar(_) => {}
            Value::List(items) => items.iter_mut().for_each(Value::erase_positions),
            Value::Map(entries) => {
                for entry in entries {
                    entry.position = Position::default();
                    entry.value.erase_positions();
                }
            }
        }
    }
}
