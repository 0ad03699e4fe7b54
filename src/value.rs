use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A value flowing between the parser and a command handler.
///
/// Defaults, coerced tokens and handler results all share this shape.
/// `Null` stands for an explicit "no value" default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<Value>),
}

/// The closed set of parameter types a command can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Text,
    Integer,
    Float,
    Boolean,
    /// Trailing catch-all collecting leftover positional tokens.
    VariadicList,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoerceError {
    #[error("invalid integer value: '{0}'")]
    Integer(String),
    #[error("invalid float value: '{0}'")]
    Float(String),
    #[error("invalid boolean value: '{0}' (expected true/false, yes/no, on/off, 1/0)")]
    Boolean(String),
    #[error("invalid choice: '{value}' (choose from {choices})")]
    Choice { value: String, choices: String },
}

impl ParamType {
    /// Display name used in synthesized parameter descriptions.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamType::Text => "Text",
            ParamType::Integer | ParamType::Float => "Number",
            ParamType::Boolean => "Boolean",
            ParamType::VariadicList => "ListOfArguments",
        }
    }

    /// Convert one raw command-line token into a value of this type.
    ///
    /// Elements of a variadic list are kept as text.
    pub fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        match self {
            ParamType::Text | ParamType::VariadicList => Ok(Value::Text(raw.to_string())),
            ParamType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| CoerceError::Integer(raw.to_string())),
            ParamType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| CoerceError::Float(raw.to_string())),
            ParamType::Boolean => parse_bool(raw)
                .map(Value::Boolean)
                .ok_or_else(|| CoerceError::Boolean(raw.to_string())),
        }
    }

    /// Coerce a token and check it against an optional restricted value set.
    pub fn coerce_choice(
        &self,
        raw: &str,
        choices: Option<&[Value]>,
    ) -> Result<Value, CoerceError> {
        let value = self.coerce(raw)?;
        match choices {
            Some(allowed) if !allowed.contains(&value) => Err(CoerceError::Choice {
                value: raw.to_string(),
                choices: format_choices(allowed),
            }),
            _ => Ok(value),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Render a choice list as `a, b, c` for help and error messages.
pub fn format_choices(choices: &[Value]) -> String {
    choices
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Value {
    /// The parameter type a default value implies, if it implies one.
    ///
    /// `Null` carries no type information; lists are never a valid
    /// default for a scalar parameter.
    pub fn kind(&self) -> Option<ParamType> {
        match self {
            Value::Text(_) => Some(ParamType::Text),
            Value::Integer(_) => Some(ParamType::Integer),
            Value::Float(_) => Some(ParamType::Float),
            Value::Boolean(_) => Some(ParamType::Boolean),
            Value::Null | Value::List(_) => None,
        }
    }

    /// Truthiness used to decide which way a boolean switch flips.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Text(s) => !s.is_empty(),
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Boolean(b) => *b,
            Value::List(items) => !items.is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::List(items) => write!(f, "[{}]", format_choices(items)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
