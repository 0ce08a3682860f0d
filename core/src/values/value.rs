use core::fmt;

use ecow::EcoString;

use crate::{
    ToString,
    values::{Kind, KindSet},
};

/// A runtime value.
///
/// Values are small and cheap to clone: strings are reference counted
/// (`EcoString`), everything else is stored inline.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(EcoString),
}

impl Value {
    /// The kind of this value.
    #[inline]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
        }
    }

    /// Returns true if the kind of this value is in `kinds`.
    #[inline]
    pub fn is_in(&self, kinds: KindSet) -> bool {
        kinds.accepts(self.kind())
    }

    pub fn str(value: &str) -> Self {
        Value::Str(EcoString::from(value))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric view used by mixed Int/Float operations.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::str(value)
    }
}

impl From<EcoString> for Value {
    fn from(value: EcoString) -> Self {
        Value::Str(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => format_float(f, *x),
            Value::Str(s) => write!(f, "{:?}", s.as_str()),
        }
    }
}

/// Format a float ensuring it always has a decimal point
fn format_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        write!(f, "nan")
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            write!(f, "inf")
        } else {
            write!(f, "-inf")
        }
    } else {
        let s = value.to_string();
        if s.contains('.') || s.contains('e') || s.contains('E') {
            write!(f, "{}", s)
        } else {
            write!(f, "{}.", s)
        }
    }
}

/// Rust types with a one-to-one mapping onto a [`Kind`].
///
/// Used by the typed fast accessors: extraction either yields the exact type
/// or hands the produced value back so the caller can re-specialize with it.
pub trait Typed: Sized {
    const KIND: Kind;

    /// Extract `Self` from `value`, or return the value unchanged on a kind
    /// mismatch.
    fn from_value(value: Value) -> Result<Self, Value>;
}

impl Typed for bool {
    const KIND: Kind = Kind::Bool;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl Typed for i64 {
    const KIND: Kind = Kind::Int;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(other),
        }
    }
}

impl Typed for f64 {
    const KIND: Kind = Kind::Float;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(x) => Ok(x),
            other => Err(other),
        }
    }
}

impl Typed for EcoString {
    const KIND: Kind = Kind::Str;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(other),
        }
    }
}
