//! Typed key/value metadata attached to lifecycle events.
//!
//! [`Field`] is the pair type crossing the group/observer boundary. Values are
//! a closed tagged union ([`FieldValue`]) so observers keep type information
//! without downcasting.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

/// A single key/value metadata pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field key, stable per runnable.
    pub key: Cow<'static, str>,
    /// Typed value.
    pub value: FieldValue,
}

/// The closed set of value types a [`Field`] can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// UTF-8 string.
    Str(Cow<'static, str>),
    /// Signed integer.
    I64(i64),
    /// Unsigned integer.
    U64(u64),
    /// Floating point.
    F64(f64),
    /// Boolean.
    Bool(bool),
    /// Duration (rendered in Debug form, e.g. `250ms`).
    Duration(Duration),
}

impl Field {
    /// String field.
    pub fn str(key: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Str(value.into()),
        }
    }

    /// Signed integer field.
    pub fn i64(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::I64(value),
        }
    }

    /// Unsigned integer field.
    pub fn u64(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::U64(value),
        }
    }

    /// Floating point field.
    pub fn f64(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::F64(value),
        }
    }

    /// Boolean field.
    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Bool(value),
        }
    }

    /// Duration field.
    pub fn duration(key: impl Into<Cow<'static, str>>, value: Duration) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Duration(value),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => write!(f, "{s:?}"),
            FieldValue::I64(v) => write!(f, "{v}"),
            FieldValue::U64(v) => write!(f, "{v}"),
            FieldValue::F64(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Duration(d) => write!(f, "{d:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_preserves_type_shape() {
        assert_eq!(Field::str("k", "v").value.to_string(), "\"v\"");
        assert_eq!(Field::i64("k", -3).value.to_string(), "-3");
        assert_eq!(Field::bool("k", true).value.to_string(), "true");
        assert_eq!(
            Field::duration("k", Duration::from_millis(250)).value.to_string(),
            "250ms"
        );
    }
}
