//! Typed conversion between tree values and Rust types.
//!
//! Conversions are exact: integer targets accept only integer values and
//! reject out-of-range ones, floats accept only floats, and so on.

use crate::value::{Value, ValueKind};
use simcfg_common::{Error, Result};

/// A type that can be read from, and recorded back into, the tree.
pub trait Setting: Sized {
    /// Kind reported in mismatch errors.
    const KIND: &'static str;

    /// Integer targets report out-of-range integers as overflow rather than
    /// as a kind mismatch.
    const INTEGER: bool = false;

    /// Convert a tree value, or `None` if the kind or range does not match.
    fn from_value(value: &Value) -> Option<Self>;

    /// Tree value to record for this setting, or `None` if unrepresentable.
    fn to_value(&self) -> Option<Value>;
}

macro_rules! int_setting {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl Setting for $t {
                const KIND: &'static str = $name;
                const INTEGER: bool = true;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(i) => <$t>::try_from(*i).ok(),
                        _ => None,
                    }
                }

                fn to_value(&self) -> Option<Value> {
                    i64::try_from(*self).ok().map(Value::Int)
                }
            }
        )*
    };
}

int_setting! {
    i32 => "i32",
    u32 => "u32",
    i64 => "i64",
    u64 => "u64",
}

impl Setting for bool {
    const KIND: &'static str = "boolean";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn to_value(&self) -> Option<Value> {
        Some(Value::Bool(*self))
    }
}

impl Setting for f64 {
    const KIND: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn to_value(&self) -> Option<Value> {
        Some(Value::Float(*self))
    }
}

impl Setting for String {
    const KIND: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn to_value(&self) -> Option<Value> {
        Some(Value::Str(self.clone()))
    }
}

/// Raw node of any kind. Reading a group this way marks the whole subtree used.
impl Setting for Value {
    const KIND: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn to_value(&self) -> Option<Value> {
        Some(self.clone())
    }
}

/// Convert `value` found at `key` into `T`, classifying the failure.
pub(crate) fn convert<T: Setting>(key: &str, value: &Value) -> Result<T> {
    if let Some(v) = T::from_value(value) {
        return Ok(v);
    }
    match value {
        // Right kind, wrong range.
        Value::Int(i) if T::INTEGER => Err(Error::IntegerOverflow {
            key: key.to_string(),
            value: i.to_string(),
            target: T::KIND.to_string(),
        }),
        other => Err(mismatch::<T>(key, other.kind())),
    }
}

/// Tree value to record for a default, failing if it cannot be represented.
pub(crate) fn default_value<T: Setting + std::fmt::Debug>(key: &str, default: &T) -> Result<Value> {
    default.to_value().ok_or_else(|| Error::IntegerOverflow {
        key: key.to_string(),
        value: format!("{default:?}"),
        target: "i64".to_string(),
    })
}

pub(crate) fn mismatch<T: Setting>(key: &str, found: ValueKind) -> Error {
    Error::TypeMismatch {
        key: key.to_string(),
        expected: T::KIND.to_string(),
        found: found.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_accept_only_int_values() {
        assert_eq!(u32::from_value(&Value::Int(7)), Some(7));
        assert_eq!(u32::from_value(&Value::Float(7.0)), None);
        assert_eq!(i64::from_value(&Value::Int(-3)), Some(-3));
        assert_eq!(u64::from_value(&Value::Int(-3)), None);
    }

    #[test]
    fn float_does_not_accept_int() {
        assert_eq!(f64::from_value(&Value::Int(1)), None);
        assert_eq!(f64::from_value(&Value::Float(0.5)), Some(0.5));
    }

    #[test]
    fn convert_reports_mismatch_with_kinds() {
        let err = convert::<u32>("sys.cores", &Value::Float(1.5)).unwrap_err();
        match err {
            Error::TypeMismatch {
                key,
                expected,
                found,
            } => {
                assert_eq!(key, "sys.cores");
                assert_eq!(expected, "u32");
                assert_eq!(found, "float");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn convert_reports_overflow_for_out_of_range_int() {
        let err = convert::<u32>("freq", &Value::Int(-1)).unwrap_err();
        assert!(matches!(err, Error::IntegerOverflow { ref target, .. } if target == "u32"));

        let err = convert::<i32>("freq", &Value::Int(i64::MAX)).unwrap_err();
        assert_eq!(err.code(), 13);
    }

    #[test]
    fn only_integer_targets_report_overflow() {
        assert!(u64::INTEGER && i32::INTEGER);
        assert!(!f64::INTEGER && !String::INTEGER && !Value::INTEGER);

        let err = convert::<bool>("flag", &Value::Int(2)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn unrepresentable_default_is_rejected() {
        let err = default_value("big", &u64::MAX).unwrap_err();
        assert!(matches!(err, Error::IntegerOverflow { .. }));
        assert_eq!(default_value("ok", &5u64).unwrap(), Value::Int(5));
    }

    #[test]
    fn raw_value_accepts_anything() {
        let g = Value::empty_group();
        assert_eq!(Value::from_value(&g), Some(g.clone()));
        assert_eq!(
            Value::from_value(&Value::from("x")),
            Some(Value::Str("x".into()))
        );
    }
}
