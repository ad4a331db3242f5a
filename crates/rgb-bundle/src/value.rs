//! The closed set of values a bundle can hold.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Bundle;

/// A value stored in a [`Bundle`].
///
/// Every entry is one of the scalar kinds below or a nested bundle. There is
/// no variant for references of any kind: bundles carry passive data only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
    Bytes(Vec<u8>),
    Bundle(Bundle),
}

/// Tag of a [`Value`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    I32,
    I64,
    U32,
    U64,
    F32,
    F64,
    Char,
    String,
    Bytes,
    Bundle,
}

impl ValueKind {
    /// Lowercase name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Bundle => "bundle",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Get the kind tag of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::I32(_) => ValueKind::I32,
            Self::I64(_) => ValueKind::I64,
            Self::U32(_) => ValueKind::U32,
            Self::U64(_) => ValueKind::U64,
            Self::F32(_) => ValueKind::F32,
            Self::F64(_) => ValueKind::F64,
            Self::Char(_) => ValueKind::Char,
            Self::String(_) => ValueKind::String,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Bundle(_) => ValueKind::Bundle,
        }
    }

    /// Borrow the nested bundle, if this is one.
    #[must_use]
    pub const fn as_bundle(&self) -> Option<&Bundle> {
        match self {
            Self::Bundle(bundle) => Some(bundle),
            _ => None,
        }
    }

    /// Mutably borrow the nested bundle, if this is one.
    pub fn as_bundle_mut(&mut self) -> Option<&mut Bundle> {
        match self {
            Self::Bundle(bundle) => Some(bundle),
            _ => None,
        }
    }

    /// Borrow the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v:?}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Self::Bundle(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

/// Types that can be read back out of a [`Bundle`] with
/// [`get`](Bundle::get).
///
/// `KIND` is the only kind `from_value` accepts. Conversions are strict: an
/// `i32` entry is not readable as `i64`, and an `f32` entry is not readable
/// as `f64`.
///
/// Implement this (together with `From<T> for Value`) for a domain type that
/// stores itself as a nested bundle:
///
/// ```ignore
/// impl From<Vec2> for Value {
///     fn from(v: Vec2) -> Self {
///         let mut b = Bundle::new("Vec2");
///         b.put("x", v.x);
///         b.put("y", v.y);
///         Value::Bundle(b)
///     }
/// }
///
/// impl BundleValue for Vec2 {
///     const KIND: ValueKind = ValueKind::Bundle;
///
///     fn from_value(value: &Value) -> Option<Self> {
///         let b = value.as_bundle()?;
///         Some(Self { x: b.get("x")?, y: b.get("y")? })
///     }
/// }
/// ```
pub trait BundleValue: Into<Value> + Sized {
    /// Kind this type is stored as.
    const KIND: ValueKind;

    /// Convert a stored value, or `None` if it holds a different kind.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! copy_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl BundleValue for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(*v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

macro_rules! owned_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl BundleValue for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

copy_value! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
}

owned_value! {
    String => String,
    Vec<u8> => Bytes,
    Bundle => Bundle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
        assert_eq!(Value::from(1_i32).kind(), ValueKind::I32);
        assert_eq!(Value::from(1_i64).kind(), ValueKind::I64);
        assert_eq!(Value::from(1_u32).kind(), ValueKind::U32);
        assert_eq!(Value::from(1_u64).kind(), ValueKind::U64);
        assert_eq!(Value::from(1.0_f32).kind(), ValueKind::F32);
        assert_eq!(Value::from(1.0_f64).kind(), ValueKind::F64);
        assert_eq!(Value::from('a').kind(), ValueKind::Char);
        assert_eq!(Value::from("a").kind(), ValueKind::String);
        assert_eq!(Value::from(vec![1_u8]).kind(), ValueKind::Bytes);
        assert_eq!(Value::from(Bundle::new("b")).kind(), ValueKind::Bundle);
    }

    #[test]
    fn test_conversion_is_strict() {
        let value = Value::from(7_i32);

        assert_eq!(i32::from_value(&value), Some(7));
        assert_eq!(i64::from_value(&value), None);
        assert_eq!(u32::from_value(&value), None);
        assert_eq!(f64::from_value(&value), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(42_u64).to_string(), "42");
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
        assert_eq!(Value::from(vec![0_u8; 3]).to_string(), "<3 bytes>");
        assert_eq!(ValueKind::Bundle.to_string(), "bundle");
    }

    #[test]
    fn test_as_bundle() {
        let mut value = Value::from(Bundle::new("inner"));
        assert_eq!(value.as_bundle().map(Bundle::name), Some("inner"));

        if let Some(inner) = value.as_bundle_mut() {
            inner.put("k", 1_i32);
        }
        assert_eq!(value.as_bundle().and_then(|b| b.get::<i32>("k")), Some(1));

        assert!(Value::from(1_i32).as_bundle().is_none());
        assert_eq!(Value::from("s").as_str(), Some("s"));
    }
}
