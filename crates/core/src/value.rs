//! Runtime-typed values
//!
//! Dynamic member access cannot know member types at compile time, so values
//! cross the accessor boundary inside [`Value`]. Scalar variants carry plain
//! data; [`Value::Object`] carries a boxed introspectable object so that
//! object-typed parameters and wrapped targets stay first-class.
//!
//! Two accessor families coexist:
//! - `get_*` readers coerce between numeric kinds and fall back to a default,
//!   for callers that just want "a number out of whatever this is".
//! - `as_*`/`into_*` accessors are kind-exact (plus the conversions the
//!   coercive type-match policy permits) and return `None` on mismatch.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::introspect::Introspect;

/// The kind of a [`Value`], used for type checks and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// A dynamically-typed value passed through member access.
#[derive(Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Object(Box<dyn Introspect>),
}

impl Value {
    /// Wrap an introspectable object.
    pub fn object<T: Introspect>(object: T) -> Self {
        Value::Object(Box::new(object))
    }

    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    // ==================== COERCING GETTERS ====================

    /// Read as bool, coercing numeric kinds (non-zero is true).
    pub fn get_bool(&self, default: bool) -> bool {
        match self {
            Value::Bool(v) => *v,
            Value::Int(v) => *v != 0,
            Value::Float(v) => *v != 0.0,
            _ => default,
        }
    }

    /// Read as i64, coercing bool and float kinds.
    pub fn get_int(&self, default: i64) -> i64 {
        match self {
            Value::Bool(v) => *v as i64,
            Value::Int(v) => *v,
            Value::Float(v) => *v as i64,
            _ => default,
        }
    }

    /// Read as f64, coercing bool and int kinds.
    pub fn get_float(&self, default: f64) -> f64 {
        match self {
            Value::Bool(v) => *v as i64 as f64,
            Value::Int(v) => *v as f64,
            Value::Float(v) => *v,
            _ => default,
        }
    }

    /// String rendering of any kind. Null renders empty, objects render
    /// their class name.
    pub fn get_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Str(v) => v.clone(),
            Value::Object(o) => o.class_name().to_string(),
        }
    }

    // ==================== KIND-EXACT ACCESSORS ====================

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&dyn Introspect> {
        match self {
            Value::Object(o) => Some(o.as_ref()),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut dyn Introspect> {
        match self {
            Value::Object(o) => Some(o.as_mut()),
            _ => None,
        }
    }

    // ==================== OWNED CONVERTERS ====================
    //
    // These back the generated invoke shims. Each accepts exactly the kinds
    // the coercive type-match policy lets through to a parameter of the
    // target type.

    pub fn into_bool(self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(v),
            Value::Int(v) => Some(v != 0),
            _ => None,
        }
    }

    pub fn into_int(self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(v),
            Value::Bool(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn into_float(self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(v),
            Value::Int(v) => Some(v as f64),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Extract an owned object of concrete type `T`.
    pub fn into_object<T: Introspect>(self) -> Option<T> {
        match self {
            Value::Object(o) => o.into_any().downcast::<T>().ok().map(|b| *b),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Value::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Value::Object(o) => write!(f, "Object({})", o.class_name()),
        }
    }
}

/// Scalar variants compare by kind and payload. Objects never compare equal;
/// there is no identity or structural equality to fall back on.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(v as i64)
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Str(v) => serializer.serialize_str(v),
            // Objects have no data representation; emit the class name.
            Value::Object(o) => serializer.serialize_str(o.class_name()),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null, bool, integer, float or string")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Int(v as i64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::Str(v))
    }
}

/// Deserialization only produces data variants, never `Object`.
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::from(1).kind(), ValueKind::Int);
        assert_eq!(Value::from(1.5).kind(), ValueKind::Float);
        assert_eq!(Value::from("x").kind(), ValueKind::Str);
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(3)), Value::Int(3));
    }

    #[test]
    fn test_coercing_getters() {
        assert!(Value::Int(2).get_bool(false));
        assert_eq!(Value::Bool(true).get_int(0), 1);
        assert_eq!(Value::Int(3).get_float(0.0), 3.0);
        assert_eq!(Value::Str("abc".into()).get_int(7), 7);
        assert_eq!(Value::Null.get_string(), "");
        assert_eq!(Value::Float(1.5).get_string(), "1.5");
    }

    #[test]
    fn test_exact_accessors() {
        assert_eq!(Value::Int(3).as_int(), Some(3));
        assert_eq!(Value::Float(3.0).as_int(), None);
        assert_eq!(Value::Str("a".into()).as_str(), Some("a"));
        assert_eq!(Value::Int(1).as_bool(), None);
    }

    #[test]
    fn test_owned_converters() {
        assert_eq!(Value::Int(3).into_float(), Some(3.0));
        assert_eq!(Value::Float(3.0).into_int(), None);
        assert_eq!(Value::Bool(true).into_int(), Some(1));
        assert_eq!(Value::Str("s".into()).into_string(), Some("s".to_string()));
        assert_eq!(Value::Null.into_string(), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&Value::Int(42)).unwrap();
        assert_eq!(json, "42");
        assert_eq!(serde_json::from_str::<Value>("42").unwrap(), Value::Int(42));
        assert_eq!(
            serde_json::from_str::<Value>("null").unwrap(),
            Value::Null
        );
        assert_eq!(
            serde_json::from_str::<Value>("\"hi\"").unwrap(),
            Value::Str("hi".into())
        );
        assert_eq!(
            serde_json::from_str::<Value>("true").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            serde_json::from_str::<Value>("2.5").unwrap(),
            Value::Float(2.5)
        );
    }
}
