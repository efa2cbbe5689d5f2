//! Dynamic value representation for document entries.
//!
//! This module provides the [`Value`] enum, the in-memory form of everything a
//! [`Document`] can hold.
//!
//! ## Numeric widths
//!
//! Numbers keep the width they were stored with. A `Byte(99)` stays a byte for
//! as long as the document lives in memory, but JSON text has no notion of
//! width: after printing and reparsing, integers come back as [`Value::Int`]
//! when they fit in 32 bits and as [`Value::Long`] otherwise, and every
//! non-integer comes back as [`Value::Double`]. Re-fetch through the typed
//! getter of the width you want (`get_byte`, `get_float`, ...) instead of
//! relying on the variant returned by `get`.
//!
//! ```rust
//! use confdoc::{Document, Value};
//!
//! let doc = Document::new();
//! doc.set("small", 99i8).unwrap();
//! assert_eq!(doc.get("small").unwrap(), Value::Byte(99));
//!
//! let reloaded = Document::parse(&doc.to_text()).unwrap();
//! assert_eq!(reloaded.get("small").unwrap(), Value::Int(99));
//! assert_eq!(reloaded.get_byte("small").unwrap(), 99);
//! ```
//!
//! ## Native and foreign values
//!
//! Every variant except [`Value::Foreign`] maps directly onto JSON. A foreign
//! value is an arbitrary serializable Rust value held as-is; see
//! [`Foreign`] and the [`codec`](crate::codec) module.

use crate::codec::{Class, Foreign};
use crate::{Document, Map};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed document value.
///
/// # Examples
///
/// ```rust
/// use confdoc::Value;
///
/// let null = Value::Null;
/// let num = Value::from(42);
/// let text = Value::from("hello");
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// A unit enum variant, stored by name.
    Enum(String),
    Array(Vec<Value>),
    /// A nested document. Cloning the value shares the underlying tree.
    Object(Document),
    Foreign(Foreign),
}

impl Value {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a number of any width.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(
            self,
            Value::Byte(_)
                | Value::Short(_)
                | Value::Int(_)
                | Value::Long(_)
                | Value::Float(_)
                | Value::Double(_)
        )
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is a nested document.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` if the value is a foreign value.
    #[inline]
    #[must_use]
    pub const fn is_foreign(&self) -> bool {
        matches!(self, Value::Foreign(_))
    }

    /// Whether the value maps directly onto JSON or needs encoding.
    ///
    /// ```rust
    /// use confdoc::{Class, Foreign, Value};
    ///
    /// assert_eq!(Value::from(1.5f32).class(), Class::Native);
    /// let foreign = Foreign::new(vec![(1u8, 'x')]).unwrap();
    /// assert_eq!(Value::from(foreign).class(), Class::Foreign);
    /// ```
    #[inline]
    #[must_use]
    pub const fn class(&self) -> Class {
        match self {
            Value::Foreign(_) => Class::Foreign,
            _ => Class::Native,
        }
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    ///
    /// ```rust
    /// use confdoc::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integral view of a numeric value.
    ///
    /// Integers of every width convert; floats convert only when they are
    /// finite, whole and within `i64` range.
    ///
    /// ```rust
    /// use confdoc::Value;
    ///
    /// assert_eq!(Value::Short(-7).as_i64(), Some(-7));
    /// assert_eq!(Value::Double(42.0).as_i64(), Some(42));
    /// assert_eq!(Value::Double(42.5).as_i64(), None);
    /// assert_eq!(Value::from("42").as_i64(), None);
    /// ```
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(i64::from(*v)),
            Value::Short(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            Value::Float(v) => whole_f64_to_i64(f64::from(*v)),
            Value::Double(v) => whole_f64_to_i64(*v),
            _ => None,
        }
    }

    /// Floating-point view of a numeric value.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Byte(v) => Some(f64::from(*v)),
            Value::Short(v) => Some(f64::from(*v)),
            Value::Int(v) => Some(f64::from(*v)),
            Value::Long(v) => Some(*v as f64),
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is a nested document, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Object(doc) => Some(doc),
            _ => None,
        }
    }

    /// If the value is a foreign value, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_foreign(&self) -> Option<&Foreign> {
        match self {
            Value::Foreign(f) => Some(f),
            _ => None,
        }
    }

    /// Short lowercase name of the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Char(_) => "char",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Enum(_) => "enum",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Foreign(_) => "foreign",
        }
    }

    /// Copies the value, giving nested documents their own trees.
    #[must_use]
    pub fn deep_clone(&self) -> Value {
        match self {
            Value::Object(doc) => Value::Object(doc.deep_clone()),
            Value::Array(items) => Value::Array(items.iter().map(Value::deep_clone).collect()),
            other => other.clone(),
        }
    }

    /// Returns `false` if this value, or anything inside an array, is a
    /// non-finite float.
    pub(crate) fn is_finite(&self) -> bool {
        match self {
            Value::Float(v) => v.is_finite(),
            Value::Double(v) => v.is_finite(),
            Value::Array(items) => items.iter().all(Value::is_finite),
            _ => true,
        }
    }
}

// `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
fn whole_f64_to_i64(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Char(c) => write!(f, "{}", c),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::String(s) | Value::Enum(s) => write!(f, "{}", s),
            Value::Array(arr) => {
                write!(
                    f,
                    "[{}]",
                    arr.iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
            Value::Object(doc) => write!(f, "{}", doc),
            Value::Foreign(foreign) => write!(f, "{}", foreign.json()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Byte(v) => serializer.serialize_i8(*v),
            Value::Short(v) => serializer.serialize_i16(*v),
            Value::Char(c) => serializer.serialize_char(*c),
            Value::Int(v) => serializer.serialize_i32(*v),
            Value::Long(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f32(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::String(s) | Value::Enum(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(doc) => doc.serialize(serializer),
            Value::Foreign(foreign) => foreign.json().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid JSON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(match i32::try_from(value) {
                    Ok(v) => Value::Int(v),
                    Err(_) => Value::Long(value),
                })
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                if let Ok(v) = i32::try_from(value) {
                    Ok(Value::Int(v))
                } else if let Ok(v) = i64::try_from(value) {
                    Ok(Value::Long(v))
                } else {
                    Ok(Value::Double(value as f64))
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Double(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Map::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(Document::from_map(values)))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// From implementations for creating Value from primitives
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Byte(value)
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Short(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Short(i16::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Int(i32::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Long(i64::from(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Object(value)
    }
}

impl From<&Document> for Value {
    fn from(value: &Document) -> Self {
        Value::Object(value.clone())
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Object(Document::from_map(value))
    }
}

impl From<Foreign> for Value {
    fn from(value: Foreign) -> Self {
        Value::Foreign(value)
    }
}
