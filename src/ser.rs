//! Serialize Rust data structures into document [`Value`]s.
//!
//! [`ValueSerializer`] is the bridge used by [`Document::from_serialize`] and
//! [`Document::set_enum`]. Unlike a JSON round-trip it keeps numeric widths: an
//! `i8` field becomes a [`Value::Byte`], an `f32` a [`Value::Float`], a `char` a
//! [`Value::Char`].
//!
//! Enums follow serde's externally tagged layout. Unit variants become
//! [`Value::Enum`]; data-carrying variants become a single-entry document keyed
//! by the variant name.
//!
//! ## Examples
//!
//! ```rust
//! use confdoc::{to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Limits { retries: i8, ratio: f32 }
//!
//! let value = to_value(&Limits { retries: 3, ratio: 0.5 }).unwrap();
//! let doc = value.as_document().unwrap();
//! assert_eq!(doc.get("retries").unwrap(), Value::Byte(3));
//! assert_eq!(doc.get("ratio").unwrap(), Value::Float(0.5));
//! ```
//!
//! [`Document::from_serialize`]: crate::Document::from_serialize
//! [`Document::set_enum`]: crate::Document::set_enum

use crate::{Document, Error, Map, Result, Value};
use serde::ser::{self, Impossible, Serialize};

/// Serializes any `T: Serialize` into a [`Value`].
///
/// # Errors
///
/// - [`Error::InvalidValue`] for non-finite floats
/// - [`Error::Custom`] for map keys that are not strings, chars or integers
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serializer producing [`Value`]s.
pub struct ValueSerializer;

/// Whether `value` serializes as null: `None`, `()` or a unit struct, possibly
/// behind newtype structs. Nothing beyond the outermost layer is visited.
pub(crate) fn is_null<T>(value: &T) -> bool
where
    T: ?Sized + Serialize,
{
    matches!(value.serialize(NullCheck), Ok(true))
}

struct NullCheck;

fn not_null<S>() -> Result<S> {
    Err(Error::custom("not null"))
}

impl ser::Serializer for NullCheck {
    type Ok = bool;
    type Error = Error;

    type SerializeSeq = Impossible<bool, Error>;
    type SerializeTuple = Impossible<bool, Error>;
    type SerializeTupleStruct = Impossible<bool, Error>;
    type SerializeTupleVariant = Impossible<bool, Error>;
    type SerializeMap = Impossible<bool, Error>;
    type SerializeStruct = Impossible<bool, Error>;
    type SerializeStructVariant = Impossible<bool, Error>;

    fn serialize_bool(self, _v: bool) -> Result<bool> {
        Ok(false)
    }

    fn serialize_i8(self, _v: i8) -> Result<bool> {
        Ok(false)
    }

    fn serialize_i16(self, _v: i16) -> Result<bool> {
        Ok(false)
    }

    fn serialize_i32(self, _v: i32) -> Result<bool> {
        Ok(false)
    }

    fn serialize_i64(self, _v: i64) -> Result<bool> {
        Ok(false)
    }

    fn serialize_u8(self, _v: u8) -> Result<bool> {
        Ok(false)
    }

    fn serialize_u16(self, _v: u16) -> Result<bool> {
        Ok(false)
    }

    fn serialize_u32(self, _v: u32) -> Result<bool> {
        Ok(false)
    }

    fn serialize_u64(self, _v: u64) -> Result<bool> {
        Ok(false)
    }

    fn serialize_f32(self, _v: f32) -> Result<bool> {
        Ok(false)
    }

    fn serialize_f64(self, _v: f64) -> Result<bool> {
        Ok(false)
    }

    fn serialize_char(self, _v: char) -> Result<bool> {
        Ok(false)
    }

    fn serialize_str(self, _v: &str) -> Result<bool> {
        Ok(false)
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<bool> {
        Ok(false)
    }

    fn serialize_none(self) -> Result<bool> {
        Ok(true)
    }

    fn serialize_some<T>(self, _value: &T) -> Result<bool>
    where
        T: ?Sized + Serialize,
    {
        Ok(false)
    }

    fn serialize_unit(self) -> Result<bool> {
        Ok(true)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<bool> {
        Ok(true)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<bool> {
        Ok(false)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<bool>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<bool>
    where
        T: ?Sized + Serialize,
    {
        Ok(false)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        not_null()
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        not_null()
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        not_null()
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        not_null()
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        not_null()
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        not_null()
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        not_null()
    }
}

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: Map,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

fn finite(v: f64) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid_value(format!("{} cannot be stored", v)))
    }
}

fn tagged(variant: &'static str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(variant.to_string(), value);
    Value::Object(Document::from_map(map))
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Byte(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Short(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Long(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        match i64::try_from(v) {
            Ok(v) => Ok(Value::Long(v)),
            Err(_) => Ok(Value::Double(v as f64)),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        finite(f64::from(v))?;
        Ok(Value::Float(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        finite(v)?;
        Ok(Value::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(v.iter().map(|&b| Value::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::Enum(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

impl SerializeVec {
    fn new(len: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(len),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        let array = Value::Array(self.vec);
        match self.variant {
            Some(variant) => tagged(variant, array),
            None => array,
        }
    }
}

impl SerializeMap {
    fn new(len: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: Map::with_capacity(len),
            current_key: None,
            variant,
        }
    }

    // A null entry is an absent key, as with `Document::set`.
    fn insert<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = to_value(value)?;
        if !value.is_null() {
            self.map.insert(key, value);
        }
        Ok(())
    }

    fn finish(self) -> Value {
        let object = Value::Object(Document::from_map(self.map));
        match self.variant {
            Some(variant) => tagged(variant, object),
            None => object,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_value(key)? {
            Value::String(s) | Value::Enum(s) => s,
            Value::Char(c) => c.to_string(),
            integer @ (Value::Byte(_) | Value::Short(_) | Value::Int(_) | Value::Long(_)) => {
                integer.to_string()
            }
            other => {
                return Err(Error::custom(format!(
                    "map keys must be strings, found {}",
                    other.type_name()
                )))
            }
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect { w: i32, h: i32 },
        Pair(i8, i8),
    }

    #[test]
    fn test_unit_variant_is_enum() {
        assert_eq!(
            to_value(&Shape::Empty).unwrap(),
            Value::Enum("Empty".to_string())
        );
    }

    #[test]
    fn test_data_variants_are_tagged() {
        let circle = to_value(&Shape::Circle(1.5)).unwrap();
        let doc = circle.as_document().unwrap();
        assert_eq!(doc.get("Circle").unwrap(), Value::Double(1.5));

        let rect = to_value(&Shape::Rect { w: 2, h: 3 }).unwrap();
        let inner = rect.as_document().unwrap().get_document("Rect").unwrap();
        assert_eq!(inner.get_int("h").unwrap(), 3);

        let pair = to_value(&Shape::Pair(1, 2)).unwrap();
        assert_eq!(
            pair.as_document().unwrap().get("Pair").unwrap(),
            Value::Array(vec![Value::Byte(1), Value::Byte(2)])
        );
    }

    #[test]
    fn test_integer_map_keys() {
        let mut map = BTreeMap::new();
        map.insert(1u32, "one");
        map.insert(2u32, "two");
        let value = to_value(&map).unwrap();
        let doc = value.as_document().unwrap();
        assert_eq!(doc.get_string("2").unwrap(), "two");
    }

    #[test]
    fn test_non_string_keys_rejected() {
        let mut map = BTreeMap::new();
        map.insert(vec![1], 1);
        assert!(to_value(&map).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            to_value(&vec![1.0f32, f32::NAN]),
            Err(Error::InvalidValue(_))
        ));
    }

    #[test]
    fn test_widths_kept() {
        assert_eq!(to_value(&7u8).unwrap(), Value::Short(7));
        assert_eq!(to_value(&u64::MAX).unwrap(), Value::Double(u64::MAX as f64));
        assert_eq!(to_value(&'c').unwrap(), Value::Char('c'));
    }

    #[derive(Serialize)]
    struct Proxy {
        host: &'static str,
        port: Option<u16>,
    }

    #[derive(Serialize)]
    struct Wrapper(Option<u8>);

    #[test]
    fn test_none_fields_are_absent() {
        let value = to_value(&Proxy {
            host: "edge",
            port: None,
        })
        .unwrap();
        let doc = value.as_document().unwrap();
        assert!(doc.has_key("host"));
        assert!(!doc.has_key("port"));

        let mut map = BTreeMap::new();
        map.insert("a", Some(1));
        map.insert("b", None);
        let value = to_value(&map).unwrap();
        let doc = value.as_document().unwrap();
        assert_eq!(doc.keys().len(), 1);
        assert!(!doc.has_key("b"));
    }

    #[test]
    fn test_is_null() {
        assert!(is_null(&None::<i32>));
        assert!(is_null(&()));
        assert!(is_null(&Wrapper(None)));
        assert!(!is_null(&Wrapper(Some(0))));
        assert!(!is_null(&Some(())));
        assert!(!is_null(&0));
        assert!(!is_null(&vec![()]));
        assert!(!is_null(&Shape::Empty));
    }
}
