//! Typed view over a JSON document tree.
//!
//! A [`Document`] is a handle onto a shared, mutable [`Map`]. Cloning a handle
//! does not copy the tree: every handle, including the ones returned by
//! [`Document::get_document`] for nested objects, observes the mutations made
//! through the others. [`Document::deep_clone`] and [`Document::parse`] produce
//! independent trees.
//!
//! Every typed getter comes in two flavours:
//!
//! - `get_x(key)` returns `Result<T, KeyError>`, failing when the key is absent
//!   or its value cannot be coerced to `T`
//! - `get_x_or(key, fallback)` calls `get_x` and returns `fallback` on any
//!   [`KeyError`]; it never fails, even for a present key of the wrong type
//!
//! ## Examples
//!
//! ```rust
//! use confdoc::Document;
//!
//! let doc = Document::parse(r#"{"port":8080,"name":"edge"}"#).unwrap();
//! assert_eq!(doc.get_int("port").unwrap(), 8080);
//! assert_eq!(doc.get_int_or("name", 1), 1);
//!
//! let alias = doc.clone();
//! alias.set("debug", true).unwrap();
//! assert!(doc.get_bool("debug").unwrap());
//! ```

use crate::codec::{self, Encodable, Encoded, Foreign};
use crate::{de, ser, DecodeError, Error, KeyError, Map, Result, TextOptions, Value};
use indexmap::IndexSet;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::any;
use std::cell::RefCell;
use std::fmt;
use std::io;
use std::rc::Rc;
use std::str::FromStr;
use tracing::trace;

/// A shared handle onto a JSON object tree with typed accessors.
#[derive(Clone, Default)]
pub struct Document {
    content: Rc<RefCell<Map>>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document owning `map`.
    #[must_use]
    pub fn from_map(map: Map) -> Self {
        Document {
            content: Rc::new(RefCell::new(map)),
        }
    }

    /// Parses JSON text into a fresh document.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] if the text is not JSON or its top level is not an
    /// object.
    pub fn parse(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(doc) => Ok(doc),
            other => Err(Error::parse(format!(
                "expected a JSON object, found {}",
                other.type_name()
            ))),
        }
    }

    /// Another handle onto the same tree. Same as `clone`.
    #[must_use]
    pub fn share(&self) -> Self {
        self.clone()
    }

    /// Returns `true` if both handles point at the same tree.
    #[must_use]
    pub fn same_tree(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.content, &other.content)
    }

    /// Copies the whole tree, nested documents included.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        let map = self
            .content
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.deep_clone()))
            .collect();
        Document::from_map(map)
    }

    /// Snapshot of the top-level entries. Nested documents stay shared.
    #[must_use]
    pub fn to_map(&self) -> Map {
        self.content.borrow().clone()
    }

    /// Builds a document from any serializable struct or map.
    ///
    /// ```rust
    /// use confdoc::Document;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Server { host: String, port: u16 }
    ///
    /// let doc = Document::from_serialize(&Server { host: "localhost".into(), port: 80 }).unwrap();
    /// assert_eq!(doc.get_string("host").unwrap(), "localhost");
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::InvalidValue`] if `value` does not serialize to an object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        match ser::to_value(value)? {
            Value::Object(doc) => Ok(doc),
            other => Err(Error::invalid_value(format!(
                "expected a struct or map, found {}",
                other.type_name()
            ))),
        }
    }

    /// Binds the document to a typed struct.
    ///
    /// # Errors
    ///
    /// Returns an error if the document's shape does not match `T`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T> {
        de::from_value(Value::Object(self.clone()))
    }

    // Lookup

    fn lookup<T>(
        &self,
        key: &str,
        expected: &'static str,
        coerce: impl FnOnce(&Value) -> Option<T>,
    ) -> std::result::Result<T, KeyError> {
        let content = self.content.borrow();
        let value = content.get(key).ok_or_else(|| KeyError::missing(key))?;
        coerce(value).ok_or_else(|| KeyError::mismatch(key, expected, value.type_name()))
    }

    /// Returns the value stored under `key`.
    ///
    /// A nested document comes back as a handle onto the same tree.
    pub fn get(&self, key: &str) -> std::result::Result<Value, KeyError> {
        self.lookup(key, "value", |v| Some(v.clone()))
    }

    pub fn get_or(&self, key: &str, fallback: impl Into<Value>) -> Value {
        or_fallback(key, self.get(key), fallback.into())
    }

    /// Returns the string under `key`. Enum names count as strings.
    pub fn get_string(&self, key: &str) -> std::result::Result<String, KeyError> {
        self.lookup(key, "string", |v| match v {
            Value::String(s) | Value::Enum(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn get_string_or(&self, key: &str, fallback: impl Into<String>) -> String {
        or_fallback(key, self.get_string(key), fallback.into())
    }

    /// Returns the value under `key` as an `i32`.
    ///
    /// Accepts integers in range, whole finite floats, and strings that parse
    /// as either.
    pub fn get_int(&self, key: &str) -> std::result::Result<i32, KeyError> {
        self.lookup(key, "int", |v| integral(v).and_then(|n| i32::try_from(n).ok()))
    }

    pub fn get_int_or(&self, key: &str, fallback: i32) -> i32 {
        or_fallback(key, self.get_int(key), fallback)
    }

    /// Returns the value under `key` as an `i64`. Same rules as [`Document::get_int`].
    pub fn get_long(&self, key: &str) -> std::result::Result<i64, KeyError> {
        self.lookup(key, "long", integral)
    }

    pub fn get_long_or(&self, key: &str, fallback: i64) -> i64 {
        or_fallback(key, self.get_long(key), fallback)
    }

    /// Returns the value under `key` as an `f64`.
    pub fn get_double(&self, key: &str) -> std::result::Result<f64, KeyError> {
        self.lookup(key, "double", |v| {
            v.as_f64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        })
    }

    pub fn get_double_or(&self, key: &str, fallback: f64) -> f64 {
        or_fallback(key, self.get_double(key), fallback)
    }

    /// Returns the value under `key` as an `f32`, narrowing wider numbers.
    pub fn get_float(&self, key: &str) -> std::result::Result<f32, KeyError> {
        self.lookup(key, "float", |v| match v {
            Value::Float(f) => Some(*f),
            _ => v
                .as_f64()
                .map(|f| f as f32)
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
                .filter(|f| f.is_finite()),
        })
    }

    pub fn get_float_or(&self, key: &str, fallback: f32) -> f32 {
        or_fallback(key, self.get_float(key), fallback)
    }

    /// Returns the boolean under `key`. The strings `"true"` and `"false"`
    /// are accepted in any case.
    pub fn get_bool(&self, key: &str) -> std::result::Result<bool, KeyError> {
        self.lookup(key, "bool", |v| match v {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        })
    }

    pub fn get_bool_or(&self, key: &str, fallback: bool) -> bool {
        or_fallback(key, self.get_bool(key), fallback)
    }

    /// Returns the value under `key` as an `i8`.
    ///
    /// Numeric coercion is tried first, then string parsing; both fail with
    /// the same [`KeyError::Mismatch`].
    pub fn get_byte(&self, key: &str) -> std::result::Result<i8, KeyError> {
        self.lookup(key, "byte", |v| integral(v).and_then(|n| i8::try_from(n).ok()))
    }

    pub fn get_byte_or(&self, key: &str, fallback: i8) -> i8 {
        or_fallback(key, self.get_byte(key), fallback)
    }

    /// Returns the value under `key` as an `i16`. Same rules as [`Document::get_byte`].
    pub fn get_short(&self, key: &str) -> std::result::Result<i16, KeyError> {
        self.lookup(key, "short", |v| {
            integral(v).and_then(|n| i16::try_from(n).ok())
        })
    }

    pub fn get_short_or(&self, key: &str, fallback: i16) -> i16 {
        or_fallback(key, self.get_short(key), fallback)
    }

    /// Returns the value under `key` as a `char`.
    ///
    /// Accepts a stored char, an integral number naming a code point, a
    /// one-character string, or a string parsing as a code point.
    pub fn get_char(&self, key: &str) -> std::result::Result<char, KeyError> {
        self.lookup(key, "char", |v| match v {
            Value::Char(c) => Some(*c),
            Value::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => integral(v).and_then(code_point),
                }
            }
            _ => v.as_i64().and_then(code_point),
        })
    }

    pub fn get_char_or(&self, key: &str, fallback: char) -> char {
        or_fallback(key, self.get_char(key), fallback)
    }

    /// Returns the nested document under `key`.
    ///
    /// For an object value the returned handle shares the tree with this
    /// document. A string value is parsed as JSON into a fresh, independent
    /// document.
    pub fn get_document(&self, key: &str) -> std::result::Result<Document, KeyError> {
        self.lookup(key, "object", |v| match v {
            Value::Object(doc) => Some(doc.clone()),
            Value::String(s) => Document::parse(s).ok(),
            _ => None,
        })
    }

    pub fn get_document_or(&self, key: &str, fallback: Document) -> Document {
        or_fallback(key, self.get_document(key), fallback)
    }

    /// Returns a copy of the array under `key`.
    pub fn get_array(&self, key: &str) -> std::result::Result<Vec<Value>, KeyError> {
        self.lookup(key, "array", |v| v.as_array().cloned())
    }

    pub fn get_array_or(&self, key: &str, fallback: Vec<Value>) -> Vec<Value> {
        or_fallback(key, self.get_array(key), fallback)
    }

    /// Returns the enum variant named by the value under `key`.
    ///
    /// ```rust
    /// use confdoc::Document;
    /// use serde::{Deserialize, Serialize};
    ///
    /// #[derive(Serialize, Deserialize, PartialEq, Debug)]
    /// enum Mode { Fast, Safe }
    ///
    /// let doc = Document::new();
    /// doc.set_enum("mode", &Mode::Safe).unwrap();
    /// assert_eq!(doc.get_enum::<Mode>("mode").unwrap(), Mode::Safe);
    /// assert_eq!(doc.to_text(), r#"{"mode":"Safe"}"#);
    /// ```
    pub fn get_enum<E: DeserializeOwned>(&self, key: &str) -> std::result::Result<E, KeyError> {
        self.lookup(key, any::type_name::<E>(), |v| match v {
            Value::Enum(name) | Value::String(name) => {
                de::from_value(Value::Enum(name.clone())).ok()
            }
            _ => None,
        })
    }

    pub fn get_enum_or<E: DeserializeOwned>(&self, key: &str, fallback: E) -> E {
        or_fallback(key, self.get_enum(key), fallback)
    }

    /// Returns the foreign value stored under `key` by [`Document::set_foreign`].
    pub fn get_foreign(&self, key: &str) -> std::result::Result<Foreign, KeyError> {
        self.lookup(key, "foreign", |v| v.as_foreign().cloned())
    }

    /// Returns `true` if the document contains `key`.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.content.borrow().contains_key(key)
    }

    /// Snapshot of the keys, in insertion order. Changing the returned set does
    /// not affect the document.
    #[must_use]
    pub fn keys(&self) -> IndexSet<String> {
        self.content.borrow().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.content.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.borrow().is_empty()
    }

    // Mutation

    /// Stores `value` under `key`, returning the previous value.
    ///
    /// Storing [`Value::Null`] removes the key.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidValue`] if the value is a non-finite number (also inside
    /// arrays), or a document that contains this one.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<Option<Value>> {
        let value = value.into();
        if !value.is_finite() {
            return Err(Error::invalid_value(format!(
                "non-finite number under key {:?}",
                key
            )));
        }
        if references(&value, &self.content) {
            return Err(Error::invalid_value(format!(
                "document under key {:?} would contain itself",
                key
            )));
        }

        let mut content = self.content.borrow_mut();
        if value.is_null() {
            Ok(content.remove(key))
        } else {
            Ok(content.insert(key.to_string(), value))
        }
    }

    /// Removes `key`, returning its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.content.borrow_mut().remove(key)
    }

    /// Stores a handle onto `doc` under `key`; later changes to either are
    /// visible through both.
    pub fn set_document(&self, key: &str, doc: &Document) -> Result<Option<Value>> {
        self.set(key, doc)
    }

    /// Stores a unit enum variant by name.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidValue`] if `variant` is not a unit enum variant.
    pub fn set_enum<E: Serialize>(&self, key: &str, variant: &E) -> Result<Option<Value>> {
        match ser::to_value(variant)? {
            value @ Value::Enum(_) => self.set(key, value),
            other => Err(Error::invalid_value(format!(
                "expected a unit enum variant, found {}",
                other.type_name()
            ))),
        }
    }

    /// Stores a serializable value as-is.
    ///
    /// It prints as plain JSON unless the text is rendered with
    /// [`TextOptions::with_encode_unknown`], in which case it prints as an
    /// encoded payload.
    pub fn set_foreign<T: Encodable>(&self, key: &str, value: T) -> Result<Option<Value>> {
        self.set(key, Foreign::new(value)?)
    }

    // Encoded objects

    fn envelope(&self, key: &str) -> std::result::Result<Encoded, DecodeError> {
        let payload = self.lookup(key, "encoded payload", |v| v.as_str().map(str::to_owned))?;
        codec::decode_envelope(&payload)
    }

    /// Encodes `value` and stores the payload string under `key`.
    ///
    /// Returns the previous value if it was itself a payload, else `None`.
    ///
    /// ```rust
    /// use confdoc::Document;
    ///
    /// let doc = Document::new();
    /// assert!(doc.set_encoded("pair", &(1u8, 2u8)).unwrap().is_none());
    ///
    /// let previous = doc.set_encoded("pair", &(3u8, 4u8)).unwrap().unwrap();
    /// assert_eq!(previous.decode::<(u8, u8)>().unwrap(), (1, 2));
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::NullValue`] if the value is null (`None`), leaving the key
    /// untouched; [`Error::Encode`] if it cannot be serialized.
    pub fn set_encoded<T: Encodable>(&self, key: &str, value: &T) -> Result<Option<Encoded>> {
        let previous = self.envelope(key).ok();
        self.set(key, codec::encode(value)?)?;
        Ok(previous)
    }

    /// Decodes the payload string under `key`.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Key`] if the key is absent or not a string, otherwise
    /// the errors of [`codec::decode`].
    pub fn get_encoded<T: Encodable>(&self, key: &str) -> std::result::Result<T, DecodeError> {
        self.envelope(key)?.decode()
    }

    pub fn get_encoded_or<T: Encodable>(&self, key: &str, fallback: T) -> T {
        match self.get_encoded(key) {
            Ok(value) => value,
            Err(err) => {
                trace!(key, %err, "encoded value unavailable, using fallback");
                fallback
            }
        }
    }

    /// Returns `true` if the value under `key` is a string holding a payload,
    /// of any type.
    #[must_use]
    pub fn is_encoded_object(&self, key: &str) -> bool {
        self.envelope(key).is_ok()
    }

    /// Returns `true` if the value under `key` is a payload that decodes as a `T`.
    #[must_use]
    pub fn is_encoded_object_of<T: Encodable>(&self, key: &str) -> bool {
        self.get_encoded::<T>(key).is_ok()
    }

    // Text

    /// Compact JSON text of the whole tree.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// JSON text rendered with `options`. The document itself is never
    /// modified.
    ///
    /// ```rust
    /// use confdoc::{Document, TextOptions};
    ///
    /// let doc = Document::new();
    /// doc.set_foreign("origin", (3u32, 4u32)).unwrap();
    /// assert_eq!(doc.to_text(), r#"{"origin":[3,4]}"#);
    ///
    /// let text = doc.to_text_with(&TextOptions::new().with_encode_unknown(true));
    /// let reloaded = Document::parse(&text).unwrap();
    /// assert_eq!(reloaded.get_encoded::<(u32, u32)>("origin").unwrap(), (3, 4));
    /// ```
    #[must_use]
    pub fn to_text_with(&self, options: &TextOptions) -> String {
        Text { doc: self, options }.to_string()
    }

    /// Writes the JSON text to `writer`.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if writing fails.
    pub fn write_text<W: io::Write>(&self, writer: W, options: &TextOptions) -> Result<()> {
        let content = self.content.borrow();
        let snapshot = Snapshot {
            map: &content,
            encode_unknown: options.encode_unknown,
        };
        if options.pretty {
            let indent = vec![b' '; options.indent];
            let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
            let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
            snapshot.serialize(&mut serializer)?;
        } else {
            serde_json::to_writer(writer, &snapshot)?;
        }
        Ok(())
    }
}

fn or_fallback<T>(key: &str, result: std::result::Result<T, KeyError>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            trace!(key, %err, "using fallback");
            fallback
        }
    }
}

/// Numeric coercion first, then string parsing.
fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_str().and_then(parse_integral))
}

fn parse_integral(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| Value::Double(s.parse().ok()?).as_i64())
}

fn code_point(n: i64) -> Option<char> {
    u32::try_from(n).ok().and_then(char::from_u32)
}

fn references(value: &Value, target: &Rc<RefCell<Map>>) -> bool {
    match value {
        Value::Object(doc) => {
            Rc::ptr_eq(&doc.content, target)
                || doc.content.borrow().values().any(|v| references(v, target))
        }
        Value::Array(items) => items.iter().any(|v| references(v, target)),
        _ => false,
    }
}

/// Top-level entries, with foreign values optionally swapped for payloads.
struct Snapshot<'a> {
    map: &'a Map,
    encode_unknown: bool,
}

impl Serialize for Snapshot<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.map.len()))?;
        for (k, v) in self.map.iter() {
            match v {
                Value::Foreign(foreign) if self.encode_unknown => {
                    map.serialize_entry(k, &foreign.encode())?
                }
                _ => map.serialize_entry(k, v)?,
            }
        }
        map.end()
    }
}

struct Text<'a> {
    doc: &'a Document,
    options: &'a TextOptions,
}

impl fmt::Display for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = Vec::with_capacity(256);
        self.doc
            .write_text(&mut buffer, self.options)
            .map_err(|_| fmt::Error)?;
        f.write_str(std::str::from_utf8(&buffer).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = Text {
            doc: self,
            options: &TextOptions::default(),
        };
        fmt::Display::fmt(&text, f)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.content.borrow().iter()).finish()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.same_tree(other) || *self.content.borrow() == *other.content.borrow()
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Document::parse(s)
    }
}

impl From<Map> for Document {
    fn from(map: Map) -> Self {
        Document::from_map(map)
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.content.borrow().serialize(serializer)
    }
}
