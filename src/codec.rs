//! Encoded payloads for values JSON cannot represent.
//!
//! A payload is an ordinary JSON string holding the standard Base64 text of a
//! bincode-serialized envelope:
//!
//! ```text
//! Base64( bincode( Envelope { magic: b"CDOC", type_name, body: bincode(value) } ) )
//! ```
//!
//! - **magic**: rejects strings that merely happen to be valid Base64
//! - **type_name**: [`std::any::type_name`] of the encoded type; decoding into a
//!   different type fails with [`DecodeError::TypeResolution`]
//! - **body**: the value itself, fixed-width integers, trailing bytes rejected
//!
//! The format is deterministic for a given build but carries no compatibility
//! promise across versions of the encoded types.
//!
//! ## Examples
//!
//! ```rust
//! use confdoc::codec::{decode, encode};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Point { x: i32, y: i32 }
//!
//! let payload = encode(&Point { x: 1, y: 2 }).unwrap();
//! let back: Point = decode(&payload).unwrap();
//! assert_eq!(back, Point { x: 1, y: 2 });
//! ```

use crate::{ser, DecodeError, Error, Result, Value};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::{self, Any};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

const MAGIC: [u8; 4] = *b"CDOC";

/// Upper bound on decoded sizes, so a corrupt length prefix cannot force a
/// huge allocation.
const MAX_PAYLOAD_BYTES: u64 = 64 * 1024 * 1024;

/// Whether a value maps directly onto JSON or must be encoded to be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Null, bool, numbers of every width, char, string, enum, array, document.
    Native,
    /// Anything else, held as a [`Foreign`].
    Foreign,
}

/// Types eligible for encoding.
///
/// Implemented for every `Serialize + DeserializeOwned + 'static` type. Values
/// that bincode cannot round-trip (for example types relying on
/// `deserialize_any`, such as `serde_json::Value` or untagged enums) encode
/// fine but fail to decode with [`DecodeError::Structural`].
pub trait Encodable: Serialize + DeserializeOwned + 'static {}

impl<T> Encodable for T where T: Serialize + DeserializeOwned + 'static {}

#[derive(Serialize, Deserialize)]
struct Envelope {
    magic: [u8; 4],
    type_name: String,
    body: Vec<u8>,
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
        .with_limit(MAX_PAYLOAD_BYTES)
}

fn envelope_bytes<T: Encodable>(value: &T) -> Result<Vec<u8>> {
    if ser::is_null(value) {
        return Err(Error::NullValue);
    }
    let envelope = Envelope {
        magic: MAGIC,
        type_name: any::type_name::<T>().to_string(),
        body: options().serialize(value)?,
    };
    Ok(options().serialize(&envelope)?)
}

/// Serializes a value into a Base64 payload string.
///
/// # Errors
///
/// - [`Error::NullValue`] if the value serializes as null (`None` or `()`)
/// - [`Error::Encode`] if the value cannot be serialized (for example a
///   sequence of unknown length)
pub fn encode<T: Encodable>(value: &T) -> Result<String> {
    Ok(BASE64.encode(envelope_bytes(value)?))
}

/// Payload for a document value.
///
/// # Errors
///
/// - [`Error::NullValue`] for [`Value::Null`]
/// - [`Error::InvalidValue`] for native values, which are stored directly
pub fn encode_value(value: &Value) -> Result<String> {
    match value {
        Value::Null => Err(Error::NullValue),
        Value::Foreign(foreign) => Ok(foreign.encode()),
        other => Err(Error::invalid_value(format!(
            "{} values are stored as JSON and are never encoded",
            other.type_name()
        ))),
    }
}

/// Decodes a payload string into a `T`.
///
/// # Errors
///
/// - [`DecodeError::NullOrBlankInput`] if `payload` is empty or whitespace only
/// - [`DecodeError::Base64`] if it is not standard Base64
/// - [`DecodeError::TypeResolution`] if it was encoded from a different type
/// - [`DecodeError::Structural`] for any other corruption
pub fn decode<T: Encodable>(payload: &str) -> std::result::Result<T, DecodeError> {
    decode_envelope(payload)?.decode()
}

/// Decodes the envelope of a payload without committing to a type.
///
/// Succeeds for every string [`encode`] can produce, whatever the type.
///
/// # Errors
///
/// Same as [`decode`], minus [`DecodeError::TypeResolution`].
pub fn decode_envelope(payload: &str) -> std::result::Result<Encoded, DecodeError> {
    if payload.trim().is_empty() {
        return Err(DecodeError::NullOrBlankInput);
    }

    let bytes = BASE64.decode(payload)?;
    let envelope: Envelope = options().deserialize(&bytes)?;
    if envelope.magic != MAGIC {
        trace!("payload rejected: bad magic");
        return Err(DecodeError::Structural("missing payload header".to_string()));
    }

    Ok(Encoded {
        type_name: envelope.type_name,
        body: envelope.body,
    })
}

/// A decoded envelope: the name of the encoded type and its serialized body.
///
/// Returned by [`decode_envelope`] and [`Document::set_encoded`], where the
/// previous value's type is not known in advance.
///
/// [`Document::set_encoded`]: crate::Document::set_encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    type_name: String,
    body: Vec<u8>,
}

impl Encoded {
    /// The [`std::any::type_name`] the payload was encoded from.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns `true` if the payload was encoded from a `T`.
    #[must_use]
    pub fn is<T: Encodable>(&self) -> bool {
        self.type_name == any::type_name::<T>()
    }

    /// Reconstructs the encoded value.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeResolution`] if the payload holds another type,
    /// [`DecodeError::Structural`] if the body is corrupt.
    pub fn decode<T: Encodable>(&self) -> std::result::Result<T, DecodeError> {
        let expected = any::type_name::<T>();
        if self.type_name != expected {
            return Err(DecodeError::TypeResolution {
                expected,
                found: self.type_name.clone(),
            });
        }
        Ok(options().deserialize(&self.body)?)
    }
}

/// A structurally serializable value held inside a document as-is.
///
/// Construction captures everything the document needs later: the payload
/// bytes for [`encode`]-style output, a plain JSON rendering for ordinary
/// text output, and the live object for [`Foreign::downcast_ref`]. Two foreign
/// values are equal when their payloads are.
///
/// # Examples
///
/// ```rust
/// use confdoc::Foreign;
///
/// let foreign = Foreign::new((1u8, String::from("one"))).unwrap();
/// assert_eq!(foreign.downcast_ref::<(u8, String)>().map(|t| t.0), Some(1));
/// assert_eq!(foreign.json().to_string(), r#"[1,"one"]"#);
/// ```
#[derive(Clone)]
pub struct Foreign {
    type_name: &'static str,
    payload: Rc<[u8]>,
    json: Rc<serde_json::Value>,
    object: Rc<dyn Any>,
}

impl Foreign {
    /// Wraps a value.
    ///
    /// # Errors
    ///
    /// [`Error::NullValue`] for a null value, [`Error::Encode`] if the value
    /// cannot be serialized to either bincode or JSON.
    pub fn new<T: Encodable>(value: T) -> Result<Self> {
        let payload = envelope_bytes(&value)?;
        let json = serde_json::to_value(&value).map_err(|e| Error::Encode(e.to_string()))?;
        Ok(Foreign {
            type_name: any::type_name::<T>(),
            payload: payload.into(),
            json: Rc::new(json),
            object: Rc::new(value),
        })
    }

    /// The [`std::any::type_name`] of the wrapped value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns a reference to the wrapped value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.downcast_ref()
    }

    /// Plain JSON rendering, used when the value is printed without encoding.
    #[must_use]
    pub fn json(&self) -> &serde_json::Value {
        &self.json
    }

    /// The Base64 payload for this value.
    #[must_use]
    pub fn encode(&self) -> String {
        BASE64.encode(&self.payload)
    }
}

impl PartialEq for Foreign {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl fmt::Debug for Foreign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Foreign")
            .field("type_name", &self.type_name)
            .field("json", &self.json)
            .finish()
    }
}
