//! # confdoc
//!
//! Typed, total access to JSON documents, with an opt-in encoding for values
//! JSON cannot represent.
//!
//! ## Key Features
//!
//! - **Typed getters**: `get_int`, `get_string`, `get_document`, ... coerce
//!   between compatible representations and report a [`KeyError`] otherwise
//! - **Total defaults**: every getter has an `_or` twin that never fails
//! - **Shared views**: a [`Document`] is a handle; nested documents share
//!   their parent's tree
//! - **Encoded values**: any `Serialize + Deserialize` type can be stored as a
//!   Base64 payload string and recovered exactly, even after the document has
//!   been printed and reparsed
//!
//! ## Quick Start
//!
//! ```rust
//! use confdoc::Document;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! enum Level { One, Two, Three }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Extra { i: i32, s: String, e: Level, f: f32 }
//!
//! let extra = Extra { i: 123, s: "Hello World!".into(), e: Level::Three, f: 456.78 };
//!
//! let doc = Document::new();
//! doc.set("name", "edge").unwrap();
//! doc.set_encoded("extra", &extra).unwrap();
//!
//! let reloaded = Document::parse(&doc.to_text()).unwrap();
//! assert_eq!(reloaded.get_encoded::<Extra>("extra").unwrap(), extra);
//! assert!(reloaded.get("extra").unwrap().is_string());
//! assert_eq!(reloaded.get_int_or("name", -1), -1);
//! ```
//!
//! ### Building Documents with the document! Macro
//!
//! ```rust
//! use confdoc::document;
//!
//! let doc = document!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "serde"]
//! });
//!
//! assert_eq!(doc.get_string("name").unwrap(), "Alice");
//! assert_eq!(doc.get_array("tags").unwrap().len(), 2);
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug` for file loads and saves,
//! `trace` when a defaulted getter falls back or a payload is rejected). It
//! never installs a subscriber.
//!
//! ## Demos
//!
//! See `demos/settings.rs` for a small settings store built on [`load`] and
//! [`save_with`]. Run it with: `cargo run --example settings`

pub mod codec;
pub mod de;
pub mod document;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod persist;
pub mod ser;
pub mod value;

pub use codec::{decode, encode, Class, Encodable, Encoded, Foreign};
pub use de::from_value;
pub use document::Document;
pub use error::{DecodeError, Error, KeyError, Result};
pub use map::Map;
pub use options::TextOptions;
pub use persist::{load, save, save_with};
pub use ser::to_value;
pub use value::Value;

use serde::Serialize;

/// Builds a [`Document`] from a serializable struct or map.
///
/// # Examples
///
/// ```rust
/// use confdoc::to_document;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Limits { retries: i8, timeout: f32 }
///
/// let doc = to_document(&Limits { retries: 3, timeout: 1.5 }).unwrap();
/// assert_eq!(doc.get_byte("retries").unwrap(), 3);
/// assert_eq!(doc.get_float("timeout").unwrap(), 1.5);
/// ```
///
/// # Errors
///
/// [`Error::InvalidValue`] if `value` does not serialize to an object or holds
/// a non-finite float.
pub fn to_document<T>(value: &T) -> Result<Document>
where
    T: ?Sized + Serialize,
{
    Document::from_serialize(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Server {
        host: String,
        port: u16,
        tags: Vec<String>,
        limits: Limits,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Limits {
        retries: i8,
        ratio: f64,
    }

    fn server() -> Server {
        Server {
            host: "localhost".to_string(),
            port: 8080,
            tags: vec!["a".to_string(), "b".to_string()],
            limits: Limits {
                retries: 3,
                ratio: 0.5,
            },
        }
    }

    #[test]
    fn test_to_document_and_back() {
        let doc = to_document(&server()).unwrap();
        assert_eq!(doc.get_int("port").unwrap(), 8080);
        assert_eq!(
            doc.get_document("limits").unwrap().get("retries").unwrap(),
            Value::Byte(3)
        );
        assert_eq!(doc.deserialize_into::<Server>().unwrap(), server());
    }

    #[test]
    fn test_struct_through_text() {
        let doc = to_document(&server()).unwrap();
        let reloaded = Document::parse(&doc.to_text()).unwrap();
        assert_eq!(reloaded.deserialize_into::<Server>().unwrap(), server());
        // widths are not kept by text
        assert_eq!(
            reloaded.get_document("limits").unwrap().get("retries").unwrap(),
            Value::Int(3)
        );
        assert_ne!(reloaded, doc);
    }

    #[test]
    fn test_none_fields_are_absent_keys() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Proxy {
            host: String,
            port: Option<u16>,
        }

        let proxy = Proxy {
            host: "edge".to_string(),
            port: None,
        };
        let doc = to_document(&proxy).unwrap();
        assert!(!doc.has_key("port"));
        assert!(doc.get("port").is_err());
        assert_eq!(doc.get_int_or("port", 3128), 3128);
        assert_eq!(doc.to_text(), r#"{"host":"edge"}"#);
        assert_eq!(doc.deserialize_into::<Proxy>().unwrap(), proxy);
    }

    #[test]
    fn test_to_document_rejects_scalars() {
        assert!(matches!(to_document(&42), Err(Error::InvalidValue(_))));
    }
}
