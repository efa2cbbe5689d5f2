//! Error types for document access and payload encoding.
//!
//! Errors come in three layers so that each defaulted accessor can swallow
//! exactly the family it is responsible for:
//!
//! - [`KeyError`]: a typed getter found no value, or a value it cannot coerce
//! - [`DecodeError`]: a string could not be turned back into an encoded value
//! - [`Error`]: everything else (invalid values, encoding, text, I/O), plus
//!   the two families above via `From`
//!
//! ## Examples
//!
//! ```rust
//! use confdoc::{Document, KeyError};
//!
//! let doc = Document::new();
//! let err = doc.get_int("port").unwrap_err();
//! assert!(matches!(err, KeyError::Missing { .. }));
//! assert_eq!(doc.get_int_or("port", 8080), 8080);
//! ```

use std::fmt;
use thiserror::Error;

/// Failure of a non-defaulted typed getter.
///
/// Every `get_*_or` accessor maps this error to its fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The key is not present in the document.
    #[error("key {key:?} not found")]
    Missing { key: String },

    /// The key is present but its value cannot be coerced to the requested type.
    #[error("key {key:?}: expected {expected}, found {found}")]
    Mismatch {
        key: String,
        expected: &'static str,
        found: String,
    },
}

impl KeyError {
    pub(crate) fn missing(key: &str) -> Self {
        KeyError::Missing {
            key: key.to_string(),
        }
    }

    pub(crate) fn mismatch(key: &str, expected: &'static str, found: impl Into<String>) -> Self {
        KeyError::Mismatch {
            key: key.to_string(),
            expected,
            found: found.into(),
        }
    }

    /// The key the failed lookup was made with.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            KeyError::Missing { key } | KeyError::Mismatch { key, .. } => key,
        }
    }
}

/// Failure to decode an encoded payload.
///
/// Swallowed as a whole by [`Document::get_encoded_or`] and
/// [`Document::is_encoded_object`].
///
/// [`Document::get_encoded_or`]: crate::Document::get_encoded_or
/// [`Document::is_encoded_object`]: crate::Document::is_encoded_object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The key is absent or does not hold a string.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The payload is empty or whitespace only.
    #[error("cannot decode a null or blank payload")]
    NullOrBlankInput,

    /// The payload is not valid standard Base64.
    #[error("invalid Base64 payload: {0}")]
    Base64(String),

    /// The payload was written for a different type than the one requested.
    #[error("payload holds a {found}, expected {expected}")]
    TypeResolution {
        expected: &'static str,
        found: String,
    },

    /// The decoded bytes are not a well-formed payload.
    #[error("corrupt payload: {0}")]
    Structural(String),
}

impl From<base64::DecodeError> for DecodeError {
    fn from(e: base64::DecodeError) -> Self {
        DecodeError::Base64(e.to_string())
    }
}

impl From<bincode::Error> for DecodeError {
    fn from(e: bincode::Error) -> Self {
        DecodeError::Structural(e.to_string())
    }
}

/// Crate-wide error type.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A typed getter failed.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// An encoded payload failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The value cannot be stored (non-finite number, self-containing document).
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A null value was given where a value is required.
    #[error("null cannot be encoded")]
    NullValue,

    /// Structural serialization of a value failed.
    #[error("encoding failed: {0}")]
    Encode(String),

    /// JSON text could not be parsed into a document.
    #[error("parse error: {0}")]
    Parse(String),

    /// IO error during loading or saving
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an invalid value error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use confdoc::Error;
    ///
    /// let err = Error::invalid_value("NaN is not allowed");
    /// assert!(err.to_string().contains("NaN"));
    /// ```
    pub fn invalid_value<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidValue(msg.to_string())
    }

    /// Creates a parse error.
    pub fn parse<T: fmt::Display>(msg: T) -> Self {
        Error::Parse(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use confdoc::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Encode(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::Io(e.to_string())
        } else {
            Error::Parse(e.to_string())
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
