//! Rendering options for document text.
//!
//! [`TextOptions`] controls how [`Document::to_text_with`], [`save_with`] and
//! the demo tooling print a document:
//!
//! - **pretty / indent**: multi-line output with a configurable indent width
//! - **encode_unknown**: print foreign values as encoded payload strings, so the
//!   text can be reloaded and the values recovered with `get_encoded`
//!
//! ## Examples
//!
//! ```rust
//! use confdoc::{Document, TextOptions};
//!
//! let doc = Document::new();
//! doc.set("port", 8080).unwrap();
//!
//! let text = doc.to_text_with(&TextOptions::pretty());
//! assert_eq!(text, "{\n  \"port\": 8080\n}");
//! ```
//!
//! [`Document::to_text_with`]: crate::Document::to_text_with
//! [`save_with`]: crate::save_with

/// Options for rendering a document as JSON text.
///
/// # Examples
///
/// ```rust
/// use confdoc::TextOptions;
///
/// // Default compact options
/// let options = TextOptions::new();
///
/// // Pretty-printed with 4-space indentation, foreign values encoded
/// let options = TextOptions::pretty()
///     .with_indent(4)
///     .with_encode_unknown(true);
/// assert!(options.encode_unknown);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextOptions {
    pub indent: usize,
    pub pretty: bool,
    pub encode_unknown: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        TextOptions {
            indent: 2,
            pretty: false,
            encode_unknown: false,
        }
    }
}

impl TextOptions {
    /// Creates default options (compact output, foreign values as plain JSON).
    ///
    /// ```rust
    /// use confdoc::TextOptions;
    ///
    /// let options = TextOptions::new();
    /// assert_eq!(options.indent, 2);
    /// assert!(!options.pretty);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for pretty-printed output with newlines and indentation.
    #[must_use]
    pub fn pretty() -> Self {
        TextOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// Default is 2. Only affects pretty-printed output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_encode_unknown(mut self, encode_unknown: bool) -> Self {
        self.encode_unknown = encode_unknown;
        self
    }
}
