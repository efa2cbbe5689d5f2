//! Loading and saving documents as JSON files.
//!
//! ```rust,no_run
//! use confdoc::{load, save};
//!
//! let settings = load("settings.json").unwrap();
//! settings.set("launches", settings.get_int_or("launches", 0) + 1).unwrap();
//! save(&settings, "settings.json").unwrap();
//! ```

use crate::{Document, Error, Result, TextOptions};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes `doc` to `path` as compact JSON, replacing any existing file.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be written.
pub fn save(doc: &Document, path: impl AsRef<Path>) -> Result<()> {
    save_with(doc, path, &TextOptions::default())
}

/// Writes `doc` to `path` rendered with `options`.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be written.
pub fn save_with(doc: &Document, path: impl AsRef<Path>, options: &TextOptions) -> Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).map_err(|e| io_error(path, &e))?;
    let mut writer = BufWriter::new(file);
    doc.write_text(&mut writer, options)?;
    writer.flush().map_err(|e| io_error(path, &e))?;
    debug!(path = %path.display(), keys = doc.len(), "document saved");
    Ok(())
}

/// Reads the document stored at `path`.
///
/// A missing file yields an empty document.
///
/// # Errors
///
/// - [`Error::Io`] if the file exists but cannot be read
/// - [`Error::Parse`] if it does not hold a JSON object
pub fn load(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no document on disk, starting empty");
            return Ok(Document::new());
        }
        Err(e) => return Err(io_error(path, &e)),
    };
    let doc = Document::parse(&text)?;
    debug!(path = %path.display(), keys = doc.len(), "document loaded");
    Ok(doc)
}

fn io_error(path: &Path, e: &io::Error) -> Error {
    Error::io(&format!("{}: {}", path.display(), e))
}
