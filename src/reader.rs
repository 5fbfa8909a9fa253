//! Foreign document providers.
//!
//! A `ProjectReader` turns a file into a `ForeignProject`. The JSON reader
//! decodes the foreign graph as exported by external converters; other
//! formats are rejected up front by `reader_for_path`.

use std::fs;
use std::path::Path;

use crate::error::DecodeError;
use crate::foreign::ForeignProject;

pub trait ProjectReader {
    fn read(&self, path: &Path) -> Result<ForeignProject, DecodeError>;
}

/// Reads the JSON rendition of a foreign project.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonProjectReader;

impl ProjectReader for JsonProjectReader {
    fn read(&self, path: &Path) -> Result<ForeignProject, DecodeError> {
        let buf = fs::read_to_string(path).map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&buf).map_err(|source| DecodeError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Pick a reader from the file extension.
pub fn reader_for_path(path: &Path) -> Result<Box<dyn ProjectReader>, DecodeError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("json") => Ok(Box::new(JsonProjectReader)),
        _ => Err(DecodeError::UnsupportedFormat(path.to_path_buf())),
    }
}
