//! Document readers: the only place that knows about file formats.
//!
//! The extraction core consumes ordered, trimmed, non-empty lines; the style
//! planner consumes paragraphs with their style names.

pub mod docx;
pub mod pdf;
pub mod text;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::llm_client::json::parse_json_document;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("document not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("unreadable document {}: {reason}", path.display())]
    UnreadableFormat { path: PathBuf, reason: String },
}

impl ReadError {
    pub fn unreadable(path: &Path, reason: impl ToString) -> Self {
        ReadError::UnreadableFormat {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Maps an I/O failure on `path`: a missing file is `NotFound`, anything else unreadable.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            ReadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ReadError::unreadable(path, err)
        }
    }
}

/// One document paragraph and the name of the style applied to it.
/// Formats without styles report an empty style name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub style_name: String,
    pub text: String,
}

impl Paragraph {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            style_name: String::new(),
            text: text.into(),
        }
    }
}

pub trait DocumentReader: Send + Sync {
    /// Paragraphs in document order; blank paragraphs are skipped.
    fn read_paragraphs(&self, path: &Path) -> Result<Vec<Paragraph>, ReadError>;

    /// Ordered, trimmed, non-empty lines.
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, ReadError> {
        let paragraphs = self.read_paragraphs(path)?;
        Ok(paragraphs
            .iter()
            .flat_map(|p| p.text.lines())
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }
}

/// Splits raw text into ordered, trimmed, non-empty lines.
pub fn text_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Picks a reader from the file extension.
pub fn reader_for_path(path: &Path) -> Result<Box<dyn DocumentReader>, ReadError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "docx" => Ok(Box::new(docx::DocxReader)),
        "pdf" => Ok(Box::new(pdf::PdfReader)),
        "txt" | "md" | "text" => Ok(Box::new(text::TextReader)),
        "doc" => Err(ReadError::unreadable(
            path,
            "legacy .doc is not supported, convert to .docx",
        )),
        other => Err(ReadError::unreadable(
            path,
            format!("unsupported file type {other:?}"),
        )),
    }
}

/// Reads the lines of any supported document.
pub fn read_document_lines(path: &Path) -> Result<Vec<String>, ReadError> {
    reader_for_path(path)?.read_lines(path)
}

/// Loads a JSON file written by hand or by another tool: a UTF-8 BOM,
/// surrounding log noise and trailing commas are tolerated.
pub fn read_json_file(path: &Path) -> Result<Value, ReadError> {
    let bytes = std::fs::read(path).map_err(|e| ReadError::from_io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    parse_json_document(&text).map_err(|e| ReadError::unreadable(path, e))
}
