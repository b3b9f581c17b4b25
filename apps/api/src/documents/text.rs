use std::path::Path;

use crate::documents::{text_lines, DocumentReader, Paragraph, ReadError};

/// Plain UTF-8 text; every non-empty line is a paragraph.
pub struct TextReader;

impl DocumentReader for TextReader {
    fn read_paragraphs(&self, path: &Path) -> Result<Vec<Paragraph>, ReadError> {
        let text = std::fs::read_to_string(path).map_err(|e| ReadError::from_io(path, e))?;
        Ok(text_lines(&text).into_iter().map(Paragraph::plain).collect())
    }
}
