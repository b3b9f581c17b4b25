use std::path::Path;

use tracing::debug;

use crate::documents::{text_lines, DocumentReader, Paragraph, ReadError};

/// Text layer of a PDF via `pdf-extract`. PDFs carry no paragraph styles.
pub struct PdfReader;

impl DocumentReader for PdfReader {
    fn read_paragraphs(&self, path: &Path) -> Result<Vec<Paragraph>, ReadError> {
        if !path.exists() {
            return Err(ReadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = pdf_extract::extract_text(path)
            .map_err(|e| ReadError::unreadable(path, format!("failed to extract PDF text: {e}")))?;
        let lines = text_lines(&content);
        debug!(path = %path.display(), lines = lines.len(), "pdf text extracted");
        Ok(lines.into_iter().map(Paragraph::plain).collect())
    }
}
