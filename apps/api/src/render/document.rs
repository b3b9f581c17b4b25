//! Document writer capability and the in-memory styled document.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Styles present in a blank Word template.
pub const DEFAULT_TEMPLATE_STYLES: [&str; 9] = [
    "Normal",
    "Title",
    "Subtitle",
    "Heading 1",
    "Heading 2",
    "Heading 3",
    "List Bullet",
    "List Paragraph",
    "Body Text",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("style {0:?} is not defined in the template")]
    UnknownStyle(String),

    #[error("no paragraph at index {0}")]
    NoSuchParagraph(usize),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handle to a paragraph added to a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphId(pub usize);

pub trait DocumentWriter {
    fn add_paragraph(&mut self, text: &str) -> ParagraphId;

    /// Fails when the template does not define `style`; callers treat that as a no-op.
    fn set_style(&mut self, paragraph: ParagraphId, style: &str) -> Result<(), StyleError>;

    fn save(&self, path: &Path) -> Result<(), WriteError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledParagraph {
    pub text: String,
    pub style: Option<String>,
}

/// Paragraphs plus the template style set they are checked against.
/// Saved as pretty JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledDocument {
    styles: BTreeSet<String>,
    paragraphs: Vec<StyledParagraph>,
}

impl Default for StyledDocument {
    fn default() -> Self {
        Self::with_styles(DEFAULT_TEMPLATE_STYLES)
    }
}

impl StyledDocument {
    pub fn with_styles<I, S>(styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            styles: styles.into_iter().map(Into::into).collect(),
            paragraphs: Vec::new(),
        }
    }

    pub fn paragraphs(&self) -> &[StyledParagraph] {
        &self.paragraphs
    }

    pub fn into_paragraphs(self) -> Vec<StyledParagraph> {
        self.paragraphs
    }
}

impl DocumentWriter for StyledDocument {
    fn add_paragraph(&mut self, text: &str) -> ParagraphId {
        self.paragraphs.push(StyledParagraph {
            text: text.to_string(),
            style: None,
        });
        ParagraphId(self.paragraphs.len() - 1)
    }

    fn set_style(&mut self, paragraph: ParagraphId, style: &str) -> Result<(), StyleError> {
        if !self.styles.contains(style) {
            return Err(StyleError::UnknownStyle(style.to_string()));
        }
        let target = self
            .paragraphs
            .get_mut(paragraph.0)
            .ok_or(StyleError::NoSuchParagraph(paragraph.0))?;
        target.style = Some(style.to_string());
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<(), WriteError> {
        let io_error = |source: std::io::Error| WriteError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_style_is_error_and_leaves_paragraph_unstyled() {
        let mut doc = StyledDocument::default();
        let id = doc.add_paragraph("Jane Doe");
        assert_eq!(
            doc.set_style(id, "Fancy Heading"),
            Err(StyleError::UnknownStyle("Fancy Heading".into()))
        );
        assert_eq!(doc.paragraphs()[0].style, None);

        doc.set_style(id, "Heading 1").unwrap();
        assert_eq!(doc.paragraphs()[0].style.as_deref(), Some("Heading 1"));
    }

    #[test]
    fn test_bad_paragraph_handle() {
        let mut doc = StyledDocument::default();
        assert_eq!(
            doc.set_style(ParagraphId(3), "Normal"),
            Err(StyleError::NoSuchParagraph(3))
        );
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("bio.json");

        let mut doc = StyledDocument::with_styles(["Normal"]);
        let id = doc.add_paragraph("Leads AI programs.");
        doc.set_style(id, "Normal").unwrap();
        doc.save(&path).unwrap();

        let saved: StyledDocument =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, doc);
    }
}
