//! DOCX reader: paragraphs from `word/document.xml`, style names resolved
//! through `word/styles.xml`.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::documents::{DocumentReader, Paragraph, ReadError};

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
/// Style applied by Word when a paragraph names none.
const DEFAULT_STYLE: &str = "Normal";

pub struct DocxReader;

impl DocumentReader for DocxReader {
    fn read_paragraphs(&self, path: &Path) -> Result<Vec<Paragraph>, ReadError> {
        let file = File::open(path).map_err(|e| ReadError::from_io(path, e))?;
        let mut archive = ZipArchive::new(file).map_err(|e| ReadError::unreadable(path, e))?;

        let document = read_part(&mut archive, DOCUMENT_PART)
            .map_err(|e| ReadError::unreadable(path, e))?
            .ok_or_else(|| ReadError::unreadable(path, "missing word/document.xml"))?;

        // A document without a styles part still reads; ids are used as names.
        let style_names = match read_part(&mut archive, STYLES_PART) {
            Ok(Some(xml)) => parse_style_names(&xml).map_err(|e| ReadError::unreadable(path, e))?,
            _ => HashMap::new(),
        };

        parse_paragraphs(&document, &style_names).map_err(|e| ReadError::unreadable(path, e))
    }
}

fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<String>, String> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.to_string()),
    };
    let mut xml = String::new();
    part.read_to_string(&mut xml).map_err(|e| e.to_string())?;
    Ok(Some(xml))
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Word stores built-in names lower-cased ("heading 1"); the UI shows "Heading 1".
fn display_style_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Maps style ids (`Heading1`) to display names (`Heading 1`).
pub fn parse_style_names(xml: &str) -> Result<HashMap<String, String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut names = HashMap::new();
    let mut current_id: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:style" => current_id = attr_value(e, b"w:styleId"),
                b"w:name" => {
                    if let (Some(id), Some(name)) = (&current_id, attr_value(e, b"w:val")) {
                        names.insert(id.clone(), display_style_name(&name));
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"w:style" => current_id = None,
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("styles XML error: {e}")),
            _ => {}
        }
        buf.clear();
    }

    Ok(names)
}

/// Paragraph text and style name, blank paragraphs skipped.
pub fn parse_paragraphs(
    xml: &str,
    style_names: &HashMap<String, String>,
) -> Result<Vec<Paragraph>, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();

    let mut text = String::new();
    let mut style_id: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:p" => {
                    text.clear();
                    style_id = None;
                }
                b"w:pStyle" => style_id = attr_value(e, b"w:val"),
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:pStyle" => style_id = attr_value(e, b"w:val"),
                b"w:tab" | b"w:br" => text.push(' '),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let run = e.unescape().map_err(|err| format!("XML decode error: {err}"))?;
                    text.push_str(&run);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        let style_name = match &style_id {
                            Some(id) => style_names.get(id).cloned().unwrap_or_else(|| id.clone()),
                            None => DEFAULT_STYLE.to_string(),
                        };
                        paragraphs.push(Paragraph {
                            style_name,
                            text: trimmed.to_string(),
                        });
                    }
                    text.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("document XML error: {e}")),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
