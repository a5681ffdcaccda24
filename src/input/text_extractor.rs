//! Text extraction from raw document bytes

use crate::error::{Result, ResumeTailorError};
use crate::input::file_detector::FileType;
use log::{debug, warn};
use pulldown_cmark::{Event, Parser, Tag};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event as XmlEvent;
use std::io::{Cursor, Read};

/// Main document part of a Word package
const DOCX_DOCUMENT_PART: &str = "word/document.xml";

pub trait TextExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            ResumeTailorError::PdfExtraction(format!("Failed to extract text from PDF: {}", e))
        })?;

        if text.trim().is_empty() {
            return Err(ResumeTailorError::Extraction(
                "PDF contains no extractable text. Provide a text-based PDF.".to_string(),
            ));
        }
        Ok(text)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        let markdown = String::from_utf8_lossy(bytes);
        let mut text = String::new();

        for event in Parser::new(&markdown) {
            match event {
                Event::Text(content) | Event::Code(content) => text.push_str(&content),
                Event::SoftBreak | Event::HardBreak => text.push('\n'),
                Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..))
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
                _ => {}
            }
        }

        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

/// Word documents: paragraph text from `word/document.xml`, one line per
/// non-empty paragraph
pub struct DocxExtractor;

impl DocxExtractor {
    fn read_document_part(bytes: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ResumeTailorError::Extraction(format!("Failed to open DOCX: {}", e)))?;
        let mut part = archive
            .by_name(DOCX_DOCUMENT_PART)
            .map_err(|e| ResumeTailorError::Extraction(format!("DOCX has no document body: {}", e)))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)?;
        Ok(xml)
    }

    fn paragraphs(xml: &str) -> Result<Vec<String>> {
        let mut reader = quick_xml::Reader::from_str(xml);
        let mut paragraphs = Vec::new();
        let mut current = String::new();
        let mut in_text = false;

        loop {
            match reader.read_event() {
                Ok(XmlEvent::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
                Ok(XmlEvent::End(e)) if e.name().as_ref() == b"w:t" => in_text = false,
                Ok(XmlEvent::Empty(e)) if e.name().as_ref() == b"w:tab" => current.push('\t'),
                Ok(XmlEvent::Empty(e)) if e.name().as_ref() == b"w:br" => current.push('\n'),
                Ok(XmlEvent::Text(e)) if in_text => match e.decode() {
                    Ok(text) => current.push_str(&text),
                    Err(e) => warn!("Skipping undecodable DOCX text at {}: {}", reader.buffer_position(), e),
                },
                Ok(XmlEvent::GeneralRef(e)) if in_text => {
                    let name = e.decode().map_err(|e| ResumeTailorError::Extraction(e.to_string()))?;
                    match resolve_entity(&name) {
                        Some(resolved) => current.push_str(&resolved),
                        None => warn!("Unknown entity &{}; in DOCX text", name),
                    }
                }
                Ok(XmlEvent::End(e)) if e.name().as_ref() == b"w:p" => {
                    let paragraph = std::mem::take(&mut current);
                    if !paragraph.trim().is_empty() {
                        paragraphs.push(paragraph);
                    }
                }
                Ok(XmlEvent::Eof) => break,
                Err(e) => {
                    return Err(ResumeTailorError::Extraction(format!(
                        "Malformed DOCX document at {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
        }

        Ok(paragraphs)
    }
}

/// Predefined XML entities and numeric character references
fn resolve_entity(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse().ok()?,
        };
        return char::from_u32(value).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}

impl TextExtractor for DocxExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        let xml = Self::read_document_part(bytes)?;
        let paragraphs = Self::paragraphs(&xml)?;

        if paragraphs.is_empty() {
            return Err(ResumeTailorError::Extraction(
                "DOCX contains no extractable text.".to_string(),
            ));
        }
        Ok(paragraphs.join("\n"))
    }
}

/// Extract plain text from document bytes of a known type
pub fn extract_from_bytes(bytes: &[u8], file_type: FileType) -> Result<String> {
    debug!("Extracting {:?} document ({} bytes)", file_type, bytes.len());

    match file_type {
        FileType::Pdf => PdfExtractor.extract_bytes(bytes),
        FileType::Text => PlainTextExtractor.extract_bytes(bytes),
        FileType::Markdown => MarkdownExtractor.extract_bytes(bytes),
        FileType::Docx => DocxExtractor.extract_bytes(bytes),
        FileType::Unknown => Err(ResumeTailorError::UnsupportedFormat(
            "Unsupported file type. Please provide PDF, DOCX, TXT or Markdown.".to_string(),
        )),
    }
}
