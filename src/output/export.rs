//! Export generated resumes and cover letters as PDF, DOCX or plain text

use crate::error::{Result, ResumeTailorError};
use crate::llm::prompts::ALLOWED_HEADERS;
use aho_corasick::AhoCorasick;
use log::{debug, info};
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rgb};
use quick_xml::escape::escape;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const PAGE_WIDTH_PT: f32 = 612.0;
const PAGE_HEIGHT_PT: f32 = 792.0;
const MARGIN_PT: f32 = 40.0;
const BLANK_LINE_PT: f32 = 6.0;
const MM_PER_PT: f32 = 25.4 / 72.0;
/// Rough average Helvetica glyph width as a fraction of the font size
const GLYPH_WIDTH_RATIO: f32 = 0.5;

const CONTACT_MARKERS: [&str; 4] = ["@", "http", "+", "www"];
const HIGHLIGHT: (u8, u8, u8) = (0x4a, 0x07, 0xf2);
const DOCX_FONT: &str = "Arial";

const DOCX_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const DOCX_PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCX_DOCUMENT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

/// US Letter with 40pt margins, in twentieths of a point
const DOCX_SECTION: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="800" w:right="800" w:bottom="800" w:left="800" w:header="0" w:footer="0" w:gutter="0"/></w:sectPr></w:body></w:document>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Text,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => ExportFormat::Pdf,
            Some(ext) if ext.eq_ignore_ascii_case("docx") => ExportFormat::Docx,
            _ => ExportFormat::Text,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Text => "txt",
        }
    }
}

/// How a single line of a document is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Name,
    Contact,
    Header,
    Body,
    Blank,
}

impl LineStyle {
    fn font_size(self) -> f32 {
        match self {
            LineStyle::Name => 16.0,
            LineStyle::Header => 14.0,
            LineStyle::Contact => 12.0,
            LineStyle::Body => 10.0,
            LineStyle::Blank => 0.0,
        }
    }

    fn leading(self) -> f32 {
        match self {
            LineStyle::Name => 18.0 + 16.0,
            LineStyle::Header => 16.0 + 12.0,
            LineStyle::Contact => 14.0 + 8.0,
            LineStyle::Body => 12.0,
            LineStyle::Blank => BLANK_LINE_PT,
        }
    }

    fn highlighted(self) -> bool {
        matches!(self, LineStyle::Name | LineStyle::Contact | LineStyle::Header)
    }
}

pub struct DocumentExporter {
    contact_matcher: AhoCorasick,
}

impl DocumentExporter {
    pub fn new() -> Result<Self> {
        let contact_matcher = AhoCorasick::new(CONTACT_MARKERS)
            .map_err(|e| ResumeTailorError::Export(format!("Failed to build contact matcher: {}", e)))?;

        Ok(Self { contact_matcher })
    }

    /// First line is the candidate's name; the rest are contact details,
    /// section headers or body text.
    pub fn classify_line(&self, index: usize, line: &str) -> LineStyle {
        let line = line.trim();
        if line.is_empty() {
            LineStyle::Blank
        } else if index == 0 {
            LineStyle::Name
        } else if self.contact_matcher.is_match(line) {
            LineStyle::Contact
        } else if ALLOWED_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(line)) {
            LineStyle::Header
        } else {
            LineStyle::Body
        }
    }

    pub fn export(&self, text: &str, path: &Path, format: ExportFormat) -> Result<()> {
        if text.trim().is_empty() {
            return Err(ResumeTailorError::InvalidInput("Nothing to export".to_string()));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        match format {
            ExportFormat::Pdf => {
                let title = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "document".to_string());
                let bytes = self.render_pdf(text, &title)?;
                fs::write(path, bytes)?;
            }
            ExportFormat::Docx => {
                let bytes = self.render_docx(text)?;
                fs::write(path, bytes)?;
            }
            ExportFormat::Text => {
                let body: Vec<&str> = text.lines().map(str::trim).collect();
                fs::write(path, body.join("\n") + "\n")?;
            }
        }

        info!("Exported {:?} document to {}", format, path.display());
        Ok(())
    }

    pub fn render_pdf(&self, text: &str, title: &str) -> Result<Vec<u8>> {
        let (doc, page, layer) = PdfDocument::new(title, mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ResumeTailorError::Export(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ResumeTailorError::Export(e.to_string()))?;

        let mut current = doc.get_page(page).get_layer(layer);
        let mut cursor = PAGE_HEIGHT_PT - MARGIN_PT;
        let mut pages = 1;

        for (index, line) in text.lines().enumerate() {
            let style = self.classify_line(index, line);
            if style == LineStyle::Blank {
                cursor -= style.leading();
                continue;
            }

            let font = if style.highlighted() { &bold } else { &regular };
            for chunk in wrap_line(line.trim(), max_chars(style.font_size())) {
                if cursor - style.leading() < MARGIN_PT {
                    let (page, layer) = doc.add_page(mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "Layer 1");
                    current = doc.get_page(page).get_layer(layer);
                    cursor = PAGE_HEIGHT_PT - MARGIN_PT;
                    pages += 1;
                }

                cursor -= style.leading();
                draw_text(&current, &chunk, style, font, cursor);
            }
        }

        debug!("Rendered '{}' on {} page(s)", title, pages);
        doc.save_to_bytes()
            .map_err(|e| ResumeTailorError::Export(e.to_string()))
    }

    /// Word package with one paragraph per line, styled like the PDF
    pub fn render_docx(&self, text: &str) -> Result<Vec<u8>> {
        let mut document = String::from(DOCX_DOCUMENT_OPEN);
        for (index, line) in text.lines().enumerate() {
            document.push_str(&docx_paragraph(line.trim(), self.classify_line(index, line)));
        }
        document.push_str(DOCX_SECTION);

        let mut package = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in [
            ("[Content_Types].xml", DOCX_CONTENT_TYPES),
            ("_rels/.rels", DOCX_PACKAGE_RELS),
            ("word/document.xml", document.as_str()),
        ] {
            let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            package.start_file(name, options).map_err(docx_error)?;
            package.write_all(content.as_bytes())?;
        }

        let bytes = package.finish().map_err(docx_error)?.into_inner();
        debug!("Rendered DOCX with {} line(s), {} bytes", text.lines().count(), bytes.len());
        Ok(bytes)
    }
}

fn docx_error(e: zip::result::ZipError) -> ResumeTailorError {
    ResumeTailorError::Export(format!("Failed to write DOCX: {}", e))
}

/// `w:sz` is measured in half-points
fn docx_paragraph(line: &str, style: LineStyle) -> String {
    if style == LineStyle::Blank {
        return "<w:p/>".to_string();
    }

    let mut properties = format!(r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}"/>"#, DOCX_FONT);
    if style.highlighted() {
        let (r, g, b) = HIGHLIGHT;
        properties.push_str(&format!(
            r#"<w:b/><w:color w:val="{:02X}{:02X}{:02X}"/><w:u w:val="single"/>"#,
            r, g, b
        ));
    }
    properties.push_str(&format!(r#"<w:sz w:val="{}"/>"#, (style.font_size() * 2.0) as u32));

    format!(
        r#"<w:p><w:r><w:rPr>{}</w:rPr><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        properties,
        escape(line)
    )
}

fn draw_text(layer: &PdfLayerReference, text: &str, style: LineStyle, font: &IndirectFontRef, baseline: f32) {
    let (r, g, b) = if style.highlighted() { HIGHLIGHT } else { (0, 0, 0) };
    layer.set_fill_color(Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    )));
    layer.use_text(text, style.font_size(), mm(MARGIN_PT), mm(baseline), font);
}

fn mm(points: f32) -> Mm {
    Mm(points * MM_PER_PT)
}

fn max_chars(font_size: f32) -> usize {
    let usable = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;
    (usable / (font_size * GLYPH_WIDTH_RATIO)).floor().max(1.0) as usize
}

/// Greedy word wrap by character count. Words longer than a line are split.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let current_len = current.chars().count();
        if current_len == 0 {
            current = word;
        } else if current_len + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current, word));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
