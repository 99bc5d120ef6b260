use std::fs;
use std::io::{Cursor, Read};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use lopdf::Document;
use pdf_extract::PlainTextOutput;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOCX_BODY: &str = "word/document.xml";

/// Résumé formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Resolves the format from the file name. Unknown extensions yield `None`.
    pub fn detect(path: &Path) -> Option<Self> {
        mime_guess::from_path(path)
            .iter()
            .find_map(|mime| match mime.essence_str() {
                "application/pdf" => Some(Self::Pdf),
                DOCX_MIME => Some(Self::Docx),
                "text/plain" => Some(Self::PlainText),
                _ => None,
            })
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::PlainText => "text",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported document format: {filename}")]
    UnsupportedFormat { filename: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unreadable PDF document: {0}")]
    Pdf(String),
    #[error("unreadable DOCX document: {0}")]
    Docx(String),
}

impl ExtractionError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }
}

/// Reads the document at `path` and returns its raw (un-normalized) text.
pub fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let format = DocumentFormat::detect(path).ok_or_else(|| ExtractionError::UnsupportedFormat {
        filename: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
    })?;

    let bytes = fs::read(path).map_err(|source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    extract_bytes(format, &bytes)
}

pub fn extract_bytes(format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractionError> {
    match format {
        DocumentFormat::Pdf => extract_pdf(bytes),
        DocumentFormat::Docx => extract_docx(bytes),
        DocumentFormat::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Page texts joined by a single space. A page that cannot be rendered contributes an
/// empty fragment; only a document that cannot be loaded is an error.
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut document =
        Document::load_mem(bytes).map_err(|err| ExtractionError::Pdf(err.to_string()))?;
    if document.is_encrypted() {
        document
            .decrypt("")
            .map_err(|err| ExtractionError::Pdf(err.to_string()))?;
    }

    let pages: Vec<String> = document
        .get_pages()
        .keys()
        .map(|&page| extract_pdf_page(&document, page))
        .collect();
    Ok(pages.join(" "))
}

fn extract_pdf_page(document: &Document, page: u32) -> String {
    // pdf-extract panics on some malformed font tables instead of returning an error.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut text = String::new();
        {
            let mut output = PlainTextOutput::new(&mut text);
            pdf_extract::output_doc_page(document, &mut output, page)?;
        }
        Ok::<_, pdf_extract::OutputError>(text)
    }));

    match outcome {
        Ok(Ok(text)) => text,
        Ok(Err(err)) => {
            warn!(page, error = %err, "unreadable pdf page skipped");
            String::new()
        }
        Err(_) => {
            warn!(page, "pdf page aborted the parser, skipped");
            String::new()
        }
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| ExtractionError::Docx(err.to_string()))?;
    let mut body = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|err| ExtractionError::Docx(err.to_string()))?
        .read_to_string(&mut body)
        .map_err(|err| ExtractionError::Docx(err.to_string()))?;

    paragraphs_from_document_xml(&body)
}

/// Concatenates the `w:t` runs of every paragraph, one space after each paragraph.
fn paragraphs_from_document_xml(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| ExtractionError::Docx(err.to_string()))?;
        match event {
            Event::Start(tag) if tag.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(tag) => match tag.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push(' '),
                _ => {}
            },
            Event::Empty(tag) if matches!(tag.name().as_ref(), b"w:tab" | b"w:br" | b"w:cr") => {
                text.push(' ');
            }
            Event::Text(fragment) if in_run_text => {
                let decoded = fragment
                    .unescape()
                    .map_err(|err| ExtractionError::Docx(err.to_string()))?;
                text.push_str(&decoded);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}
