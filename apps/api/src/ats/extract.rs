//! Text extraction for uploaded resumes.
//!
//! `AppState` holds an `Arc<dyn TextExtractor>`; the default `DocumentExtractor`
//! reads PDFs via `pdf-extract` and DOCX via `zip` + `quick-xml`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::ats::AtsError;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Supported upload formats, chosen from the declared MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// MIME parameters (`; charset=...`) are ignored. Legacy `.doc` is not supported.
    pub fn from_mime(mime: &str) -> Result<Self, AtsError> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            PDF_MIME => Ok(DocumentKind::Pdf),
            DOCX_MIME => Ok(DocumentKind::Docx),
            _ => Err(AtsError::UnsupportedFormat(mime.to_string())),
        }
    }
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, path: &Path, kind: DocumentKind) -> Result<String, AtsError>;
}

/// Default extractor. Parsing is blocking, so it runs on the blocking pool.
pub struct DocumentExtractor;

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract_text(&self, path: &Path, kind: DocumentKind) -> Result<String, AtsError> {
        let path = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || match kind {
            DocumentKind::Pdf => extract_pdf(&path),
            DocumentKind::Docx => extract_docx(&path),
        })
        .await
        .map_err(|e| AtsError::ExtractionFailure(format!("extraction task failed: {e}")))??;

        debug!(?kind, chars = text.len(), "Extracted resume text");
        Ok(text)
    }
}

/// `pdf-extract` panics on some malformed font encodings instead of erroring.
fn extract_pdf(path: &Path) -> Result<String, AtsError> {
    let path_buf = path.to_path_buf();
    match std::panic::catch_unwind(|| pdf_extract::extract_text(&path_buf)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(AtsError::ExtractionFailure(format!("PDF: {e}"))),
        Err(_) => Err(AtsError::ExtractionFailure(
            "PDF parser panicked on malformed input".to_string(),
        )),
    }
}

fn extract_docx(path: &Path) -> Result<String, AtsError> {
    let file = File::open(path).map_err(|e| AtsError::ExtractionFailure(format!("DOCX: {e}")))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| AtsError::ExtractionFailure(format!("DOCX: {e}")))?;

    let mut xml = String::new();
    let mut document = archive.by_name("word/document.xml").map_err(|_| {
        AtsError::ExtractionFailure("DOCX: word/document.xml not found".to_string())
    })?;
    document
        .read_to_string(&mut xml)
        .map_err(|e| AtsError::ExtractionFailure(format!("DOCX: {e}")))?;

    docx_xml_to_text(&xml)
}

/// Collects `w:t` text inside runs. Paragraph ends (including empty `<w:p/>`)
/// and run breaks become newlines; run tabs stay tabs. Tab-stop definitions in
/// paragraph properties are not runs and are skipped.
fn docx_xml_to_text(xml: &str) -> Result<String, AtsError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut run_depth = 0usize;
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:r" => run_depth += 1,
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" => text.push('\n'),
                b"w:tab" if run_depth > 0 => text.push('\t'),
                b"w:br" | b"w:cr" if run_depth > 0 => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let unescaped = t
                    .unescape()
                    .map_err(|e| AtsError::ExtractionFailure(format!("DOCX: {e}")))?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AtsError::ExtractionFailure(format!(
                    "DOCX: malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(text)
}
