use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("PDF parse failed: {0}")]
    Parse(String),
    #[error("PDF reader panicked on malformed input")]
    Panicked,
}

/// Something that can open a PDF and return the native text layer of each page,
/// in page order. A page without a text layer is an empty string.
pub trait PdfReader: Send + Sync {
    fn name(&self) -> &'static str;
    fn read_pages(&self, pdf: &[u8]) -> Result<Vec<String>, ReadError>;
}

// ── Primary: pdf-extract ──────────────────────────────────────────────────────

/// Layout-aware text extraction. Strict: any structural problem fails the whole
/// document, and the library can panic on damaged streams.
pub struct PdfExtractReader;

impl PdfReader for PdfExtractReader {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn read_pages(&self, pdf: &[u8]) -> Result<Vec<String>, ReadError> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(pdf)
        }));
        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(ReadError::Parse(e.to_string())),
            Err(_) => Err(ReadError::Panicked),
        }
    }
}

// ── Secondary: lopdf ──────────────────────────────────────────────────────────

/// Object-level reader. Only the container has to parse; a page whose content
/// stream cannot be decoded contributes an empty string instead of failing the
/// document.
pub struct LopdfReader;

impl PdfReader for LopdfReader {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn read_pages(&self, pdf: &[u8]) -> Result<Vec<String>, ReadError> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| read_with_lopdf(pdf)));
        match result {
            Ok(pages) => pages,
            Err(_) => Err(ReadError::Panicked),
        }
    }
}

fn read_with_lopdf(pdf: &[u8]) -> Result<Vec<String>, ReadError> {
    let mut doc = Document::load_mem(pdf).map_err(|e| ReadError::Parse(e.to_string()))?;
    if doc.is_encrypted() {
        doc.decrypt("").map_err(|e| ReadError::Parse(e.to_string()))?;
    }

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let pages = page_numbers
        .into_iter()
        .map(|n| match doc.extract_text(&[n]) {
            Ok(text) => text,
            Err(e) => {
                debug!(page = n, error = %e, "lopdf could not decode page text");
                String::new()
            }
        })
        .collect();
    Ok(pages)
}

/// Primary then secondary reader, the order acquisition tries them in.
pub fn default_readers() -> Vec<Box<dyn PdfReader>> {
    vec![Box::new(PdfExtractReader), Box::new(LopdfReader)]
}
