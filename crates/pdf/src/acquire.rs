use ledgerscan_core::RawTable;
use ledgerscan_ocr::{prepare_for_ocr, OcrBackend};
use thiserror::Error;
use tracing::{debug, warn};

use crate::layout::detect_tables;
use crate::raster::{EmbeddedImageRasterizer, PageRasterizer};
use crate::reader::{default_readers, PdfReader, ReadError};

/// OCR below this resolution is not worth running.
pub const MIN_OCR_DPI: u32 = 300;

/// Upper bound on rasterization resolution; requests above it are lowered.
pub const MAX_OCR_DPI: u32 = 1200;

/// Raise `dpi` to the OCR minimum and lower it to the supported maximum.
pub fn clamp_dpi(dpi: u32) -> u32 {
    dpi.clamp(MIN_OCR_DPI, MAX_OCR_DPI)
}

/// Where a page's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Native,
    Ocr,
    None,
}

#[derive(Debug, Clone)]
pub struct PageContent {
    /// Zero-based page index.
    pub index: usize,
    pub text: String,
    pub tables: Vec<RawTable>,
    pub source: TextSource,
}

impl PageContent {
    fn has_content(&self) -> bool {
        !self.text.trim().is_empty() || !self.tables.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AcquiredDocument {
    pub pages: Vec<PageContent>,
}

impl AcquiredDocument {
    /// All page text, each page followed by a newline.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            out.push_str(&page.text);
            out.push('\n');
        }
        out
    }

    /// Every native table, in page order.
    pub fn tables(&self) -> impl Iterator<Item = &RawTable> {
        self.pages.iter().flat_map(|p| p.tables.iter())
    }

    /// Zero-based indices of pages whose text came from OCR.
    pub fn ocr_pages(&self) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|p| p.source == TextSource::Ocr)
            .map(|p| p.index)
            .collect()
    }
}

#[derive(Debug)]
pub struct ReaderFailure {
    pub reader: &'static str,
    pub error: ReadError,
}

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("No reader could open the document ({})", describe(.attempts))]
    Unreadable { attempts: Vec<ReaderFailure> },
    #[error("Document opened but its {pages} page(s) yielded no text or tables")]
    Empty { pages: usize },
}

fn describe(attempts: &[ReaderFailure]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.reader, a.error))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy)]
pub struct AcquireOptions {
    pub dpi: u32,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self { dpi: MIN_OCR_DPI }
    }
}

pub struct Acquirer {
    readers: Vec<Box<dyn PdfReader>>,
    rasterizer: Box<dyn PageRasterizer>,
    ocr: Option<Box<dyn OcrBackend>>,
    dpi: u32,
}

impl Acquirer {
    /// `readers` are tried in order until one opens the document. Passing
    /// `ocr: None` disables the image fallback.
    pub fn new(
        readers: Vec<Box<dyn PdfReader>>,
        rasterizer: Box<dyn PageRasterizer>,
        ocr: Option<Box<dyn OcrBackend>>,
        options: AcquireOptions,
    ) -> Self {
        Self { readers, rasterizer, ocr, dpi: clamp_dpi(options.dpi) }
    }

    /// Default reader chain and embedded-image rasterizer.
    pub fn standard(ocr: Option<Box<dyn OcrBackend>>, options: AcquireOptions) -> Self {
        Self::new(default_readers(), Box::new(EmbeddedImageRasterizer), ocr, options)
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn acquire(&self, pdf: &[u8]) -> Result<AcquiredDocument, AcquireError> {
        let raw_pages = self.open(pdf)?;
        let page_count = raw_pages.len();

        let pages: Vec<PageContent> = raw_pages
            .into_iter()
            .enumerate()
            .map(|(index, text)| self.page_content(pdf, index, text))
            .collect();

        if !pages.iter().any(PageContent::has_content) {
            return Err(AcquireError::Empty { pages: page_count });
        }
        Ok(AcquiredDocument { pages })
    }

    fn open(&self, pdf: &[u8]) -> Result<Vec<String>, AcquireError> {
        let mut attempts = Vec::new();
        for reader in &self.readers {
            match reader.read_pages(pdf) {
                Ok(pages) => {
                    if !attempts.is_empty() {
                        warn!(reader = reader.name(), "document opened by fallback reader");
                    }
                    debug!(reader = reader.name(), pages = pages.len(), "document opened");
                    return Ok(pages);
                }
                Err(error) => {
                    warn!(reader = reader.name(), error = %error, "reader failed to open document");
                    attempts.push(ReaderFailure { reader: reader.name(), error });
                }
            }
        }
        Err(AcquireError::Unreadable { attempts })
    }

    fn page_content(&self, pdf: &[u8], index: usize, text: String) -> PageContent {
        let tables = detect_tables(&text);
        if !text.trim().is_empty() || !tables.is_empty() {
            return PageContent { index, text, tables, source: TextSource::Native };
        }

        match self.ocr_page(pdf, index) {
            Some(ocr_text) => {
                // OCR text joins the page text; tables only ever come from the text layer.
                let mut merged = text;
                merged.push_str(&ocr_text);
                PageContent { index, text: merged, tables: Vec::new(), source: TextSource::Ocr }
            }
            None => PageContent { index, text, tables: Vec::new(), source: TextSource::None },
        }
    }

    fn ocr_page(&self, pdf: &[u8], index: usize) -> Option<String> {
        let Some(ocr) = self.ocr.as_deref() else {
            warn!(page = index, "page has no text layer and OCR is disabled");
            return None;
        };

        let image = match self.rasterizer.rasterize(pdf, index, self.dpi) {
            Ok(Some(image)) => image,
            Ok(None) => {
                debug!(page = index, "page has no text layer and nothing to rasterize");
                return None;
            }
            Err(e) => {
                warn!(page = index, error = %e, "rasterization failed");
                return None;
            }
        };

        let png = match prepare_for_ocr(image) {
            Ok(png) => png,
            Err(e) => {
                warn!(page = index, error = %e, "image preprocessing failed");
                return None;
            }
        };

        match ocr.recognize(&png) {
            Ok(text) => {
                debug!(page = index, chars = text.len(), "page recognized by OCR");
                Some(text)
            }
            Err(e) => {
                warn!(page = index, error = %e, "OCR failed");
                None
            }
        }
    }
}
