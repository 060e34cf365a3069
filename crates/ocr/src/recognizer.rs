use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
}

/// Abstraction over an OCR backend.
/// Implementations accept PNG/JPEG page images and return the recognized text.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError>;
}

impl<T: OcrBackend + ?Sized> OcrBackend for Arc<T> {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        (**self).recognize(image_bytes)
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set string and counts how often it was asked. Lets the
/// acquisition layer be tested without Tesseract installed.
pub struct MockRecognizer {
    pub text: String,
    calls: AtomicUsize,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::LepTess;

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
        /// Resolution the page was rasterized at; stops Tesseract guessing from
        /// missing image metadata.
        dpi: i32,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str, dpi: u32) -> Self {
            Self {
                data_path,
                lang: lang.to_string(),
                dpi: i32::try_from(dpi).unwrap_or(i32::MAX),
            }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.set_source_resolution(self.dpi);
            lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_preset_text() {
        let r = MockRecognizer::new("01 01\nGrocery Store\n150.00-");
        assert_eq!(r.recognize(b"fake image data").unwrap(), "01 01\nGrocery Store\n150.00-");
    }

    #[test]
    fn mock_counts_calls() {
        let r = MockRecognizer::new("hello");
        assert_eq!(r.calls(), 0);
        r.recognize(b"anything").unwrap();
        r.recognize(b"").unwrap();
        assert_eq!(r.calls(), 2);
    }

    #[test]
    fn backend_is_object_safe() {
        let backend: Box<dyn OcrBackend> = Box::new(MockRecognizer::new("x"));
        assert_eq!(backend.recognize(b"").unwrap(), "x");
    }

    #[test]
    fn shared_backend_counts_through_arc() {
        let shared = Arc::new(MockRecognizer::new("x"));
        let backend: Box<dyn OcrBackend> = Box::new(Arc::clone(&shared));
        backend.recognize(b"").unwrap();
        assert_eq!(shared.calls(), 1);
    }
}
