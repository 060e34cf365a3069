use ledgerscan_core::{BankTag, Transaction};
use ledgerscan_import::{partition, strategy_for, RowSkip, TableVerdict};
use ledgerscan_ocr::OcrBackend;
use ledgerscan_pdf::{
    default_readers, AcquireError, AcquireOptions, AcquiredDocument, Acquirer,
    EmbeddedImageRasterizer, PageRasterizer, PdfReader,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConvertConfig, OcrConfig};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Document could not be opened: {0}")]
    DocumentUnreadable(#[source] AcquireError),
}

/// Which path produced the transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Tables,
    Lines,
    None,
}

#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub bank: BankTag,
    pub strategy: Strategy,
    pub transactions: Vec<Transaction>,
    /// Rows and lines passed over by the winning strategy.
    pub skipped: Vec<RowSkip>,
    pub pages: usize,
    /// Zero-based indices of pages whose text came from OCR.
    pub ocr_pages: Vec<usize>,
}

impl Conversion {
    fn empty(bank: BankTag, pages: usize) -> Self {
        Conversion {
            bank,
            strategy: Strategy::None,
            transactions: Vec::new(),
            skipped: Vec::new(),
            pages,
            ocr_pages: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Statement conversion: acquisition, bank detection, table interpretation,
/// then line parsing when no table produced a transaction.
pub struct StatementConverter {
    acquirer: Acquirer,
    bank_override: Option<BankTag>,
}

impl StatementConverter {
    pub fn new(
        config: &ConvertConfig,
        readers: Vec<Box<dyn PdfReader>>,
        rasterizer: Box<dyn PageRasterizer>,
        ocr: Option<Box<dyn OcrBackend>>,
    ) -> Self {
        let ocr = if config.ocr.enabled { ocr } else { None };
        let options = AcquireOptions { dpi: config.ocr.effective_dpi() };
        Self {
            acquirer: Acquirer::new(readers, rasterizer, ocr, options),
            bank_override: config.bank,
        }
    }

    /// Default reader chain, embedded-image rasterizer and the OCR engine this
    /// build was compiled with.
    pub fn with_defaults(config: &ConvertConfig) -> Self {
        Self::new(
            config,
            default_readers(),
            Box::new(EmbeddedImageRasterizer),
            default_ocr_backend(&config.ocr),
        )
    }

    pub fn convert(&self, pdf: &[u8]) -> Result<Conversion, ConvertError> {
        let document = match self.acquirer.acquire(pdf) {
            Ok(document) => document,
            Err(AcquireError::Empty { pages }) => {
                info!(pages, "document has no extractable text");
                return Ok(Conversion::empty(self.bank_override.unwrap_or(BankTag::Unknown), pages));
            }
            Err(e @ AcquireError::Unreadable { .. }) => {
                return Err(ConvertError::DocumentUnreadable(e));
            }
        };

        let text = document.text();
        let bank = self.bank_override.unwrap_or_else(|| BankTag::detect(&text));
        info!(bank = %bank, pages = document.pages.len(), "detected bank");

        let conversion = interpret(bank, &document, &text);
        info!(
            bank = %bank,
            strategy = ?conversion.strategy,
            transactions = conversion.transactions.len(),
            skipped = conversion.skipped.len(),
            "conversion finished"
        );
        Ok(conversion)
    }
}

fn interpret(bank: BankTag, document: &AcquiredDocument, text: &str) -> Conversion {
    let strategy = strategy_for(bank);
    let mut conversion = Conversion::empty(bank, document.pages.len());
    conversion.ocr_pages = document.ocr_pages();

    let mut table_skips = Vec::new();
    for (index, table) in document.tables().enumerate() {
        match strategy.interpret_table(table) {
            TableVerdict::Rejected(reason) => {
                debug!(table = index, reason = %reason, "table rejected");
            }
            TableVerdict::Interpreted(outcomes) => {
                let (parsed, skipped) = partition(outcomes);
                debug!(
                    table = index,
                    parsed = parsed.len(),
                    skipped = skipped.len(),
                    "table interpreted"
                );
                conversion.transactions.extend(parsed);
                table_skips.extend(skipped);
            }
        }
    }

    if !conversion.transactions.is_empty() {
        log_skips(&table_skips);
        conversion.strategy = Strategy::Tables;
        conversion.skipped = table_skips;
        return conversion;
    }

    let (parsed, skipped) = partition(strategy.interpret_text(text));
    log_skips(&skipped);
    if !parsed.is_empty() {
        conversion.strategy = Strategy::Lines;
    }
    conversion.transactions = parsed;
    conversion.skipped = skipped;
    conversion
}

fn log_skips(skips: &[RowSkip]) {
    for skip in skips {
        debug!(position = skip.position, reason = %skip.reason, "row skipped");
    }
}

#[cfg(feature = "tesseract")]
fn default_ocr_backend(config: &OcrConfig) -> Option<Box<dyn OcrBackend>> {
    if !config.enabled {
        return None;
    }
    Some(Box::new(ledgerscan_ocr::TesseractRecognizer::new(
        config.data_path.clone(),
        &config.language,
        config.effective_dpi(),
    )))
}

#[cfg(not(feature = "tesseract"))]
fn default_ocr_backend(config: &OcrConfig) -> Option<Box<dyn OcrBackend>> {
    if config.enabled {
        tracing::warn!("built without the `tesseract` feature; scanned pages will be left empty");
    }
    None
}
