use std::path::Path;

use ledgerscan_core::BankTag;
use ledgerscan_pdf::{clamp_dpi, MIN_OCR_DPI};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub enabled: bool,
    /// Rasterization resolution, clamped into the supported OCR range on use.
    pub dpi: u32,
    pub language: String,
    /// Tesseract `tessdata` directory; the engine default when unset.
    pub data_path: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dpi: MIN_OCR_DPI,
            language: "eng".to_string(),
            data_path: None,
        }
    }
}

impl OcrConfig {
    pub fn effective_dpi(&self) -> u32 {
        clamp_dpi(self.dpi)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Skip bank detection and parse every document as this bank.
    pub bank: Option<BankTag>,
    pub ocr: OcrConfig,
}

impl ConvertConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        let config = ConvertConfig::from_toml("").unwrap();
        assert_eq!(config, ConvertConfig::default());
        assert!(config.ocr.enabled);
        assert_eq!(config.ocr.dpi, 300);
        assert_eq!(config.ocr.language, "eng");
    }

    #[test]
    fn full_document() {
        let config = ConvertConfig::from_toml(
            r#"
bank = "fnb"

[ocr]
enabled = false
dpi = 400
language = "eng+afr"
data_path = "/usr/share/tessdata"
"#,
        )
        .unwrap();
        assert_eq!(config.bank, Some(BankTag::Fnb));
        assert!(!config.ocr.enabled);
        assert_eq!(config.ocr.effective_dpi(), 400);
        assert_eq!(config.ocr.data_path.as_deref(), Some("/usr/share/tessdata"));
    }

    #[test]
    fn low_dpi_is_raised() {
        let config = ConvertConfig::from_toml("[ocr]\ndpi = 150\n").unwrap();
        assert_eq!(config.ocr.dpi, 150);
        assert_eq!(config.ocr.effective_dpi(), 300);
    }

    #[test]
    fn excessive_dpi_is_lowered() {
        let config = ConvertConfig::from_toml("[ocr]\ndpi = 1000000\n").unwrap();
        assert_eq!(config.ocr.effective_dpi(), ledgerscan_pdf::MAX_OCR_DPI);
    }

    #[test]
    fn unknown_bank_name_is_an_error() {
        assert!(matches!(
            ConvertConfig::from_toml("bank = \"chase\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bank = \"absa\"").unwrap();
        let config = ConvertConfig::load(file.path()).unwrap();
        assert_eq!(config.bank, Some(BankTag::Absa));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConvertConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
