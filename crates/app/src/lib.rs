pub mod config;
pub mod pipeline;

pub use config::{ConfigError, ConvertConfig, OcrConfig};
pub use pipeline::{Conversion, ConvertError, StatementConverter, Strategy};
