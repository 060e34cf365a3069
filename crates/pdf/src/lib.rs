pub mod acquire;
pub mod layout;
pub mod raster;
pub mod reader;

pub use acquire::{
    clamp_dpi, AcquireError, AcquireOptions, AcquiredDocument, Acquirer, PageContent, ReaderFailure,
    TextSource, MAX_OCR_DPI, MIN_OCR_DPI,
};
pub use layout::detect_tables;
pub use raster::{EmbeddedImageRasterizer, PageRasterizer, RasterError};
pub use reader::{default_readers, LopdfReader, PdfExtractReader, PdfReader, ReadError};
