pub mod extract;
pub mod pipeline;
pub mod preprocess;
pub mod rasterize;
pub mod recognizer;
pub mod types;

pub use extract::{ExtractionDefaults, Extractor, MAX_LINE_ITEMS, UNKNOWN_VENDOR};
pub use pipeline::{extension_of, InvoicePipeline, PipelineError};
pub use preprocess::{load_grayscale, PreprocessError, PreprocessOptions, SourceKind};
pub use rasterize::{DocumentRasterizer, RasterizeError, UnavailableRasterizer, RENDER_DPI};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer, PAGE_SEG_MODE};
pub use slipscan_core::Money;
pub use types::{ConfidenceScores, ExtractionResult, Field, LineItem};
