use thiserror::Error;

use crate::extract::{ExtractionDefaults, Extractor};
use crate::preprocess::{self, PreprocessError, PreprocessOptions};
use crate::rasterize::DocumentRasterizer;
use crate::recognizer::{OcrBackend, OcrError};
use crate::types::ExtractionResult;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The bytes are neither a renderable document nor a decodable image.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    /// OCR ran but produced no text.
    #[error("Could not extract text from image. Please ensure the image is clear and contains readable text.")]
    EmptyRecognition,
    #[error("{0}")]
    InternalFailure(String),
}

impl From<PreprocessError> for PipelineError {
    fn from(e: PreprocessError) -> Self {
        match e {
            PreprocessError::UnsupportedFormat(msg) => PipelineError::UnsupportedFormat(msg),
            other => PipelineError::InternalFailure(other.to_string()),
        }
    }
}

impl From<OcrError> for PipelineError {
    fn from(e: OcrError) -> Self {
        PipelineError::InternalFailure(e.to_string())
    }
}

/// Orchestrates: decode/render → grayscale → OCR → field extraction.
///
/// Holds no per-request state; one instance can serve any number of requests.
pub struct InvoicePipeline<R: OcrBackend, P: DocumentRasterizer> {
    recognizer: R,
    rasterizer: P,
    options: PreprocessOptions,
}

impl<R: OcrBackend, P: DocumentRasterizer> InvoicePipeline<R, P> {
    pub fn new(recognizer: R, rasterizer: P) -> Self {
        Self { recognizer, rasterizer, options: PreprocessOptions::default() }
    }

    pub fn with_options(mut self, options: PreprocessOptions) -> Self {
        self.options = options;
        self
    }

    pub fn engine_name(&self) -> &'static str {
        self.recognizer.name()
    }

    /// Process an uploaded document; `filename` is only used for its extension.
    pub fn process_document(
        &self,
        data: &[u8],
        filename: &str,
    ) -> Result<ExtractionResult, PipelineError> {
        self.process_document_with(data, filename, &ExtractionDefaults::for_today())
    }

    pub fn process_document_with(
        &self,
        data: &[u8],
        filename: &str,
        defaults: &ExtractionDefaults,
    ) -> Result<ExtractionResult, PipelineError> {
        let ext = extension_of(filename);

        // 1. Decode or render, then grayscale.
        let gray = preprocess::load_grayscale(data, &ext, &self.rasterizer, self.options)?;
        tracing::debug!(%ext, width = gray.width(), height = gray.height(), "bitmap ready for OCR");

        // 2. Run OCR.
        let image_bytes = preprocess::encode_png(gray)?;
        let ocr_text = self.recognizer.recognize(&image_bytes)?;
        if ocr_text.trim().is_empty() {
            return Err(PipelineError::EmptyRecognition);
        }

        // 3. Extract structured fields.
        Ok(Extractor::extract(&ocr_text, defaults))
    }
}

/// Lowercased text after the last `.`; the whole name when there is no dot.
pub fn extension_of(filename: &str) -> String {
    filename.rsplit('.').next().unwrap_or_default().to_lowercase()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
