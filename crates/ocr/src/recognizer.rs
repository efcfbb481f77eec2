use thiserror::Error;

/// Tesseract page segmentation mode 6: a single uniform block of text.
pub const PAGE_SEG_MODE: u32 = 6;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available: build with `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR backend.
/// Implementations accept encoded (PNG) grayscale image bytes and return the recognized text.
/// Recognition may block for as long as the engine needs.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError>;

    /// Short engine name reported by the service status endpoint.
    fn name(&self) -> &'static str;
}

impl<T: OcrBackend + ?Sized> OcrBackend for Box<T> {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        (**self).recognize(image_bytes)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set string. Useful for unit testing the extraction pipeline
/// without requiring Tesseract to be installed.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Stand-in used when the binary was built without an OCR engine.
pub struct UnavailableRecognizer;

impl OcrBackend for UnavailableRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Err(OcrError::NotAvailable)
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError, PAGE_SEG_MODE};
    use leptess::{LepTess, Variable};

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
        dpi: i32,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str, dpi: f32) -> Self {
            Self { data_path, lang: lang.to_string(), dpi: dpi.round() as i32 }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_variable(Variable::TesseditPagesegMode, &PAGE_SEG_MODE.to_string())
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.set_source_resolution(self.dpi);
            lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }

        fn name(&self) -> &'static str {
            "tesseract"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_preset_text() {
        let r = MockRecognizer::new("ACME SUPPLIES\nTotal 11.00");
        assert_eq!(r.recognize(b"fake image data").unwrap(), "ACME SUPPLIES\nTotal 11.00");
    }

    #[test]
    fn mock_ignores_image_content() {
        let r = MockRecognizer::new("hello");
        assert_eq!(r.recognize(b"anything").unwrap(), "hello");
        assert_eq!(r.recognize(b"").unwrap(), "hello");
    }

    #[test]
    fn boxed_backend_delegates() {
        let r: Box<dyn OcrBackend> = Box::new(MockRecognizer::new("boxed"));
        assert_eq!(r.recognize(b"").unwrap(), "boxed");
        assert_eq!(r.name(), "mock");
    }

    #[test]
    fn unavailable_backend_errors() {
        assert!(matches!(UnavailableRecognizer.recognize(b""), Err(OcrError::NotAvailable)));
    }
}
