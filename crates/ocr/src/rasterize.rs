//! First-page PDF rendering for OCR.
//!
//! Rendering is delegated to an external engine behind [`DocumentRasterizer`]; the
//! `pdfium` feature provides a libpdfium-backed implementation.

use image::DynamicImage;
use thiserror::Error;

/// Rendering resolution for document pages. PDF user space is 72 points per inch.
pub const RENDER_DPI: f32 = 300.0;

#[derive(Debug, Error)]
pub enum RasterizeError {
    #[error("Document could not be read: {0}")]
    Unreadable(String),
    #[error("Document has no pages")]
    NoPages,
    #[error("PDF renderer not available: {0}")]
    Unavailable(String),
}

pub trait DocumentRasterizer: Send + Sync {
    /// Render only the first page of `data` at `dpi`.
    fn render_first_page(&self, data: &[u8], dpi: f32) -> Result<DynamicImage, RasterizeError>;
}

impl<T: DocumentRasterizer + ?Sized> DocumentRasterizer for Box<T> {
    fn render_first_page(&self, data: &[u8], dpi: f32) -> Result<DynamicImage, RasterizeError> {
        (**self).render_first_page(data, dpi)
    }
}

/// Stand-in used when the binary was built without a PDF engine.
pub struct UnavailableRasterizer;

impl DocumentRasterizer for UnavailableRasterizer {
    fn render_first_page(&self, _data: &[u8], _dpi: f32) -> Result<DynamicImage, RasterizeError> {
        Err(RasterizeError::Unavailable("build with `pdfium` feature".into()))
    }
}

#[cfg(feature = "pdfium")]
pub mod pdfium_backend {
    use super::{DocumentRasterizer, RasterizeError};
    use image::DynamicImage;
    use pdfium_render::prelude::*;

    /// Binds libpdfium on each call, so the rasterizer itself holds no library state.
    pub struct PdfiumRasterizer {
        library_dir: Option<String>,
    }

    impl PdfiumRasterizer {
        pub fn new(library_dir: Option<String>) -> Self {
            Self { library_dir }
        }

        fn bind(&self) -> Result<Pdfium, RasterizeError> {
            let bindings = match &self.library_dir {
                Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir.as_str()))
                    .or_else(|_| Pdfium::bind_to_system_library()),
                None => Pdfium::bind_to_system_library(),
            }
            .map_err(|e| RasterizeError::Unavailable(e.to_string()))?;
            Ok(Pdfium::new(bindings))
        }
    }

    impl DocumentRasterizer for PdfiumRasterizer {
        fn render_first_page(&self, data: &[u8], dpi: f32) -> Result<DynamicImage, RasterizeError> {
            let pdfium = self.bind()?;
            let document = pdfium
                .load_pdf_from_byte_slice(data, None)
                .map_err(|e| RasterizeError::Unreadable(e.to_string()))?;
            let page = document.pages().first().map_err(|_| RasterizeError::NoPages)?;

            let scale = dpi / 72.0;
            let config = PdfRenderConfig::new()
                .set_target_width((page.width().value * scale) as i32)
                .set_maximum_height((page.height().value * scale) as i32);

            let bitmap = page
                .render_with_config(&config)
                .map_err(|e| RasterizeError::Unreadable(e.to_string()))?;
            Ok(bitmap.as_image())
        }
    }
}
