use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use std::io::Cursor;
use thiserror::Error;

use crate::rasterize::{DocumentRasterizer, RasterizeError, RENDER_DPI};

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Unsupported or unreadable file: {0}")]
    UnsupportedFormat(String),
    #[error("Document renderer unavailable: {0}")]
    RendererUnavailable(String),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

impl From<RasterizeError> for PreprocessError {
    fn from(e: RasterizeError) -> Self {
        match e {
            RasterizeError::Unavailable(msg) => PreprocessError::RendererUnavailable(msg),
            other => PreprocessError::UnsupportedFormat(other.to_string()),
        }
    }
}

/// How the incoming bytes are turned into a bitmap, decided by the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Rendered page by page; only the first page is used.
    Document,
    Image,
}

impl SourceKind {
    pub fn from_extension(ext: &str) -> Self {
        if ext.eq_ignore_ascii_case("pdf") {
            SourceKind::Document
        } else {
            SourceKind::Image
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// Stretch luminance to the full 0–255 range after the grayscale conversion.
    pub contrast_stretch: bool,
}

/// Decode or render `data` and return a grayscale bitmap ready for OCR.
pub fn load_grayscale<P: DocumentRasterizer + ?Sized>(
    data: &[u8],
    ext: &str,
    rasterizer: &P,
    options: PreprocessOptions,
) -> Result<GrayImage, PreprocessError> {
    let img = match SourceKind::from_extension(ext) {
        SourceKind::Document => rasterizer.render_first_page(data, RENDER_DPI)?,
        SourceKind::Image => image::load_from_memory(data)
            .map_err(|e| PreprocessError::UnsupportedFormat(e.to_string()))?,
    };
    let gray = img.to_luma8();
    Ok(if options.contrast_stretch { stretch_contrast(gray) } else { gray })
}

/// Map the darkest pixel to 0 and the brightest to 255.
fn stretch_contrast(gray: GrayImage) -> GrayImage {
    let (min_px, max_px) = gray
        .pixels()
        .fold((255u8, 0u8), |(mn, mx), p| (mn.min(p[0]), mx.max(p[0])));

    if max_px <= min_px {
        // Uniform image, nothing to stretch.
        return gray;
    }

    let range = (max_px - min_px) as u32;
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let p = gray.get_pixel(x, y)[0];
        Luma([((p - min_px) as u32 * 255 / range) as u8])
    })
}

/// PNG-encode a grayscale bitmap for the OCR backend.
pub fn encode_png(gray: GrayImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(gray)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterize::UnavailableRasterizer;
    use image::{Rgb, RgbImage};

    struct BlankPage;

    impl DocumentRasterizer for BlankPage {
        fn render_first_page(&self, _data: &[u8], dpi: f32) -> Result<DynamicImage, RasterizeError> {
            // A letter-width strip at the requested resolution.
            let width = (8.5 * dpi) as u32;
            Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(width, 2, Rgb([250, 240, 230]))))
        }
    }

    fn png_of(img: DynamicImage) -> Vec<u8> {
        let mut png_bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
            .unwrap();
        png_bytes
    }

    fn gradient_gray(width: u32, height: u32) -> GrayImage {
        ImageBuffer::from_fn(width, height, |x, _| Luma([(64 + x * 64 / width) as u8]))
    }

    #[test]
    fn color_image_becomes_grayscale() {
        let rgb = RgbImage::from_pixel(4, 3, Rgb([200, 10, 10]));
        let data = png_of(DynamicImage::ImageRgb8(rgb));
        let gray = load_grayscale(&data, "png", &UnavailableRasterizer, PreprocessOptions::default()).unwrap();
        assert_eq!(gray.dimensions(), (4, 3));
    }

    #[test]
    fn pdf_extension_goes_through_rasterizer_at_300_dpi() {
        let gray = load_grayscale(b"%PDF-1.7", "PDF", &BlankPage, PreprocessOptions::default()).unwrap();
        assert_eq!(gray.width(), 2550);
    }

    #[test]
    fn garbage_bytes_are_unsupported() {
        let err = load_grayscale(b"not an image", "jpg", &UnavailableRasterizer, PreprocessOptions::default())
            .unwrap_err();
        assert!(matches!(err, PreprocessError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_renderer_is_not_a_format_error() {
        let err = load_grayscale(b"%PDF-1.7", "pdf", &UnavailableRasterizer, PreprocessOptions::default())
            .unwrap_err();
        assert!(matches!(err, PreprocessError::RendererUnavailable(_)));
    }

    #[test]
    fn stretch_uniform_image_is_untouched() {
        let img: GrayImage = ImageBuffer::from_pixel(10, 10, Luma([128u8]));
        let result = stretch_contrast(img.clone());
        assert_eq!(result, img);
    }

    #[test]
    fn stretch_gradient_to_full_range() {
        let result = stretch_contrast(gradient_gray(256, 1));
        let min = result.pixels().map(|p| p[0]).min().unwrap();
        let max = result.pixels().map(|p| p[0]).max().unwrap();
        assert_eq!(min, 0);
        assert_eq!(max, 255);
    }

    #[test]
    fn contrast_stretch_is_opt_in() {
        let data = png_of(DynamicImage::ImageLuma8(gradient_gray(16, 1)));
        let plain = load_grayscale(&data, "png", &UnavailableRasterizer, PreprocessOptions::default()).unwrap();
        assert_eq!(plain.pixels().map(|p| p[0]).min(), Some(64));

        let options = PreprocessOptions { contrast_stretch: true };
        let stretched = load_grayscale(&data, "png", &UnavailableRasterizer, options).unwrap();
        assert_eq!(stretched.pixels().map(|p| p[0]).min(), Some(0));
    }

    #[test]
    fn encode_produces_png_header() {
        let png = encode_png(ImageBuffer::from_pixel(4, 4, Luma([100u8]))).unwrap();
        // PNG magic bytes: 0x89 0x50 0x4E 0x47
        assert_eq!(&png[..4], b"\x89PNG");
    }
}
