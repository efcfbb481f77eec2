//! HTTP front end for the invoice OCR pipeline.
//!
//! One processing endpoint (`POST /process-invoice`) plus a status endpoint (`GET /`).

pub mod config;
pub mod error;
pub mod handlers;
pub mod telemetry;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use slipscan_ocr::{DocumentRasterizer, InvoicePipeline, OcrBackend, PreprocessOptions};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub type SharedPipeline = Arc<InvoicePipeline<Box<dyn OcrBackend>, Box<dyn DocumentRasterizer>>>;

/// State shared across handlers. The pipeline is stateless, so no locking is needed.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: SharedPipeline,
}

impl AppState {
    pub fn new(pipeline: SharedPipeline) -> Self {
        Self { pipeline }
    }
}

/// Wire up the OCR engine and PDF renderer this binary was built with.
pub fn build_pipeline(config: &ServerConfig) -> SharedPipeline {
    #[cfg(feature = "tesseract")]
    let recognizer: Box<dyn OcrBackend> = Box::new(
        slipscan_ocr::recognizer::tesseract_backend::TesseractRecognizer::new(
            config.ocr.data_path.clone(),
            &config.ocr.lang,
            slipscan_ocr::RENDER_DPI,
        ),
    );
    #[cfg(not(feature = "tesseract"))]
    let recognizer: Box<dyn OcrBackend> = Box::new(slipscan_ocr::UnavailableRecognizer);

    #[cfg(feature = "pdfium")]
    let rasterizer: Box<dyn DocumentRasterizer> = Box::new(
        slipscan_ocr::rasterize::pdfium_backend::PdfiumRasterizer::new(config.pdf.library_path.clone()),
    );
    #[cfg(not(feature = "pdfium"))]
    let rasterizer: Box<dyn DocumentRasterizer> = Box::new(slipscan_ocr::UnavailableRasterizer);

    if recognizer.name() == "unavailable" {
        tracing::warn!("Built without the `tesseract` feature; every request will fail OCR");
    }

    let options = PreprocessOptions { contrast_stretch: config.ocr.contrast_stretch };
    Arc::new(InvoicePipeline::new(recognizer, rasterizer).with_options(options))
}

/// Build the API router with all endpoints.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/process-invoice", post(handlers::process_invoice))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        engine = state.pipeline.engine_name(),
        "Starting invoice OCR server"
    );
    axum::serve(listener, build_router(state, config.max_upload_bytes)).await?;
    Ok(())
}
