//! HTTP request handlers.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use slipscan_ocr::{ExtractionResult, PipelineError};
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

/// Multipart part that carries the document.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
    pub status: String,
    pub engine: String,
}

/// Service status; also reports which OCR engine this build uses.
pub async fn root(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Invoice Processor API".to_string(),
        status: "running".to_string(),
        engine: state.pipeline.engine_name().to_string(),
    })
}

struct Upload {
    filename: String,
    data: Vec<u8>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
        return Ok(Upload { filename, data: data.to_vec() });
    }
    Err(ApiError::BadRequest(format!("Missing `{FILE_FIELD}` part in form data")))
}

/// Run OCR and field extraction on one uploaded invoice or receipt.
///
/// OCR blocks, so the pipeline runs on the blocking thread pool.
pub async fn process_invoice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractionResult>, ApiError> {
    let upload = read_upload(&mut multipart).await?;
    info!(filename = %upload.filename, bytes = upload.data.len(), "Processing invoice");

    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || {
        pipeline.process_document(&upload.data, &upload.filename)
    })
    .await
    .map_err(|e| PipelineError::InternalFailure(format!("worker failed: {e}")))??;

    info!(
        vendor = %result.vendor_name,
        total = %result.total_amount,
        items = result.line_items.len(),
        "Invoice processed"
    );
    Ok(Json(result))
}
