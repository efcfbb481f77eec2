use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use slipscan_ocr::PipelineError;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// The request itself is malformed (bad multipart, no `file` part).
    BadRequest(String),
    Pipeline(PipelineError),
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        ApiError::Pipeline(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(PipelineError::UnsupportedFormat(_))
            | ApiError::Pipeline(PipelineError::EmptyRecognition) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(PipelineError::InternalFailure(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Pipeline(e @ PipelineError::InternalFailure(_)) => {
                format!("Error processing invoice: {e}")
            }
            ApiError::Pipeline(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            tracing::error!(%status, %detail, "request failed");
        } else {
            tracing::warn!(%status, %detail, "request rejected");
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}
