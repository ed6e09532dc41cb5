//! Caller-facing error responses.
//!
//! Maps the forwarding taxonomy onto the relay's stable wire convention:
//! caller mistakes are 400s, every upstream-related failure is a 502 with a
//! diagnostic `detail` the UI can surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::upstream::gateway::ForwardError;

/// Error body shape the VisionFlux frontend consumes.
#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ForwardError {
    /// HTTP status this failure surfaces as.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForwardError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ForwardError::TransportFailure { .. }
            | ForwardError::MalformedResponse { .. }
            | ForwardError::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
