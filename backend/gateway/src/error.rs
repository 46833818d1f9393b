//! JSON envelopes.
//!
//! Success: `{"status": "success", "data": ...}`.
//! Failure: `{"status": "error", "message": ...}` with 400 or 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use facegate_core::FaceGateError;
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

/// Wrap a payload in the success envelope.
pub fn success<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(json!({ "status": "success", "data": data }))
}

/// Error returned by handlers; rendered as the error envelope.
#[derive(Debug)]
pub struct ApiError(pub FaceGateError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<FaceGateError> for ApiError {
    fn from(err: FaceGateError) -> Self {
        Self(err)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self(FaceGateError::Io(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            warn!(error = %self.0, "Rejected request");
        }
        let body = json!({ "status": "error", "message": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let err = ApiError::from(FaceGateError::BadRequest("missing 'file'".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn analyzer_failure_maps_to_500() {
        let err = ApiError::from(FaceGateError::analyzer("mock", "boom"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = ApiError::from(std::io::Error::other("disk full"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
