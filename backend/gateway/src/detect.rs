//! `POST /detect`: does the uploaded image contain a face?
//!
//! Runs the analyzer with enforcement on, so "no face" is reported as the
//! distinct `{"detected": false}` answer rather than a best-effort guess.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use facegate_core::{ActionSet, FaceGateError};
use serde_json::{Value, json};
use tracing::{error, info, instrument};

use crate::analyze::discard;
use crate::server::GatewayState;
use crate::upload::UploadForm;

#[instrument(skip_all)]
pub async fn detect_face(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    match run_detection(&state, multipart).await {
        Ok(detected) => {
            info!(detected, "Face detection finished");
            (StatusCode::OK, Json(json!({ "detected": detected })))
        }
        Err(e) => {
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            error!(error = %e, "Face detection failed");
            (status, Json(json!({ "detected": false, "error": e.to_string() })))
        }
    }
}

async fn run_detection(state: &GatewayState, multipart: Multipart) -> Result<bool, FaceGateError> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let upload = form.take_file("file")?;

    let image = upload.persist(&state.config.storage.temp_dir).await?;
    let outcome = state
        .analyzer
        .analyze(image.path(), &ActionSet::default(), true)
        .await;
    let cleanup = discard(image).await;

    let detected = match outcome {
        Ok(result) => !result.is_empty(),
        Err(FaceGateError::NoFaceDetected(_)) => false,
        Err(e) => return Err(e),
    };
    cleanup?;
    Ok(detected)
}
