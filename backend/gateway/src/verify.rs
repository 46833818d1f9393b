//! `POST /verify`: multipart `img1` and `img2`; same person or not.

use axum::{
    extract::{Multipart, State},
    response::Json,
};
use serde_json::Value;
use tracing::{info, instrument};

use crate::analyze::discard;
use crate::error::{ApiError, success};
use crate::server::GatewayState;
use crate::upload::UploadForm;

#[instrument(skip_all)]
pub async fn verify_faces(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let first = form.take_file("img1")?;
    let second = form.take_file("img2")?;

    let temp_dir = &state.config.storage.temp_dir;
    let image_a = first.persist(temp_dir).await?;
    let image_b = second.persist(temp_dir).await?;

    let outcome = state
        .analyzer
        .verify(image_a.path(), image_b.path(), state.config.analyzer.enforce_detection)
        .await;
    let cleanup_a = discard(image_a).await;
    let cleanup_b = discard(image_b).await;

    let result = outcome?;
    cleanup_a?;
    cleanup_b?;

    info!(verified = ?result.verified(), "Verification finished");
    Ok(success(result))
}
