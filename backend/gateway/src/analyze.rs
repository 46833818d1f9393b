//! `POST /analyze`: multipart `file` plus optional comma-separated `actions`.

use axum::{
    extract::{Multipart, State},
    response::Json,
};
use facegate_core::{ActionSet, FaceGateError};
use facegate_media::TransientImage;
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::error::{ApiError, success};
use crate::server::GatewayState;
use crate::upload::UploadForm;

#[instrument(skip_all)]
pub async fn analyze_face(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let upload = form.take_file("file")?;
    let actions = ActionSet::parse(form.text("actions").unwrap_or_default());

    info!(
        filename = upload.filename.as_deref().unwrap_or("<unnamed>"),
        size = upload.bytes.len(),
        actions = %actions,
        "Analyzing image"
    );

    let image = upload.persist(&state.config.storage.temp_dir).await?;
    let outcome = state
        .analyzer
        .analyze(image.path(), &actions, state.config.analyzer.enforce_detection)
        .await;
    let cleanup = discard(image).await;

    let result = outcome?;
    cleanup?;

    if let Some(relay) = &state.relay {
        relay.relay_result(&result);
    }

    info!(faces = result.len(), "Returning analysis result");
    Ok(success(result))
}

/// Remove a transient image, logging any failure before returning it.
pub(crate) async fn discard(image: TransientImage) -> Result<(), FaceGateError> {
    let path = image.path().to_path_buf();
    image.remove().await.map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to remove transient image");
        FaceGateError::Io(e)
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::StatusCode;
    use facegate_config::PromptLanguage;
    use facegate_core::Action;
    use facegate_relay::WebhookRelay;
    use facegate_understanding::MockAnalyzer;
    use serde_json::json;

    use crate::test_support::*;

    #[tokio::test]
    async fn success_wraps_raw_result_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = Arc::new(MockAnalyzer::with_emotion("neutral"));
        let app = router(config_with_temp_dir(dir.path()), analyzer.clone(), None);

        let resp = post_multipart(
            app,
            "/analyze",
            &[file("file", "me.jpg", JPEG), text("actions", "emotion, age")],
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"][0]["dominant_emotion"], "neutral");
        assert_eq!(body["data"][0]["region"]["w"], 64);

        let calls = analyzer.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].image_existed);
        assert!(!calls[0].enforce_detection);
        assert_eq!(
            calls[0].actions.as_ref().unwrap().as_slice(),
            &[Action::Emotion, Action::Age]
        );
        assert!(!calls[0].image.exists());
        assert_eq!(leftover_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn blank_actions_default_to_emotion() {
        for actions in [None, Some(""), Some("   "), Some("height,,")] {
            let dir = tempfile::tempdir().unwrap();
            let analyzer = Arc::new(MockAnalyzer::with_emotion("happy"));
            let app = router(config_with_temp_dir(dir.path()), analyzer.clone(), None);

            let mut parts = vec![file("file", "me.jpg", JPEG)];
            if let Some(a) = actions {
                parts.push(text("actions", a));
            }
            let resp = post_multipart(app, "/analyze", &parts).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(
                analyzer.calls()[0].actions.as_ref().unwrap().as_slice(),
                &[Action::Emotion],
                "actions = {actions:?}"
            );
        }
    }

    #[tokio::test]
    async fn analyzer_failure_is_500_envelope_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = Arc::new(MockAnalyzer::failing("model exploded"));
        let app = router(config_with_temp_dir(dir.path()), analyzer.clone(), None);

        let resp = post_multipart(app, "/analyze", &[file("file", "me.jpg", JPEG)]).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "error");
        let message = body["message"].as_str().unwrap();
        assert!(!message.is_empty());
        assert!(message.contains("model exploded"));

        assert!(analyzer.calls()[0].image_existed);
        assert_eq!(leftover_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn same_filename_concurrently_uses_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = Arc::new(MockAnalyzer::with_emotion("happy"));
        let app = router(config_with_temp_dir(dir.path()), analyzer.clone(), None);

        let parts = [file("file", "frame.jpg", JPEG)];
        let (a, b) = tokio::join!(
            post_multipart(app.clone(), "/analyze", &parts),
            post_multipart(app, "/analyze", &parts),
        );
        assert_eq!(a.status(), StatusCode::OK);
        assert_eq!(b.status(), StatusCode::OK);

        let calls = analyzer.calls();
        assert_eq!(calls.len(), 2);
        assert_ne!(calls[0].image, calls[1].image);
        assert_eq!(leftover_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn missing_file_field_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = Arc::new(MockAnalyzer::with_emotion("happy"));
        let app = router(config_with_temp_dir(dir.path()), analyzer.clone(), None);

        let resp = post_multipart(app, "/analyze", &[text("actions", "age")]).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("'file'"));
        assert!(analyzer.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_upload_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(
            config_with_temp_dir(dir.path()),
            Arc::new(MockAnalyzer::with_emotion("happy")),
            None,
        );
        let resp = post_multipart(app, "/analyze", &[file("file", "empty.jpg", b"")]).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with_temp_dir(dir.path());
        config.server.max_upload_bytes = 64;
        let analyzer = Arc::new(MockAnalyzer::with_emotion("happy"));
        let app = router(config, analyzer.clone(), None);

        let big = vec![0xAB; 4096];
        let resp = post_multipart(app, "/analyze", &[file("file", "big.jpg", &big)]).await;
        assert!(resp.status().is_client_error());
        assert!(analyzer.calls().is_empty());
        assert_eq!(leftover_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn failing_webhook_does_not_change_response() {
        let mut server = mockito::Server::new_async().await;
        let hook = server
            .mock("POST", "/ws-message")
            .match_body(mockito::Matcher::Json(json!({
                "text": "He detectado un usuario que parece estar feliz. Salúdalo con entusiasmo."
            })))
            .with_status(503)
            .create_async()
            .await;

        let relay = WebhookRelay::new(
            format!("{}/ws-message", server.url()),
            Duration::from_secs(2),
            PromptLanguage::Es,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let with_relay = router(
            config_with_temp_dir(dir.path()),
            Arc::new(MockAnalyzer::with_emotion("Happy")),
            Some(relay),
        );
        let without_relay = router(
            config_with_temp_dir(dir.path()),
            Arc::new(MockAnalyzer::with_emotion("Happy")),
            None,
        );

        let parts = [file("file", "me.jpg", JPEG)];
        let relayed = post_multipart(with_relay, "/analyze", &parts).await;
        let plain = post_multipart(without_relay, "/analyze", &parts).await;

        assert_eq!(relayed.status(), StatusCode::OK);
        assert_eq!(relayed.status(), plain.status());
        assert_eq!(body_json(relayed).await, body_json(plain).await);

        for _ in 0..100 {
            if hook.matched_async().await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        hook.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_webhook_does_not_change_response() {
        let relay = WebhookRelay::new(
            "http://127.0.0.1:9/ws-message",
            Duration::from_millis(200),
            PromptLanguage::En,
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let app = router(
            config_with_temp_dir(dir.path()),
            Arc::new(MockAnalyzer::with_emotion("sad")),
            Some(relay),
        );

        let resp = post_multipart(app, "/analyze", &[file("file", "me.jpg", JPEG)]).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"][0]["dominant_emotion"], "sad");
    }
}
