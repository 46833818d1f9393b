//! DeepFace REST API client.
//!
//! Speaks the routes of the DeepFace model server:
//! `POST /analyze {img_path, actions, enforce_detection}` → `{"results": [...]}`
//! and `POST /verify {img1_path, img2_path, enforce_detection}` → `{"verified": ..}`.
//! Images travel inline as base64 data URLs.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use facegate_config::AnalyzerConfig;
use facegate_core::{ActionSet, AnalysisResult, FaceAnalyzer, FaceGateError, VerifyResult};
use facegate_media::{detect_mime_type, sniff_image_mime};
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::{classify_failure, error_message, parse_analysis};

const BACKEND: &str = "deepface-http";

pub struct HttpAnalyzer {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    detector_backend: Option<String>,
}

impl HttpAnalyzer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            detector_backend: None,
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, FaceGateError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| FaceGateError::Config(format!("failed to build analyzer client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            detector_backend: config.detector_backend.clone(),
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_detector_backend(mut self, detector: impl Into<String>) -> Self {
        self.detector_backend = Some(detector.into());
        self
    }

    /// Read an image file and encode it as a data URL.
    async fn encode_image(path: &Path) -> Result<String, FaceGateError> {
        let bytes = tokio::fs::read(path).await?;
        let mime = sniff_image_mime(&bytes).unwrap_or_else(|| detect_mime_type(path));
        Ok(format!("data:{};base64,{}", mime, STANDARD.encode(&bytes)))
    }

    async fn post(&self, route: &str, mut body: Value) -> Result<Value, FaceGateError> {
        if let (Some(detector), Some(map)) = (&self.detector_backend, body.as_object_mut()) {
            map.insert("detector_backend".into(), Value::String(detector.clone()));
        }

        let url = format!("{}{}", self.base_url, route);
        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| {
                FaceGateError::analyzer(BACKEND, format!("request to {route} failed: {e}"))
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| {
                FaceGateError::analyzer(BACKEND, format!("failed to read response: {e}"))
            })?;

        if !status.is_success() {
            debug!(%status, body = %text, "Analyzer returned an error status");
            return Err(classify_failure(BACKEND, error_message(&text)));
        }

        serde_json::from_str(&text)
            .map_err(|e| {
                FaceGateError::analyzer(BACKEND, format!("invalid JSON from {route}: {e}"))
            })
    }
}

#[async_trait]
impl FaceAnalyzer for HttpAnalyzer {
    fn name(&self) -> &str {
        BACKEND
    }

    #[instrument(skip(self, image, actions), fields(actions = %actions))]
    async fn analyze(
        &self,
        image: &Path,
        actions: &ActionSet,
        enforce_detection: bool,
    ) -> Result<AnalysisResult, FaceGateError> {
        let img = Self::encode_image(image).await?;
        let body = json!({
            "img_path": img,
            "actions": actions,
            "enforce_detection": enforce_detection,
        });
        let value = self.post("/analyze", body).await?;
        let result = parse_analysis(BACKEND, value)?;
        info!(faces = result.len(), "Analyzer returned results");
        Ok(result)
    }

    #[instrument(skip(self, image_a, image_b))]
    async fn verify(
        &self,
        image_a: &Path,
        image_b: &Path,
        enforce_detection: bool,
    ) -> Result<VerifyResult, FaceGateError> {
        let body = json!({
            "img1_path": Self::encode_image(image_a).await?,
            "img2_path": Self::encode_image(image_b).await?,
            "enforce_detection": enforce_detection,
        });
        match self.post("/verify", body).await? {
            Value::Object(map) if map.get("verified").is_some_and(Value::is_boolean) => {
                Ok(VerifyResult(map))
            }
            other => Err(FaceGateError::analyzer(
                BACKEND,
                format!("verify response lacks a boolean 'verified': {other}"),
            )),
        }
    }
}
