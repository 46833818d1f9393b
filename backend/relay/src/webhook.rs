//! Webhook relay.
//!
//! One POST of `{"text": <prompt>}` per analysis, bounded by a timeout, never
//! retried. [`WebhookRelay::dispatch`] detaches the call so its outcome can only
//! reach the logs, never the response of the request that triggered it.

use std::time::Duration;

use facegate_config::{PromptLanguage, RelayConfig};
use facegate_core::{AnalysisResult, FaceGateError};
use facegate_logging::redact_sensitive_data;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::emotion::{dominant_emotion, prompt_for};

#[derive(Debug, Serialize)]
struct RelayPayload<'a> {
    text: &'a str,
}

#[derive(Clone)]
pub struct WebhookRelay {
    client: reqwest::Client,
    endpoint: String,
    language: PromptLanguage,
}

impl WebhookRelay {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        language: PromptLanguage,
    ) -> Result<Self, FaceGateError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FaceGateError::Config(format!("failed to build relay client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            language,
        })
    }

    /// `None` when relaying is disabled.
    pub fn from_config(config: &RelayConfig) -> Result<Option<Self>, FaceGateError> {
        if !config.enabled {
            return Ok(None);
        }
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
            config.language,
        )
        .map(Some)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the prompt once. Any transport error or non-2xx status is an error.
    pub async fn send(&self, prompt: &str) -> Result<(), FaceGateError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&RelayPayload { text: prompt })
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() { "timed out" } else { "network error" };
                FaceGateError::Relay(redact_sensitive_data(&format!("{kind}: {e}")))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FaceGateError::Relay(format!("status {status}: {body}")));
        }
        info!(%status, "Prompt delivered to relay webhook");
        Ok(())
    }

    /// Send in a detached task; failures are logged and dropped.
    pub fn dispatch(&self, prompt: String) -> JoinHandle<()> {
        let relay = self.clone();
        info!(
            endpoint = %redact_sensitive_data(&relay.endpoint),
            prompt = %prompt,
            "Relaying prompt"
        );
        tokio::spawn(async move {
            if let Err(e) = relay.send(&prompt).await {
                error!(
                    endpoint = %redact_sensitive_data(&relay.endpoint),
                    error = %e,
                    "Relay webhook failed"
                );
            }
        })
    }

    /// Derive the prompt from an analysis and dispatch it, if there is an emotion.
    pub fn relay_result(&self, result: &AnalysisResult) -> Option<JoinHandle<()>> {
        let emotion = dominant_emotion(result)?;
        info!(emotion = %emotion, "Detected dominant emotion");
        Some(self.dispatch(prompt_for(&emotion, self.language)))
    }
}
