//! Local command backend.
//!
//! Runs `program args...` once per call. The request goes to stdin as one JSON
//! object (`{"op": "analyze", "img_path": .., "actions": [..], "enforce_detection": ..}`
//! or `{"op": "verify", "img1_path": .., "img2_path": .., ..}`) and the result is
//! read from stdout in the same shapes the DeepFace server returns. A non-zero
//! exit status is a failure whose message is the process's stderr.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use facegate_config::AnalyzerConfig;
use facegate_core::{ActionSet, AnalysisResult, FaceAnalyzer, FaceGateError, VerifyResult};
use serde_json::{Value, json};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::{classify_failure, error_message, parse_analysis};

const BACKEND: &str = "command";

pub struct CommandAnalyzer {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandAnalyzer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, FaceGateError> {
        let program = config
            .program
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| FaceGateError::Config("command analyzer requires a program".into()))?;
        Ok(Self {
            program: program.to_string(),
            args: config.args.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        })
    }

    async fn run(&self, request: Value) -> Result<Value, FaceGateError> {
        let payload = serde_json::to_vec(&request).map_err(|e| {
            FaceGateError::analyzer(BACKEND, format!("failed to encode request: {e}"))
        })?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                FaceGateError::analyzer(BACKEND, format!("failed to spawn {}: {e}", self.program))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload).await?;
            stdin.shutdown().await?;
        }

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    warn!(program = %self.program, limit = ?limit, "Analyzer command timed out");
                    FaceGateError::analyzer(BACKEND, format!("timed out after {limit:?}"))
                })??,
            None => child.wait_with_output().await?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(status = ?output.status.code(), stderr = %stderr, "Analyzer command failed");
            let message = match error_message(&stderr) {
                m if m.is_empty() => format!("exited with {}", output.status),
                m => m,
            };
            return Err(classify_failure(BACKEND, message));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| FaceGateError::analyzer(BACKEND, format!("invalid JSON on stdout: {e}")))
    }
}

#[async_trait]
impl FaceAnalyzer for CommandAnalyzer {
    fn name(&self) -> &str {
        BACKEND
    }

    #[instrument(skip(self, image, actions), fields(program = %self.program))]
    async fn analyze(
        &self,
        image: &Path,
        actions: &ActionSet,
        enforce_detection: bool,
    ) -> Result<AnalysisResult, FaceGateError> {
        let request = json!({
            "op": "analyze",
            "img_path": image.to_string_lossy(),
            "actions": actions,
            "enforce_detection": enforce_detection,
        });
        let result = parse_analysis(BACKEND, self.run(request).await?)?;
        info!(faces = result.len(), "Analyzer command returned results");
        Ok(result)
    }

    #[instrument(skip(self, image_a, image_b), fields(program = %self.program))]
    async fn verify(
        &self,
        image_a: &Path,
        image_b: &Path,
        enforce_detection: bool,
    ) -> Result<VerifyResult, FaceGateError> {
        let request = json!({
            "op": "verify",
            "img1_path": image_a.to_string_lossy(),
            "img2_path": image_b.to_string_lossy(),
            "enforce_detection": enforce_detection,
        });
        match self.run(request).await? {
            Value::Object(map) if map.get("verified").is_some_and(Value::is_boolean) => {
                Ok(VerifyResult(map))
            }
            other => Err(FaceGateError::analyzer(
                BACKEND,
                format!("verify output lacks a boolean 'verified': {other}"),
            )),
        }
    }
}
