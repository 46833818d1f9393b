//! FaceGate runtime configuration schema.
//!
//! Every section carries `#[serde(default)]`, so a partial YAML file (or none
//! at all) yields a complete config. Default values live in `defaults.rs`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for FaceGate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceGateConfig {
    /// HTTP listener and static asset settings
    pub server: ServerConfig,

    /// Which face analysis backend to call and how
    pub analyzer: AnalyzerConfig,

    /// Emotion prompt webhook relay
    pub relay: RelayConfig,

    /// Where transient uploads are written
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Directory holding `index.html` and the frontend assets.
    pub static_dir: PathBuf,
    /// URL prefix the static directory is mounted under.
    pub static_prefix: String,
    /// Upper bound on a request body, in bytes.
    pub max_upload_bytes: usize,
    /// Attach a permissive CORS layer.
    pub cors: bool,
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerBackend {
    /// DeepFace-compatible REST API.
    #[default]
    Http,
    /// Local executable speaking JSON over stdin/stdout.
    Command,
}

impl fmt::Display for AnalyzerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerBackend::Http => f.write_str("http"),
            AnalyzerBackend::Command => f.write_str("command"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzerConfig {
    pub backend: AnalyzerBackend,

    /// Base URL of the model server (http backend).
    pub base_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Transport timeout for the http backend. Unset means no timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Face detector name forwarded to the model server (e.g. "opencv", "retinaface").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detector_backend: Option<String>,

    /// Executable for the command backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    /// Leading arguments passed to `program`.
    pub args: Vec<String>,

    /// Whether `/analyze` fails when no face is found.
    pub enforce_detection: bool,
}

// ---------------------------------------------------------------------------
// Relay
// ---------------------------------------------------------------------------

/// Language of the canned relay prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptLanguage {
    #[default]
    Es,
    En,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelayConfig {
    pub enabled: bool,
    /// Webhook receiving `{"text": <prompt>}`.
    pub endpoint: String,
    pub timeout_secs: u64,
    pub language: PromptLanguage,
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    /// Directory for per-request transient image files.
    pub temp_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines on the console instead of human-readable output.
    pub json: bool,
    /// When set, also write daily-rotated NDJSON files here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}
