//! Config defaults.

use std::path::PathBuf;

use crate::schema::{
    AnalyzerBackend, AnalyzerConfig, LoggingConfig, PromptLanguage, RelayConfig, ServerConfig,
    StorageConfig,
};

pub const DEFAULT_BIND: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 3001;

pub const DEFAULT_STATIC_DIR: &str = "static";

pub const DEFAULT_STATIC_PREFIX: &str = "/static";

/// 10 MiB; large enough for phone camera stills.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_ANALYZER_URL: &str = "http://127.0.0.1:5005";

pub const DEFAULT_RELAY_ENDPOINT: &str = "https://espectroapi.scanmee.io/ws-message";

pub const DEFAULT_RELAY_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_LOG_LEVEL: &str = "info";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            static_prefix: DEFAULT_STATIC_PREFIX.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors: true,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            backend: AnalyzerBackend::Http,
            base_url: DEFAULT_ANALYZER_URL.to_string(),
            api_key: None,
            timeout_secs: None,
            detector_backend: None,
            program: None,
            args: Vec::new(),
            enforce_detection: false,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_RELAY_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_RELAY_TIMEOUT_SECS,
            language: PromptLanguage::Es,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir().join("facegate"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
            dir: None,
        }
    }
}
