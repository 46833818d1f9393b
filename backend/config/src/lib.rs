//! `facegate-config`: FaceGate runtime configuration.
//!
//! Provides:
//! - Typed config schema (server, analyzer, relay, storage, logging)
//! - YAML read/write
//! - `${ENV_VAR}` substitution and `FACEGATE_*` overrides
//! - Config redaction for safe display
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{
    apply_env_overrides, apply_env_overrides_with, resolve_env_vars, resolve_env_vars_with,
    MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_raw_config, write_config};
pub use redact::redact;
pub use schema::{
    AnalyzerBackend, AnalyzerConfig, FaceGateConfig, LoggingConfig, PromptLanguage, RelayConfig,
    ServerConfig, StorageConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Load a config file, substitute env vars, apply overrides, and validate.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<FaceGateConfig> {
    load_and_prepare_with(path, &std::env::vars().collect()).await
}

/// Same as [`load_and_prepare`] with an explicit environment.
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<FaceGateConfig> {
    let value = load_raw_config(path).await?;
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;

    let config: FaceGateConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;
    let config = apply_env_overrides_with(config, env);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if !report.is_valid() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        let summary: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("Invalid configuration: {}", summary.join("; "));
    }

    Ok(config)
}
