//! Environment handling for config values.
//!
//! Two passes run at load time:
//! - `${VAR_NAME}` references inside string values are substituted. Only
//!   uppercase `[A-Z_][A-Z0-9_]*` names are matched; `$${VAR}` escapes to a
//!   literal `${VAR}`.
//! - A fixed set of `FACEGATE_*` variables override individual fields.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::schema::FaceGateConfig;

/// `${VAR}` with an optional leading `$` that marks an escape.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree from the process env.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    substitute_value(value, &std::env::vars().collect(), "")
}

/// Substitute env vars using a provided map (useful for testing).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &Captures| {
        let var_name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply `FACEGATE_*` overrides from the process environment.
pub fn apply_env_overrides(config: FaceGateConfig) -> FaceGateConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply `FACEGATE_*` overrides from a provided map.
pub fn apply_env_overrides_with(
    mut config: FaceGateConfig,
    env: &HashMap<String, String>,
) -> FaceGateConfig {
    let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(bind) = get("FACEGATE_BIND") {
        config.server.bind = bind.to_string();
    }
    if let Some(port) = get("FACEGATE_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(value = %port, "Ignoring invalid FACEGATE_PORT"),
        }
    }
    if let Some(url) = get("FACEGATE_ANALYZER_URL") {
        config.analyzer.base_url = url.to_string();
    }
    if let Some(endpoint) = get("FACEGATE_RELAY_ENDPOINT") {
        config.relay.endpoint = endpoint.to_string();
    }
    if let Some(enabled) = get("FACEGATE_RELAY_ENABLED") {
        match parse_bool(enabled) {
            Some(enabled) => config.relay.enabled = enabled,
            None => warn!(value = %enabled, "Ignoring invalid FACEGATE_RELAY_ENABLED"),
        }
    }
    if let Some(dir) = get("FACEGATE_TEMP_DIR") {
        config.storage.temp_dir = PathBuf::from(dir);
    }
    if let Some(level) = get("RUST_LOG") {
        config.logging.level = level.to_string();
    }

    debug!("Applied environment overrides");
    config
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_simple_var() {
        let v = json!({"apiKey": "${DEEPFACE_API_KEY}"});
        let env = env(&[("DEEPFACE_API_KEY", "sk-abc123")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["apiKey"], "sk-abc123");
    }

    #[test]
    fn substitutes_inside_larger_string() {
        let v = json!({"relay": {"endpoint": "https://${RELAY_HOST}/ws-message"}});
        let env = env(&[("RELAY_HOST", "hooks.example.com")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["relay"]["endpoint"], "https://hooks.example.com/ws-message");
    }

    #[test]
    fn error_on_missing_var_names_path() {
        let v = json!({"analyzer": {"baseUrl": "${MISSING_VAR}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("MISSING_VAR"));
        assert!(msg.contains("analyzer.baseUrl"));
    }

    #[test]
    fn escaped_reference_is_kept_literal() {
        let v = json!({"key": "$${NOT_A_VAR}"});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result["key"], "${NOT_A_VAR}");
    }

    #[test]
    fn passthrough_non_var_strings() {
        let v = json!({"key": "plain-string", "n": 3});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result, v);
    }

    #[test]
    fn overrides_apply_to_fields() {
        let env = env(&[
            ("FACEGATE_PORT", "9090"),
            ("FACEGATE_RELAY_ENABLED", "yes"),
            ("FACEGATE_RELAY_ENDPOINT", "http://localhost:7000/hook"),
            ("FACEGATE_TEMP_DIR", "/var/tmp/fg"),
        ]);
        let cfg = apply_env_overrides_with(FaceGateConfig::default(), &env);
        assert_eq!(cfg.server.port, 9090);
        assert!(cfg.relay.enabled);
        assert_eq!(cfg.relay.endpoint, "http://localhost:7000/hook");
        assert_eq!(cfg.storage.temp_dir, PathBuf::from("/var/tmp/fg"));
    }

    #[test]
    fn invalid_overrides_are_ignored() {
        let env = env(&[("FACEGATE_PORT", "not-a-port"), ("FACEGATE_RELAY_ENABLED", "maybe")]);
        let cfg = apply_env_overrides_with(FaceGateConfig::default(), &env);
        assert_eq!(cfg.server.port, crate::defaults::DEFAULT_PORT);
        assert!(!cfg.relay.enabled);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn invalid_overrides_are_reported() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let env = env(&[("FACEGATE_PORT", "abc"), ("FACEGATE_RELAY_ENABLED", "maybe")]);
        tracing::subscriber::with_default(subscriber, || {
            apply_env_overrides_with(FaceGateConfig::default(), &env);
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Ignoring invalid FACEGATE_PORT"));
        assert!(output.contains("value=abc"));
        assert!(output.contains("Ignoring invalid FACEGATE_RELAY_ENABLED"));
    }
}
