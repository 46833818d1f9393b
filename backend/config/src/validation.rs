//! Config validation: field checks with user-friendly error messages.

use crate::schema::{AnalyzerBackend, FaceGateConfig};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &FaceGateConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_analyzer(config, &mut report);
    validate_relay(config, &mut report);
    report
}

fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    (url.starts_with("http://") && url.len() > "http://".len())
        || (url.starts_with("https://") && url.len() > "https://".len())
}

fn validate_server(config: &FaceGateConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if server.port == 0 {
        report.error("server.port", "Port must be between 1 and 65535");
    } else if server.port < 1024 && server.port != 80 && server.port != 443 {
        report.warn(
            "server.port",
            format!(
                "Port {} requires elevated privileges; consider using a port >= 1024",
                server.port
            ),
        );
    }
    if server.bind.trim().is_empty() {
        report.error("server.bind", "Bind address cannot be empty");
    }
    if server.max_upload_bytes == 0 {
        report.error("server.maxUploadBytes", "maxUploadBytes must be > 0");
    }
    if !server.static_prefix.starts_with('/') || server.static_prefix == "/" {
        report.error(
            "server.staticPrefix",
            "staticPrefix must start with '/' and name a sub-path, e.g. '/static'",
        );
    }
}

fn validate_analyzer(config: &FaceGateConfig, report: &mut ValidationReport) {
    let analyzer = &config.analyzer;
    match analyzer.backend {
        AnalyzerBackend::Http => {
            if !is_http_url(&analyzer.base_url) {
                report.error(
                    "analyzer.baseUrl",
                    format!("'{}' is not an http(s) URL", analyzer.base_url),
                );
            }
        }
        AnalyzerBackend::Command => {
            if analyzer.program.as_deref().map(str::trim).unwrap_or("").is_empty() {
                report.error("analyzer.program", "The command backend requires a program");
            }
        }
    }
    if analyzer.timeout_secs == Some(0) {
        report.error("analyzer.timeoutSecs", "timeoutSecs must be > 0 when set");
    }
}

fn validate_relay(config: &FaceGateConfig, report: &mut ValidationReport) {
    let relay = &config.relay;
    if !relay.enabled {
        return;
    }
    if !is_http_url(&relay.endpoint) {
        report.error(
            "relay.endpoint",
            format!("'{}' is not an http(s) URL", relay.endpoint),
        );
    } else if relay.endpoint.trim().starts_with("http://") {
        report.warn("relay.endpoint", "Relay endpoint is not using TLS");
    }
    if relay.timeout_secs == 0 {
        report.error("relay.timeoutSecs", "timeoutSecs must be > 0");
    }
}
