//! Face analysis backends.
//!
//! The models themselves live outside this project; these types only speak to
//! them. Pick one with [`build_analyzer`].

pub mod command;
pub mod http;
pub mod mock;

use std::sync::Arc;

use facegate_config::{AnalyzerBackend, AnalyzerConfig};
use facegate_core::{AnalysisResult, FaceAnalyzer, FaceGateError};
use serde_json::Value;

pub use command::CommandAnalyzer;
pub use http::HttpAnalyzer;
pub use mock::MockAnalyzer;

/// Marker DeepFace puts in its error when enforcement is on and no face is found.
const NO_FACE_MARKER: &str = "face could not be detected";

/// Build the analyzer selected by the config.
pub fn build_analyzer(config: &AnalyzerConfig) -> Result<Arc<dyn FaceAnalyzer>, FaceGateError> {
    Ok(match config.backend {
        AnalyzerBackend::Http => Arc::new(HttpAnalyzer::from_config(config)?),
        AnalyzerBackend::Command => Arc::new(CommandAnalyzer::from_config(config)?),
    })
}

/// Turn a backend failure message into the matching error variant.
pub(crate) fn classify_failure(backend: &str, message: impl Into<String>) -> FaceGateError {
    let message = message.into();
    if message.to_ascii_lowercase().contains(NO_FACE_MARKER) {
        FaceGateError::NoFaceDetected(message)
    } else {
        FaceGateError::analyzer(backend, message)
    }
}

/// Accept `{"results": [...]}`, a bare array, or a single face object.
pub(crate) fn parse_analysis(backend: &str, value: Value) -> Result<AnalysisResult, FaceGateError> {
    let faces = match value {
        Value::Object(mut map) if map.contains_key("results") => {
            map.remove("results").unwrap_or(Value::Null)
        }
        other => other,
    };
    let faces = match faces {
        Value::Object(face) => Value::Array(vec![Value::Object(face)]),
        other => other,
    };
    serde_json::from_value(faces).map_err(|e| {
        FaceGateError::analyzer(backend, format!("unexpected analysis payload: {e}"))
    })
}

/// Pull a human-readable message out of an error body.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["exception", "error", "message", "detail"] {
            if let Some(msg) = map.get(key).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_wrapped_results() {
        let result = parse_analysis("t", json!({"results": [{"age": 31}, {"age": 45}]})).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.faces()[1]["age"], 45);
    }

    #[test]
    fn parses_bare_array_and_single_object() {
        assert_eq!(parse_analysis("t", json!([{"age": 31}])).unwrap().len(), 1);
        assert_eq!(parse_analysis("t", json!({"age": 31})).unwrap().len(), 1);
        assert!(parse_analysis("t", json!({"results": []})).unwrap().is_empty());
    }

    #[test]
    fn rejects_scalar_payload() {
        let err = parse_analysis("t", json!("nope")).unwrap_err();
        assert!(matches!(err, FaceGateError::Analyzer { .. }));
    }

    #[test]
    fn classifies_no_face() {
        let err = classify_failure(
            "t",
            "Face could not be detected in numpy array. Please confirm that the picture is a face photo",
        );
        assert!(matches!(err, FaceGateError::NoFaceDetected(_)));
        assert!(matches!(classify_failure("t", "boom"), FaceGateError::Analyzer { .. }));
    }

    #[test]
    fn extracts_error_messages() {
        assert_eq!(error_message(r#"{"exception": "bad image"}"#), "bad image");
        assert_eq!(error_message(r#"{"error": "x"}"#), "x");
        assert_eq!(error_message("  plain text \n"), "plain text");
    }

    #[test]
    fn builds_configured_backend() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(build_analyzer(&cfg).unwrap().name(), "deepface-http");

        let cfg = AnalyzerConfig {
            backend: AnalyzerBackend::Command,
            program: Some("analyze-face".into()),
            ..Default::default()
        };
        assert_eq!(build_analyzer(&cfg).unwrap().name(), "command");
    }
}
