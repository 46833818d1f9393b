use thiserror::Error;

/// Top-level error type for the FaceGate service.
#[derive(Debug, Error)]
pub enum FaceGateError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("face analyzer error ({backend}): {message}")]
    Analyzer { backend: String, message: String },

    #[error("no face detected: {0}")]
    NoFaceDetected(String),

    #[error("relay error: {0}")]
    Relay(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FaceGateError {
    pub fn analyzer(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analyzer {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }
}
