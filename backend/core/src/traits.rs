use std::path::Path;

use async_trait::async_trait;

use crate::error::FaceGateError;
use crate::types::{ActionSet, AnalysisResult, VerifyResult};

/// A face analysis backend (a model server, a local command, a test double).
///
/// Images are handed over as paths to transient files owned by the caller.
#[async_trait]
pub trait FaceAnalyzer: Send + Sync {
    /// Backend name used in logs and error messages.
    fn name(&self) -> &str;

    /// Estimate the requested attributes for every face found in `image`.
    async fn analyze(
        &self,
        image: &Path,
        actions: &ActionSet,
        enforce_detection: bool,
    ) -> Result<AnalysisResult, FaceGateError>;

    /// Decide whether two images show the same person.
    async fn verify(
        &self,
        image_a: &Path,
        image_b: &Path,
        enforce_detection: bool,
    ) -> Result<VerifyResult, FaceGateError>;
}
