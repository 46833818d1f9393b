use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use facegate_core::{ActionSet, AnalysisResult, FaceAnalyzer, FaceGateError, VerifyResult};

/// What a [`MockAnalyzer`] does when called.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Faces(AnalysisResult),
    NoFace,
    Fail(String),
}

/// One recorded call, with whether the image file existed at call time.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub image: PathBuf,
    pub image_existed: bool,
    pub actions: Option<ActionSet>,
    pub enforce_detection: bool,
}

/// An analyzer that returns canned results and records its calls.
pub struct MockAnalyzer {
    behavior: MockBehavior,
    verified: bool,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockAnalyzer {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            verified: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Convenience: one face whose dominant emotion is `label`.
    pub fn with_emotion(label: &str) -> Self {
        let mut face = serde_json::Map::new();
        face.insert("dominant_emotion".into(), label.into());
        face.insert(
            "region".into(),
            serde_json::json!({"x": 0, "y": 0, "w": 64, "h": 64}),
        );
        Self::new(MockBehavior::Faces(AnalysisResult(vec![face])))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fail(message.into()))
    }

    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, image: &Path, actions: Option<&ActionSet>, enforce_detection: bool) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                image: image.to_path_buf(),
                image_existed: image.exists(),
                actions: actions.cloned(),
                enforce_detection,
            });
        }
    }

    fn outcome(&self) -> Result<AnalysisResult, FaceGateError> {
        match &self.behavior {
            MockBehavior::Faces(result) => Ok(result.clone()),
            MockBehavior::NoFace => Err(FaceGateError::NoFaceDetected(
                "Face could not be detected".into(),
            )),
            MockBehavior::Fail(message) => Err(FaceGateError::analyzer("mock", message.clone())),
        }
    }
}

#[async_trait]
impl FaceAnalyzer for MockAnalyzer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(
        &self,
        image: &Path,
        actions: &ActionSet,
        enforce_detection: bool,
    ) -> Result<AnalysisResult, FaceGateError> {
        self.record(image, Some(actions), enforce_detection);
        self.outcome()
    }

    async fn verify(
        &self,
        image_a: &Path,
        image_b: &Path,
        enforce_detection: bool,
    ) -> Result<VerifyResult, FaceGateError> {
        self.record(image_a, None, enforce_detection);
        self.record(image_b, None, enforce_detection);
        self.outcome()?;
        let mut map = serde_json::Map::new();
        map.insert("verified".into(), self.verified.into());
        Ok(VerifyResult(map))
    }
}
