pub mod error;
pub mod traits;
pub mod types;

pub use error::FaceGateError;
pub use traits::FaceAnalyzer;
pub use types::{Action, ActionSet, AnalysisResult, FaceAttributes, VerifyResult};
