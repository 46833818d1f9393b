use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// An attribute the face analyzer can be asked to estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Emotion,
    Age,
    Gender,
    Race,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Emotion, Action::Age, Action::Gender, Action::Race];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Emotion => "emotion",
            Action::Age => "age",
            Action::Gender => "gender",
            Action::Race => "race",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emotion" => Ok(Action::Emotion),
            "age" => Ok(Action::Age),
            "gender" => Ok(Action::Gender),
            "race" => Ok(Action::Race),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// Ordered, de-duplicated, never-empty set of requested actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionSet(Vec<Action>);

impl ActionSet {
    /// Parse a comma-separated action list as sent by the upload form.
    ///
    /// Unknown names are dropped. An empty result falls back to `{emotion}`.
    pub fn parse(raw: &str) -> Self {
        let mut actions = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.parse::<Action>() {
                Ok(action) if !actions.contains(&action) => actions.push(action),
                Ok(_) => {}
                Err(e) => warn!(action = %part, "Ignoring requested action: {}", e),
            }
        }
        Self::from_actions(actions)
    }

    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        let mut deduped: Vec<Action> = Vec::new();
        for action in actions {
            if !deduped.contains(&action) {
                deduped.push(action);
            }
        }
        if deduped.is_empty() {
            deduped.push(Action::Emotion);
        }
        Self(deduped)
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0.contains(&action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.0
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(Action::as_str).collect()
    }
}

impl Default for ActionSet {
    fn default() -> Self {
        Self(vec![Action::Emotion])
    }
}

impl fmt::Display for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(","))
    }
}

/// Attributes reported for one detected face. Opaque to FaceGate.
pub type FaceAttributes = serde_json::Map<String, serde_json::Value>;

/// Per-face results exactly as the analyzer produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(pub Vec<FaceAttributes>);

impl AnalysisResult {
    pub fn faces(&self) -> &[FaceAttributes] {
        &self.0
    }

    pub fn first(&self) -> Option<&FaceAttributes> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Output of a face verification call; carries at least `verified`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerifyResult(pub serde_json::Map<String, serde_json::Value>);

impl VerifyResult {
    pub fn verified(&self) -> Option<bool> {
        self.0.get("verified").and_then(|v| v.as_bool())
    }
}
