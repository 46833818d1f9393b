//! Emotion labels and the prompt table.

use std::fmt;

use facegate_config::PromptLanguage;
use facegate_core::AnalysisResult;
use tracing::warn;

/// Emotion labels reported by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
    /// Any label outside the classifier's usual set, lowercased.
    Other(String),
}

impl Emotion {
    /// Case-insensitive: `"Happy"` and `" happy "` both map to [`Emotion::Happy`].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        match label.as_str() {
            "angry" => Emotion::Angry,
            "disgust" => Emotion::Disgust,
            "fear" => Emotion::Fear,
            "happy" => Emotion::Happy,
            "sad" => Emotion::Sad,
            "surprise" => Emotion::Surprise,
            "neutral" => Emotion::Neutral,
            _ => Emotion::Other(label),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Emotion::Angry => "angry",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
            Emotion::Other(label) => label,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The prompt forwarded to the webhook for `emotion`.
pub fn prompt_for(emotion: &Emotion, language: PromptLanguage) -> String {
    use PromptLanguage::{En, Es};

    match (emotion, language) {
        (Emotion::Happy, Es) => {
            "He detectado un usuario que parece estar feliz. Salúdalo con entusiasmo.".to_string()
        }
        (Emotion::Happy, En) => {
            "I have detected a user who seems to be happy. Greet them enthusiastically.".to_string()
        }
        (Emotion::Sad, Es) => {
            "He detectado un usuario que parece estar triste. Salúdalo con empatía y ofrécele ánimo."
                .to_string()
        }
        (Emotion::Sad, En) => {
            "I have detected a user who seems to be sad. Greet them with empathy and offer some encouragement."
                .to_string()
        }
        (Emotion::Neutral, Es) => {
            "He detectado un usuario con expresión neutral. Inicia una conversación amable y abierta."
                .to_string()
        }
        (Emotion::Neutral, En) => {
            "I have detected a user with a neutral expression. Start a friendly, open conversation."
                .to_string()
        }
        (
            Emotion::Angry
            | Emotion::Disgust
            | Emotion::Fear
            | Emotion::Surprise
            | Emotion::Other(_),
            Es,
        ) => format!(
            "He detectado un usuario (emoción: {}). Inicia una conversación.",
            emotion.label()
        ),
        (
            Emotion::Angry
            | Emotion::Disgust
            | Emotion::Fear
            | Emotion::Surprise
            | Emotion::Other(_),
            En,
        ) => format!(
            "I have detected a user (emotion: {}). Start a conversation.",
            emotion.label()
        ),
    }
}

/// Dominant emotion of the first detected face, if the analyzer reported one.
pub fn dominant_emotion(result: &AnalysisResult) -> Option<Emotion> {
    let Some(face) = result.first() else {
        warn!("Analyzer returned no faces; nothing to relay");
        return None;
    };
    match face.get("dominant_emotion").and_then(|v| v.as_str()) {
        Some(label) => Some(Emotion::from_label(label)),
        None => {
            warn!("No 'dominant_emotion' in analyzer result");
            None
        }
    }
}
