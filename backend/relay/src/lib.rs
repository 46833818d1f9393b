//! Emotion prompt relay.
//!
//! Maps the dominant emotion of an analysis to a canned prompt and forwards it
//! to an external webhook, fire-and-forget.

pub mod emotion;
pub mod webhook;

pub use emotion::{Emotion, dominant_emotion, prompt_for};
pub use webhook::WebhookRelay;
