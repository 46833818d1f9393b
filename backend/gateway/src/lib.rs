//! FaceGate HTTP gateway.
//!
//! Routes uploads to the face analyzer, serves the frontend, and relays the
//! detected emotion when a webhook is configured.

pub mod analyze;
pub mod control_ui;
pub mod detect;
pub mod error;
pub mod health_api;
pub mod server;
pub mod upload;
pub mod verify;

pub use error::ApiError;
pub use server::{GatewayState, build_router, start_server};

#[cfg(test)]
pub(crate) mod test_support;
