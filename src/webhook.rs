//! Voice-assistant fulfillment boundary.
//!
//! The only caller of the orchestrator: translates fulfillment JSON into a
//! release request and every pipeline outcome into a spoken response.

/// Intent handling and dialogue branching.
pub mod handler;

/// Fulfillment request/response wire types.
pub mod types;

pub use handler::IntentHandler;
pub use types::{WebhookRequest, WebhookResponse};
