//! Fulfillment request and response types for the voice platform.
//!
//! The upstream payload is loosely shaped; every field that can be absent on
//! the wire is optional or defaulted here, so the rest of the crate never
//! deals with missing data.
use serde::{Deserialize, Serialize};

/// Incoming fulfillment request from the voice platform.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookRequest {
    pub response_id: String,
    pub query_result: QueryResult,
    pub original_detect_intent_request: DetectIntentRequest,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryResult {
    pub parameters: Parameters,
    pub intent: Intent,
}

/// Slot values extracted by the voice platform. Keys match the agent's
/// parameter names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Parameters {
    #[serde(rename = "Repository")]
    pub repository: String,
    #[serde(rename = "Version")]
    pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Intent {
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectIntentRequest {
    pub payload: Payload,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Payload {
    pub user: User,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// Absent when the platform did not identify the caller; treated as
    /// unauthorized.
    pub user_id: Option<String>,
}

impl WebhookRequest {
    pub fn intent_name(&self) -> &str {
        &self.query_result.intent.display_name
    }

    pub fn user_id(&self) -> Option<&str> {
        self.original_detect_intent_request
            .payload
            .user
            .user_id
            .as_deref()
    }

    pub fn repository(&self) -> &str {
        &self.query_result.parameters.repository
    }

    pub fn version(&self) -> &str {
        &self.query_result.parameters.version
    }
}

/// Spoken response returned to the voice platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
    /// False ends the conversation; true keeps it open for a re-ask.
    pub expect_user_response: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl WebhookResponse {
    /// Terminal response: speak and end the conversation.
    pub fn close(text: impl Into<String>) -> Self {
        Self {
            fulfillment_text: text.into(),
            expect_user_response: false,
            suggestions: vec![],
        }
    }

    /// Keep the conversation open, offering suggestion chips for the retry.
    pub fn ask(text: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            fulfillment_text: text.into(),
            expect_user_response: true,
            suggestions,
        }
    }
}
