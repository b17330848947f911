//! Chat model abstraction
//!
//! The chat view only needs one capability from a model: turn the latest user
//! message into a reply. Conversation history is deliberately not part of the
//! contract; every call is a single turn.

use async_trait::async_trait;

/// Failures talking to the generative-language endpoint.
///
/// The chat view collapses all of them into one generic notification; the
/// variants exist for logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Network(String),

    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    MalformedResponse(String),

    #[error("Response contained no candidate text")]
    EmptyResponse,
}

/// The request URL is dropped so nothing that rode along in it reaches a log line.
impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Network(e.without_url().to_string())
    }
}

/// Single-turn text generation.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a reply to `prompt` with no prior context.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}
