//! Webhook error types.

use thiserror::Error;

/// Result type for webhook operations.
pub type WebhookResult<T> = Result<T, WebhookError>;

/// Error returned by application handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for webhook request processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Request body was not a well-formed event.
    #[error("Invalid event payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Declared signature did not match the expected digest.
    #[error("Signature mismatch")]
    Verification,

    /// The application handler failed.
    #[error("Handler failed: {0}")]
    Handler(#[source] HandlerError),

    /// Invalid receiver configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}
