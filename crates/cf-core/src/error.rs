//! Error types for commentflow

use crate::lifecycle::Operation;
use thiserror::Error;

/// Main error type for commentflow
#[derive(Debug, Error)]
pub enum CommentFlowError {
    /// Transport failure or non-success response from the backend
    #[error("Network error during {operation}: {message}")]
    Network { operation: String, message: String },

    /// Validation error (empty draft, malformed tone, out-of-range setting)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The comment matched the spam blacklist; no request was sent
    #[error("Comment {0} is blocked by the spam filter")]
    BlockedBySpamFilter(String),

    /// Another operation is already in flight for this comment
    #[error("Comment {comment_id} is busy: {in_flight} already in progress")]
    ConcurrentOperationRejected {
        comment_id: String,
        in_flight: Operation,
    },

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    /// Reply not found
    #[error("Reply not found: {0}")]
    ReplyNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CommentFlowError>,
    },
}

impl CommentFlowError {
    /// Build a network error for the named operation
    pub fn network(operation: impl Into<String>, message: impl Into<String>) -> Self {
        CommentFlowError::Network {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CommentFlowError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for commentflow
pub type Result<T> = std::result::Result<T, CommentFlowError>;
