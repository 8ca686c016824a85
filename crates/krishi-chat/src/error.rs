//! Error types for the chat engine.

use krishi_model::ModelError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat is disabled")]
    Disabled,
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
    #[error("session state error: {0}")]
    State(String),
    #[error("model error: {0}")]
    Model(String),
}

impl From<ModelError> for ChatError {
    fn from(err: ModelError) -> Self {
        ChatError::Model(err.to_string())
    }
}
