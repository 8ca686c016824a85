//! Error types for model loading and inference.

use krishi_core::error::KrishiError;
use thiserror::Error;

/// Errors from the model collaborators.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact not found: {path}")]
    ArtifactNotFound { path: String },

    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("unknown label: '{label}'")]
    UnknownLabel { label: String },

    #[error("feature vector has {got} values, expected {expected}")]
    FeatureShape { expected: usize, got: usize },

    #[error("prediction failed: {0}")]
    Prediction(String),
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::InvalidArtifact(err.to_string())
    }
}

impl From<ModelError> for KrishiError {
    fn from(err: ModelError) -> Self {
        KrishiError::Model(err.to_string())
    }
}
