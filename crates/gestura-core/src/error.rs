//! Error types for Gestura

use thiserror::Error;

/// Core Gestura errors
#[derive(Error, Debug)]
pub enum GesturaError {
    // Pose errors
    #[error("Invalid landmark count: expected {expected}, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },

    #[error("Non-finite coordinate at landmark {0}")]
    NonFiniteLandmark(usize),

    #[error("Unknown gesture: {0}")]
    UnknownGesture(String),

    #[error("Unknown handedness: {0}")]
    UnknownHandedness(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    // Collaborator errors
    #[error("Pose source failed: {0}")]
    Source(String),

    #[error("Speech output failed: {0}")]
    Speech(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GesturaError {
    /// Collaborator failures are recoverable; the session keeps running.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GesturaError::Source(_) | GesturaError::Speech(_))
    }
}

/// Result type for Gestura operations
pub type GesturaResult<T> = Result<T, GesturaError>;
