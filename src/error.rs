//! Error types shared across the quiz.

use std::io;

use thiserror::Error;

/// Top-level error type for quiz operations.
///
/// Every variant is recovered at the boundary where it is detected: upstream
/// failures become an inline message on the landing screen, missing session
/// data becomes a redirect to landing, and validation failures block the
/// landing form without touching the network.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The transport call failed or returned a non-success status.
    #[error("Question provider unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The provider answered but reported a logical failure.
    #[error("Question provider returned response code {code}")]
    UpstreamDataInvalid { code: i64 },

    /// Required scratch-store keys were absent when entering a screen.
    #[error("No active quiz session")]
    SessionDataMissing,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl QuizError {
    /// Whether the error originates from the question provider.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable(_) | Self::UpstreamDataInvalid { .. }
        )
    }
}

impl From<reqwest::Error> for QuizError {
    fn from(err: reqwest::Error) -> Self {
        Self::UpstreamUnavailable(err.to_string())
    }
}

/// Rejection reasons for the landing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your email address")]
    Empty,

    #[error("Please enter a valid email address")]
    Malformed,
}

/// Failures of a scratch-store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access session file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize session value: {0}")]
    Serialize(#[from] serde_json::Error),
}
