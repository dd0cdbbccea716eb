//! Wire formats for question fetching.
//!
//! `ProviderEnvelope` is what the public trivia provider returns;
//! `QuizEnvelope` is what the internal `/api/quiz` endpoint serves.

use serde::{Deserialize, Serialize};

use crate::models::{Question, QuizQuestion};

/// Response of the trivia provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEnvelope {
    /// 0 means success; anything else is a provider-reported failure.
    pub response_code: i64,
    #[serde(default)]
    pub results: Vec<Question>,
}

/// Response of the internal fetch endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuizEnvelope {
    Questions { questions: Vec<QuizQuestion> },
    Error { error: String },
}

/// Message served when the endpoint cannot produce questions.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch quiz questions";

/// Default address of the internal endpoint server.
pub const DEFAULT_BIND: &str = "127.0.0.1:8712";

/// Path of the internal fetch endpoint.
pub const QUIZ_PATH: &str = "/api/quiz";
