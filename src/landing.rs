//! Landing form: email validation and quiz start.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{error, info};

use crate::data::QuestionSource;
use crate::error::{QuizError, ValidationError};
use crate::session::{begin_session, Clock};
use crate::store::ScratchStore;

/// Message shown on the landing form for any fetch failure.
pub const START_FAILED_MESSAGE: &str = "Failed to start quiz. Please try again.";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Check the landing email. Whitespace-only input counts as empty.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::Malformed);
    }
    Ok(())
}

/// Validate, fetch a question batch and record a new session.
///
/// Validation failures never touch the network. An empty batch counts as
/// an upstream failure and leaves the store untouched.
pub async fn start_quiz(
    store: &(impl ScratchStore + ?Sized),
    source: &dyn QuestionSource,
    email: &str,
    clock: &Clock,
) -> Result<usize, QuizError> {
    validate_email(email)?;

    let questions = source.fetch_questions().await.map_err(|e| {
        error!("Error starting quiz: {}", e);
        e
    })?;
    if questions.is_empty() {
        error!("Error starting quiz: provider returned no questions");
        return Err(QuizError::UpstreamUnavailable(
            "provider returned no questions".to_string(),
        ));
    }

    begin_session(store, email, &questions, clock)?;
    info!(email, "landing complete");
    Ok(questions.len())
}
