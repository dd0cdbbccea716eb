use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use super::QuestionSource;
use crate::error::QuizError;
use crate::models::QuizQuestion;
use crate::protocol::QuizEnvelope;

/// Fetches already-shuffled questions from an internal `/api/quiz` endpoint.
#[derive(Debug, Clone)]
pub struct EndpointSource {
    client: reqwest::Client,
    url: String,
}

impl EndpointSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, QuizError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl QuestionSource for EndpointSource {
    async fn fetch_questions(&self) -> Result<Vec<QuizQuestion>, QuizError> {
        debug!(url = %self.url, "requesting questions from endpoint");

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        let envelope: Option<QuizEnvelope> = response.json().await.ok();

        match (status.is_success(), envelope) {
            (true, Some(QuizEnvelope::Questions { questions })) => Ok(questions),
            (_, Some(QuizEnvelope::Error { error })) => {
                error!(%status, "quiz endpoint failed: {}", error);
                Err(QuizError::UpstreamUnavailable(error))
            }
            (_, _) => {
                error!(%status, "quiz endpoint returned an unexpected response");
                Err(QuizError::UpstreamUnavailable(format!(
                    "endpoint returned status {}",
                    status
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::serve_fixture;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_reads_questions_envelope() {
        let body = r#"{"questions":[{
            "category": "Art",
            "type": "boolean",
            "difficulty": "easy",
            "question": "Is this art?",
            "correct_answer": "True",
            "incorrect_answers": ["False"],
            "id": 0,
            "choices": ["False", "True"]
        }]}"#;
        let base = serve_fixture("/api/quiz", StatusCode::OK, body.to_string()).await;

        let source =
            EndpointSource::new(format!("{}/api/quiz", base), Duration::from_secs(5)).unwrap();
        let questions = source.fetch_questions().await.unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].choices, vec!["False", "True"]);
    }

    #[tokio::test]
    async fn test_error_envelope_carries_message() {
        let body = r#"{"error":"Failed to fetch quiz questions"}"#;
        let base = serve_fixture(
            "/api/quiz",
            StatusCode::INTERNAL_SERVER_ERROR,
            body.to_string(),
        )
        .await;

        let source =
            EndpointSource::new(format!("{}/api/quiz", base), Duration::from_secs(5)).unwrap();
        let err = source.fetch_questions().await.unwrap_err();

        match err {
            QuizError::UpstreamUnavailable(message) => {
                assert_eq!(message, "Failed to fetch quiz questions")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
