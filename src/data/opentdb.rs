use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use super::shuffle::normalize_envelope;
use super::QuestionSource;
use crate::config::ProviderConfig;
use crate::error::QuizError;
use crate::models::QuizQuestion;
use crate::protocol::ProviderEnvelope;

/// Fetches questions straight from the public trivia provider.
///
/// One GET per call, no retries.
#[derive(Debug, Clone)]
pub struct OpenTdbSource {
    client: reqwest::Client,
    base_url: String,
    amount: usize,
}

impl OpenTdbSource {
    pub fn new(config: &ProviderConfig) -> Result<Self, QuizError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            amount: config.amount,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl QuestionSource for OpenTdbSource {
    async fn fetch_questions(&self) -> Result<Vec<QuizQuestion>, QuizError> {
        debug!(url = %self.base_url, amount = self.amount, "requesting questions");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("amount", self.amount)])
            .send()
            .await
            .map_err(|e| {
                error!("question request failed: {}", e);
                QuizError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "question provider returned failure status");
            return Err(QuizError::UpstreamUnavailable(format!(
                "provider returned status {}",
                status
            )));
        }

        let envelope: ProviderEnvelope = response.json().await?;
        if envelope.response_code != 0 {
            error!(code = envelope.response_code, "question provider reported failure");
        }

        normalize_envelope(envelope, &mut rand::rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{provider_body, serve_fixture};
    use axum::http::StatusCode;

    fn source(base_url: String) -> OpenTdbSource {
        OpenTdbSource::new(&ProviderConfig {
            base_url,
            amount: 15,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetches_and_shuffles() {
        let base = serve_fixture("/api.php", StatusCode::OK, provider_body(0, 15)).await;
        let questions = source(format!("{}/api.php", base))
            .fetch_questions()
            .await
            .unwrap();

        assert_eq!(questions.len(), 15);
        for (index, question) in questions.iter().enumerate() {
            assert_eq!(question.id, index);
            assert_eq!(question.choices.len(), 4);
            assert!(question.choices.contains(&question.question.correct_answer));
        }
    }

    #[tokio::test]
    async fn test_provider_code_is_data_invalid() {
        let base = serve_fixture("/api.php", StatusCode::OK, provider_body(1, 0)).await;
        let err = source(format!("{}/api.php", base))
            .fetch_questions()
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::UpstreamDataInvalid { code: 1 }));
    }

    #[tokio::test]
    async fn test_failure_status_is_unavailable() {
        let base = serve_fixture(
            "/api.php",
            StatusCode::SERVICE_UNAVAILABLE,
            "down".to_string(),
        )
        .await;
        let err = source(format!("{}/api.php", base))
            .fetch_questions()
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_unavailable() {
        let err = source("http://127.0.0.1:9/api.php".to_string())
            .fetch_questions()
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }
}
