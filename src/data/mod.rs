//! Question sources.

mod endpoint;
mod loader;
mod opentdb;
mod shuffle;

use async_trait::async_trait;

use crate::error::QuizError;
use crate::models::QuizQuestion;

pub use endpoint::EndpointSource;
pub use loader::{load_questions_from_json, FileSource};
pub use opentdb::OpenTdbSource;
pub use shuffle::{fisher_yates, normalize_envelope, to_quiz_question};

/// Something that can produce a fresh batch of quiz questions.
///
/// Implementations make a single attempt; failures surface immediately.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_questions(&self) -> Result<Vec<QuizQuestion>, QuizError>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tokio::net::TcpListener;

    /// Serve `body` with `status` at `path` on an ephemeral port. Returns the base URL.
    pub async fn serve_fixture(path: &str, status: StatusCode, body: String) -> String {
        let app = Router::new().route(
            path,
            get(move || {
                let body = body.clone();
                async move { (status, [("content-type", "application/json")], body) }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    /// A provider envelope with `count` four-choice questions.
    pub fn provider_body(response_code: i64, count: usize) -> String {
        let results: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "category": "Entertainment: Video Games",
                    "type": "multiple",
                    "difficulty": "medium",
                    "question": format!("Question &quot;{}&quot;?", i),
                    "correct_answer": format!("Right {}", i),
                    "incorrect_answers": [
                        format!("Wrong {}a", i),
                        format!("Wrong {}b", i),
                        format!("Wrong {}c", i)
                    ]
                })
            })
            .collect();

        serde_json::json!({ "response_code": response_code, "results": results }).to_string()
    }
}
