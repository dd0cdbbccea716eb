use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::data::QuestionSource;
use crate::error::QuizError;
use crate::protocol::{QuizEnvelope, FETCH_FAILED_MESSAGE, QUIZ_PATH};

type SharedSource = Arc<dyn QuestionSource>;

pub fn create_router(source: SharedSource) -> Router {
    Router::new()
        .route(QUIZ_PATH, get(get_quiz))
        .route("/health", get(health))
        .with_state(source)
}

/// Any failure is reported with one generic message; details only go to the log.
struct FetchError(QuizError);

impl From<QuizError> for FetchError {
    fn from(err: QuizError) -> Self {
        Self(err)
    }
}

impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        error!("Error fetching quiz questions: {}", self.0);
        let body = QuizEnvelope::Error {
            error: FETCH_FAILED_MESSAGE.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

async fn get_quiz(State(source): State<SharedSource>) -> Result<Response, FetchError> {
    let questions = source.fetch_questions().await?;
    info!("Serving {} questions", questions.len());
    Ok(Json(QuizEnvelope::Questions { questions }).into_response())
}

async fn health() -> &'static str {
    "ok"
}
