//! Internal question endpoint.
//!
//! Serves freshly shuffled question batches over HTTP so the player can be
//! pointed at `--endpoint` instead of talking to the provider directly.

mod routes;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::data::QuestionSource;
use crate::error::QuizError;

pub use routes::create_router;

/// Bind `addr` and serve until the task is cancelled or ctrl-c arrives.
pub async fn run(addr: &str, source: Arc<dyn QuestionSource>) -> Result<(), QuizError> {
    let listener = TcpListener::bind(addr).await?;
    info!("Question endpoint listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(source))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
