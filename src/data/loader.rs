use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use super::shuffle::normalize_envelope;
use super::QuestionSource;
use crate::error::QuizError;
use crate::models::QuizQuestion;
use crate::protocol::ProviderEnvelope;

/// Offline source reading a provider envelope from a JSON file.
///
/// The file is re-read and reshuffled on every fetch, exactly as if the
/// provider had been asked again.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// Load and normalise a provider envelope from `path`.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<QuizQuestion>, QuizError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|err| {
        QuizError::UpstreamUnavailable(format!("Failed to read {}: {}", path.display(), err))
    })?;

    let envelope: ProviderEnvelope = serde_json::from_str(&json_content).map_err(|err| {
        QuizError::UpstreamUnavailable(format!("Failed to parse {}: {}", path.display(), err))
    })?;

    let questions = normalize_envelope(envelope, &mut rand::rng())?;
    if questions.is_empty() {
        return Err(QuizError::UpstreamUnavailable(format!(
            "{} must contain at least one question",
            path.display()
        )));
    }

    info!(count = questions.len(), path = %path.display(), "loaded questions from file");
    Ok(questions)
}

#[async_trait]
impl QuestionSource for FileSource {
    async fn fetch_questions(&self) -> Result<Vec<QuizQuestion>, QuizError> {
        load_questions_from_json(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::provider_body;

    #[tokio::test]
    async fn test_file_source_reads_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        fs::write(&path, provider_body(0, 3)).unwrap();

        let questions = FileSource::new(&path).fetch_questions().await.unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[2].id, 2);
    }

    #[test]
    fn test_provider_failure_code_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        fs::write(&path, provider_body(4, 0)).unwrap();

        let err = load_questions_from_json(&path).unwrap_err();
        assert!(matches!(err, QuizError::UpstreamDataInvalid { code: 4 }));
    }

    #[test]
    fn test_missing_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_questions_from_json(dir.path().join("absent.json")).is_err());

        let path = dir.path().join("empty.json");
        fs::write(&path, provider_body(0, 0)).unwrap();
        assert!(matches!(
            load_questions_from_json(&path),
            Err(QuizError::UpstreamUnavailable(_))
        ));
    }
}
