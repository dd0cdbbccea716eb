use rand::Rng;

use crate::error::QuizError;
use crate::models::{Question, QuizQuestion};
use crate::protocol::ProviderEnvelope;

/// In-place Fisher–Yates shuffle: walk from the last index down to 1 and swap
/// each slot with a uniformly chosen index in `0..=i`.
pub fn fisher_yates<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Build a quiz question from a provider question at batch position `id`.
pub fn to_quiz_question<R: Rng>(question: Question, id: usize, rng: &mut R) -> QuizQuestion {
    let mut choices = question.incorrect_answers.clone();
    choices.push(question.correct_answer.clone());
    fisher_yates(&mut choices, rng);

    QuizQuestion {
        question,
        id,
        choices,
    }
}

/// Validate a provider envelope and normalise its questions.
pub fn normalize_envelope<R: Rng>(
    envelope: ProviderEnvelope,
    rng: &mut R,
) -> Result<Vec<QuizQuestion>, QuizError> {
    if envelope.response_code != 0 {
        return Err(QuizError::UpstreamDataInvalid {
            code: envelope.response_code,
        });
    }

    Ok(envelope
        .results
        .into_iter()
        .enumerate()
        .map(|(id, question)| to_quiz_question(question, id, rng))
        .collect())
}
