use std::fmt;

use serde::{Deserialize, Serialize};

/// Difficulty tier reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A question exactly as the provider sends it. Text fields are HTML-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// A provider question with its batch position and shuffled choices.
///
/// `choices` is a permutation of `incorrect_answers` plus `correct_answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(flatten)]
    pub question: Question,
    pub id: usize,
    pub choices: Vec<String>,
}

impl QuizQuestion {
    pub fn correct_answer(&self) -> &str {
        &self.question.correct_answer
    }

    pub fn category(&self) -> &str {
        &self.question.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.question.difficulty
    }

    pub fn text(&self) -> &str {
        &self.question.question
    }
}
