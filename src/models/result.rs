use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::decoded_eq;
use crate::models::QuizQuestion;

/// Frozen outcome of a submitted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub email: String,
    pub questions: Vec<QuizQuestion>,
    pub user_answers: BTreeMap<usize, String>,
}

/// How a single question was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    Unanswered,
}

/// Score summary of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCard {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
}

/// Coarse grade tier shown on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Excellent,
    Fair,
    Poor,
}

impl Grade {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            70.. => Grade::Excellent,
            40..=69 => Grade::Fair,
            _ => Grade::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent",
            Grade::Fair => "Fair",
            Grade::Poor => "Poor",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent work!",
            Grade::Fair => "Good effort!",
            Grade::Poor => "Keep practicing!",
        }
    }
}

impl QuizResult {
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Classify the question at `index`.
    pub fn outcome(&self, index: usize) -> Outcome {
        let Some(question) = self.questions.get(index) else {
            return Outcome::Unanswered;
        };

        match self.user_answers.get(&index) {
            None => Outcome::Unanswered,
            Some(answer) if decoded_eq(answer, question.correct_answer()) => Outcome::Correct,
            Some(_) => Outcome::Incorrect,
        }
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        (0..self.questions.len()).map(|i| self.outcome(i)).collect()
    }

    pub fn score(&self) -> usize {
        self.outcomes()
            .into_iter()
            .filter(|outcome| *outcome == Outcome::Correct)
            .count()
    }

    pub fn score_card(&self) -> ScoreCard {
        let score = self.score();
        let total = self.total_questions();
        ScoreCard {
            score,
            total,
            percentage: percentage(score, total),
        }
    }
}

/// `round(100 * score / total)`, rounding halves up. Zero when `total` is zero.
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * score + total) / (2 * total)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, Question};

    fn question(id: usize, correct: &str) -> QuizQuestion {
        QuizQuestion {
            question: Question {
                category: "General Knowledge".to_string(),
                kind: "multiple".to_string(),
                difficulty: Difficulty::Easy,
                question: format!("Question {}", id),
                correct_answer: correct.to_string(),
                incorrect_answers: vec!["X".to_string(), "Y".to_string()],
            },
            id,
            choices: vec![correct.to_string(), "X".to_string(), "Y".to_string()],
        }
    }

    fn result(correct: &[&str], answers: &[(usize, &str)]) -> QuizResult {
        QuizResult {
            email: "a@b.com".to_string(),
            questions: correct
                .iter()
                .enumerate()
                .map(|(i, c)| question(i, c))
                .collect(),
            user_answers: answers
                .iter()
                .map(|(i, a)| (*i, a.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_score_and_percentage() {
        let result = result(&["A", "B"], &[(0, "A"), (1, "C")]);
        let card = result.score_card();
        assert_eq!(card.score, 1);
        assert_eq!(card.total, 2);
        assert_eq!(card.percentage, 50);
        assert_eq!(result.outcomes(), vec![Outcome::Correct, Outcome::Incorrect]);
    }

    #[test]
    fn test_unanswered_questions() {
        let result = result(&["A", "B"], &[]);
        assert_eq!(
            result.outcomes(),
            vec![Outcome::Unanswered, Outcome::Unanswered]
        );
        assert_eq!(result.score_card().score, 0);
        assert_eq!(result.score_card().percentage, 0);
    }

    #[test]
    fn test_comparison_ignores_entity_encoding() {
        let result = result(&["Don&#039;t Panic"], &[(0, "Don't Panic")]);
        assert_eq!(result.outcome(0), Outcome::Correct);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(percentage(15, 15), 100);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_grade_tiers() {
        assert_eq!(Grade::from_percentage(100), Grade::Excellent);
        assert_eq!(Grade::from_percentage(70), Grade::Excellent);
        assert_eq!(Grade::from_percentage(69), Grade::Fair);
        assert_eq!(Grade::from_percentage(40), Grade::Fair);
        assert_eq!(Grade::from_percentage(39), Grade::Poor);
    }

    #[test]
    fn test_result_uses_camel_case_keys() {
        let result = result(&["A"], &[(0, "A")]);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"userAnswers\":{\"0\":\"A\"}"));
        let back: QuizResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
