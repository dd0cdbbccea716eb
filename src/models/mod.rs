mod question;
mod result;

pub use question::{Difficulty, Question, QuizQuestion};
pub use result::{percentage, Grade, Outcome, QuizResult, ScoreCard};
