//! Quiz session lifecycle: landing → in progress → submitted.

mod clock;
mod machine;
mod timer;

pub use clock::Clock;
pub use machine::{begin_session, QuestionStatus, QuizSession, Route, SessionState, Tick};
pub use timer::Countdown;

/// Format a duration as `MM:SS`.
pub fn format_time(remaining: std::time::Duration) -> String {
    let total_seconds = remaining.as_secs();
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
