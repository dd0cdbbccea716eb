use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use tracing::{debug, info};

use super::clock::Clock;
use crate::error::StoreError;
use crate::models::{QuizQuestion, QuizResult};
use crate::store::{keys, read_json, write_json, ScratchStore};

/// Where a screen sends the user when it cannot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Quiz,
    Results,
}

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Active,
    Submitted,
    Redirect(Route),
}

/// Navigation-panel status of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    Current,
    Answered,
    Visited,
    NotVisited,
}

/// Result of a timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Still running with this much time left.
    Running(Duration),
    /// Time ran out on this tick and the session was submitted.
    Expired(QuizResult),
    /// The session is not active.
    Idle,
}

/// The in-progress quiz: navigation, answers, countdown and submission.
///
/// Every change to the answers, the visited set or the current index is
/// written straight through to the scratch store. Remaining time is never
/// stored; it is always derived from the absolute start timestamp.
pub struct QuizSession<S: ScratchStore> {
    store: S,
    clock: Clock,
    duration: Duration,
    state: SessionState,
    email: String,
    questions: Vec<QuizQuestion>,
    current_index: usize,
    answers: BTreeMap<usize, String>,
    visited: BTreeSet<usize>,
    start_time_ms: i64,
}

/// Record a freshly fetched quiz in the store, starting its clock now.
pub fn begin_session(
    store: &(impl ScratchStore + ?Sized),
    email: &str,
    questions: &[QuizQuestion],
    clock: &Clock,
) -> Result<(), StoreError> {
    store.clear_keys(keys::ALL)?;
    store.set(keys::EMAIL, email.to_string())?;
    write_json(store, keys::QUESTIONS, questions)?;
    write_json(store, keys::START_TIME, &clock.now_ms())?;
    info!(email, questions = questions.len(), "quiz session started");
    Ok(())
}

impl<S: ScratchStore> QuizSession<S> {
    pub fn new(store: S, clock: Clock, duration: Duration) -> Self {
        Self {
            store,
            clock,
            duration,
            state: SessionState::Uninitialized,
            email: String::new(),
            questions: Vec::new(),
            current_index: 0,
            answers: BTreeMap::new(),
            visited: BTreeSet::from([0]),
            start_time_ms: 0,
        }
    }

    /// Rehydrate from the store.
    ///
    /// Missing or unreadable questions or start time redirect to landing.
    /// Interaction state that is absent or out of range falls back to a
    /// fresh start at question one.
    pub fn load(&mut self) -> SessionState {
        self.state = SessionState::Loading;

        let questions: Option<Vec<QuizQuestion>> = read_json(&self.store, keys::QUESTIONS);
        let start_time: Option<i64> = read_json(&self.store, keys::START_TIME);

        let (Some(questions), Some(start_time_ms)) = (questions, start_time) else {
            debug!("no active session in store");
            self.state = SessionState::Redirect(Route::Landing);
            return self.state;
        };
        if questions.is_empty() {
            self.state = SessionState::Redirect(Route::Landing);
            return self.state;
        }

        let len = questions.len();
        self.email = self.store.get(keys::EMAIL).unwrap_or_default();
        self.questions = questions;
        self.start_time_ms = start_time_ms;

        self.answers = read_json::<BTreeMap<usize, String>>(&self.store, keys::ANSWERS)
            .unwrap_or_default()
            .into_iter()
            .filter(|(index, _)| *index < len)
            .collect();

        self.current_index = read_json::<usize>(&self.store, keys::CURRENT_INDEX)
            .filter(|index| *index < len)
            .unwrap_or(0);

        self.visited = read_json::<Vec<usize>>(&self.store, keys::VISITED)
            .unwrap_or_default()
            .into_iter()
            .filter(|index| *index < len)
            .collect();
        self.visited.insert(0);
        self.visited.insert(self.current_index);
        self.visited.extend(self.answers.keys().copied());

        self.state = SessionState::Active;
        info!(
            current = self.current_index,
            answered = self.answers.len(),
            remaining_secs = self.time_remaining().as_secs(),
            "quiz session resumed"
        );
        self.state
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_index)
    }

    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn visited(&self) -> &BTreeSet<usize> {
        &self.visited
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    pub fn question_status(&self, index: usize) -> QuestionStatus {
        if index == self.current_index {
            QuestionStatus::Current
        } else if self.answers.contains_key(&index) {
            QuestionStatus::Answered
        } else if self.visited.contains(&index) {
            QuestionStatus::Visited
        } else {
            QuestionStatus::NotVisited
        }
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// Budget minus wall-clock time since start, clamped at zero.
    pub fn time_remaining(&self) -> Duration {
        let elapsed_ms = self.clock.now_ms().saturating_sub(self.start_time_ms).max(0) as u64;
        self.duration.saturating_sub(Duration::from_millis(elapsed_ms))
    }

    pub fn is_expired(&self) -> bool {
        self.time_remaining().is_zero()
    }

    /// Jump to `index`. Callers must pass a valid index.
    pub fn go_to(&mut self, index: usize) -> Result<(), StoreError> {
        if !self.is_active() {
            return Ok(());
        }
        debug!(from = self.current_index, to = index, "navigate");
        let mut visited = self.visited.clone();
        visited.insert(index);

        write_json(&self.store, keys::CURRENT_INDEX, &index)?;
        write_json(&self.store, keys::VISITED, &visited)?;
        self.current_index = index;
        self.visited = visited;
        Ok(())
    }

    /// Move forward one question; no-op on the last one.
    pub fn next(&mut self) -> Result<(), StoreError> {
        if self.is_last_question() {
            return Ok(());
        }
        self.go_to(self.current_index + 1)
    }

    /// Move back one question; no-op on the first one.
    pub fn previous(&mut self) -> Result<(), StoreError> {
        if self.current_index == 0 {
            return Ok(());
        }
        self.go_to(self.current_index - 1)
    }

    /// Record `choice` as the answer to the current question.
    pub fn select_answer(&mut self, choice: &str) -> Result<(), StoreError> {
        if !self.is_active() {
            return Ok(());
        }
        let mut answers = self.answers.clone();
        answers.insert(self.current_index, choice.to_string());
        let mut visited = self.visited.clone();
        visited.insert(self.current_index);

        // Only what reached the store is kept, so a restart sees the same state.
        write_json(&self.store, keys::ANSWERS, &answers)?;
        write_json(&self.store, keys::VISITED, &visited)?;
        self.answers = answers;
        self.visited = visited;
        Ok(())
    }

    /// Advance the countdown, submitting once when it reaches zero.
    pub fn tick(&mut self) -> Result<Tick, StoreError> {
        if !self.is_active() {
            return Ok(Tick::Idle);
        }

        let remaining = self.time_remaining();
        if !remaining.is_zero() {
            return Ok(Tick::Running(remaining));
        }

        info!("time expired, submitting");
        Ok(match self.submit()? {
            Some(result) => Tick::Expired(result),
            None => Tick::Idle,
        })
    }

    /// Freeze the answers into a result and hand off to the results screen.
    ///
    /// Only the first call has an effect; later calls return `None`.
    pub fn submit(&mut self) -> Result<Option<QuizResult>, StoreError> {
        if !self.is_active() {
            return Ok(None);
        }

        let result = QuizResult {
            email: self.email.clone(),
            questions: self.questions.clone(),
            user_answers: self.answers.clone(),
        };

        write_json(&self.store, keys::RESULT, &result)?;
        self.store.clear_keys(keys::IN_PROGRESS)?;
        self.state = SessionState::Submitted;

        let card = result.score_card();
        info!(
            email = %result.email,
            score = card.score,
            total = card.total,
            "quiz submitted"
        );
        Ok(Some(result))
    }

}
