//! # trivia-quiz
//!
//! A timed, fifteen-question trivia quiz for the terminal.
//!
//! The player enters an email, a batch of questions is fetched from the
//! public trivia provider (or an internal endpoint, or a local file), and
//! a thirty-minute countdown starts. Every answer and navigation step is
//! written through to a scratch store so a restarted process resumes where
//! it left off. Submitting, manually or on timeout, freezes a result that
//! the results screen scores.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trivia_quiz::{Config, MemoryStore, OpenTdbSource, Quiz, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = Config::default();
//!     let source = OpenTdbSource::new(&config.provider)?;
//!
//!     let quiz = Quiz::new(Arc::new(MemoryStore::new()), Arc::new(source), config.quiz);
//!     quiz.run().await
//! }
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod entities;
pub mod error;
pub mod landing;
pub mod models;
pub mod protocol;
pub mod results;
pub mod server;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod terminal;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub use app::{App, AppEvents, Screen, SharedStore};
pub use config::{Config, QuizConfig};
pub use data::{load_questions_from_json, EndpointSource, FileSource, OpenTdbSource, QuestionSource};
pub use error::{QuizError, StoreError, ValidationError};
pub use models::{Difficulty, Grade, Outcome, Question, QuizQuestion, QuizResult, ScoreCard};
pub use session::{Clock, QuizSession, Route};
pub use store::{FileStore, MemoryStore, ScratchStore};

/// A quiz that can be run in the terminal.
pub struct Quiz {
    app: App,
    events: AppEvents,
}

impl Quiz {
    pub fn new(store: SharedStore, source: Arc<dyn QuestionSource>, config: QuizConfig) -> Self {
        let (app, events) = App::new(store, source, Clock::System, config);
        Self { app, events }
    }

    /// Take over the terminal until the user quits.
    ///
    /// The screen shown first is decided by what the store already holds.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        self.app.resume();
        let result = run_event_loop(&mut term, &mut self.app, &mut self.events).await;
        terminal::restore()?;
        result
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop(
    terminal: &mut terminal::Tui,
    app: &mut App,
    events: &mut AppEvents,
) -> Result<(), QuizError> {
    loop {
        while let Ok(outcome) = events.fetched.try_recv() {
            app.on_fetched(outcome);
        }
        while events.ticks.try_recv().is_ok() {
            app.on_tick();
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle input with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if handle_input(app, key) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match app.route() {
        Route::Landing => handle_landing_input(app, key.code),
        Route::Quiz => handle_quiz_input(app, key.code),
        Route::Results => handle_results_input(app, key.code),
    }
}

fn handle_landing_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Esc => true,
        KeyCode::Enter => {
            app.submit_email();
            false
        }
        KeyCode::Backspace => {
            app.email_input_pop();
            false
        }
        KeyCode::Char(c) => {
            app.email_input_push(c);
            false
        }
        _ => false,
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Enter | KeyCode::Char(' ') => app.confirm(),
        KeyCode::Left | KeyCode::Char('h') => app.previous_question(),
        KeyCode::Right | KeyCode::Char('l') => app.next_question(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.submit_quiz(),
        KeyCode::Char(c @ '1'..='9') => app.select_choice(c as usize - '1' as usize),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_results_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.retake(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}
