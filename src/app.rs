use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::config::QuizConfig;
use crate::data::QuestionSource;
use crate::error::{QuizError, StoreError};
use crate::landing::{start_quiz, validate_email, START_FAILED_MESSAGE};
use crate::models::QuizResult;
use crate::results::{load_result, resume_route, retake};
use crate::session::{Clock, Countdown, QuizSession, Route, SessionState, Tick};
use crate::store::ScratchStore;

pub type SharedStore = Arc<dyn ScratchStore>;

/// Maximum accepted length of the email input.
const EMAIL_MAX_LENGTH: usize = 254;

/// Landing form state.
#[derive(Debug, Default, Clone)]
pub struct LandingForm {
    pub input: String,
    pub error: Option<String>,
    pub loading: bool,
}

/// Which panel of the quiz screen receives up/down/enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Choices,
    Navigator,
}

pub struct QuizView {
    pub session: QuizSession<SharedStore>,
    pub highlighted: usize,
    pub focus: Focus,
    pub nav_cursor: usize,
}

pub struct ResultsView {
    pub result: QuizResult,
    pub scroll: usize,
}

pub enum Screen {
    Landing(LandingForm),
    Quiz(QuizView),
    Results(ResultsView),
}

/// Receivers the event loop drains alongside terminal input.
pub struct AppEvents {
    pub ticks: mpsc::UnboundedReceiver<()>,
    pub fetched: mpsc::UnboundedReceiver<Result<usize, QuizError>>,
}

pub struct App {
    pub screen: Screen,
    store: SharedStore,
    source: Arc<dyn QuestionSource>,
    clock: Clock,
    config: QuizConfig,
    countdown: Countdown,
    tick_tx: mpsc::UnboundedSender<()>,
    fetch_tx: mpsc::UnboundedSender<Result<usize, QuizError>>,
}

impl App {
    pub fn new(
        store: SharedStore,
        source: Arc<dyn QuestionSource>,
        clock: Clock,
        config: QuizConfig,
    ) -> (Self, AppEvents) {
        let (tick_tx, ticks) = mpsc::unbounded_channel();
        let (fetch_tx, fetched) = mpsc::unbounded_channel();

        let app = Self {
            screen: Screen::Landing(LandingForm::default()),
            store,
            source,
            clock,
            config,
            countdown: Countdown::new(),
            tick_tx,
            fetch_tx,
        };

        (app, AppEvents { ticks, fetched })
    }

    /// Show whichever screen the store says we were on.
    pub fn resume(&mut self) {
        match resume_route(&*self.store) {
            Route::Landing => self.enter_landing(),
            Route::Quiz => self.enter_quiz(),
            Route::Results => self.enter_results(),
        }
    }

    pub fn route(&self) -> Route {
        match self.screen {
            Screen::Landing(_) => Route::Landing,
            Screen::Quiz(_) => Route::Quiz,
            Screen::Results(_) => Route::Results,
        }
    }

    pub fn warning_threshold(&self) -> Duration {
        self.config.warning()
    }

    pub fn timer_running(&self) -> bool {
        self.countdown.is_running()
    }

    // Landing

    pub fn email_input_push(&mut self, c: char) {
        if let Screen::Landing(form) = &mut self.screen {
            if !form.loading && form.input.chars().count() < EMAIL_MAX_LENGTH {
                form.error = None;
                form.input.push(c);
            }
        }
    }

    pub fn email_input_pop(&mut self) {
        if let Screen::Landing(form) = &mut self.screen {
            if !form.loading {
                form.error = None;
                form.input.pop();
            }
        }
    }

    /// Validate the email and, if it passes, fetch questions in the background.
    pub fn submit_email(&mut self) {
        let Screen::Landing(form) = &mut self.screen else {
            return;
        };
        if form.loading {
            return;
        }

        if let Err(e) = validate_email(&form.input) {
            form.error = Some(e.to_string());
            return;
        }

        form.error = None;
        form.loading = true;

        let email = form.input.clone();
        let store = Arc::clone(&self.store);
        let source = Arc::clone(&self.source);
        let clock = self.clock;
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let outcome = start_quiz(&*store, &*source, &email, &clock).await;
            let _ = tx.send(outcome);
        });
    }

    /// Handle completion of a background fetch.
    pub fn on_fetched(&mut self, outcome: Result<usize, QuizError>) {
        let Screen::Landing(form) = &mut self.screen else {
            return;
        };

        match outcome {
            Ok(_) => self.enter_quiz(),
            Err(e) => {
                warn!("quiz start failed: {}", e);
                form.loading = false;
                form.error = Some(match e {
                    QuizError::Validation(v) => v.to_string(),
                    _ => START_FAILED_MESSAGE.to_string(),
                });
            }
        }
    }

    // Quiz

    pub fn on_tick(&mut self) {
        let Screen::Quiz(view) = &mut self.screen else {
            return;
        };

        match view.session.tick() {
            Ok(Tick::Expired(_)) => self.enter_results(),
            Ok(Tick::Running(_)) | Ok(Tick::Idle) => {}
            Err(e) => report(Err(e)),
        }
    }

    pub fn toggle_focus(&mut self) {
        if let Screen::Quiz(view) = &mut self.screen {
            view.focus = match view.focus {
                Focus::Choices => {
                    view.nav_cursor = view.session.current_index();
                    Focus::Navigator
                }
                Focus::Navigator => Focus::Choices,
            };
        }
    }

    pub fn move_up(&mut self) {
        if let Screen::Quiz(view) = &mut self.screen {
            let (cursor, len) = view.cursor_mut();
            if len > 0 {
                *cursor = (*cursor + len - 1) % len;
            }
        }
    }

    pub fn move_down(&mut self) {
        if let Screen::Quiz(view) = &mut self.screen {
            let (cursor, len) = view.cursor_mut();
            if len > 0 {
                *cursor = (*cursor + 1) % len;
            }
        }
    }

    /// Record the highlighted choice, or jump to the question under the panel cursor.
    pub fn confirm(&mut self) {
        let Screen::Quiz(view) = &mut self.screen else {
            return;
        };

        match view.focus {
            Focus::Choices => {
                let choice = view
                    .session
                    .current_question()
                    .and_then(|q| q.choices.get(view.highlighted))
                    .cloned();
                if let Some(choice) = choice {
                    report(view.session.select_answer(&choice));
                }
            }
            Focus::Navigator => {
                let target = view.nav_cursor;
                report(view.session.go_to(target));
                view.focus = Focus::Choices;
                view.sync_highlight();
            }
        }
    }

    /// Record the choice at `index` (0-based) directly.
    pub fn select_choice(&mut self, index: usize) {
        if let Screen::Quiz(view) = &mut self.screen {
            let choice = view
                .session
                .current_question()
                .and_then(|q| q.choices.get(index))
                .cloned();
            if let Some(choice) = choice {
                view.highlighted = index;
                report(view.session.select_answer(&choice));
            }
        }
    }

    pub fn previous_question(&mut self) {
        if let Screen::Quiz(view) = &mut self.screen {
            report(view.session.previous());
            view.sync_highlight();
        }
    }

    /// Next question; on the last question this submits.
    pub fn next_question(&mut self) {
        let Screen::Quiz(view) = &mut self.screen else {
            return;
        };

        if view.session.is_last_question() {
            self.submit_quiz();
        } else {
            report(view.session.next());
            view.sync_highlight();
        }
    }

    pub fn submit_quiz(&mut self) {
        let Screen::Quiz(view) = &mut self.screen else {
            return;
        };

        match view.session.submit() {
            Ok(Some(_)) => self.enter_results(),
            Ok(None) => {}
            Err(e) => report(Err(e)),
        }
    }

    // Results

    pub fn scroll_results_down(&mut self) {
        if let Screen::Results(view) = &mut self.screen {
            let max_scroll = view.result.total_questions().saturating_sub(1);
            view.scroll = (view.scroll + 1).min(max_scroll);
        }
    }

    pub fn scroll_results_up(&mut self) {
        if let Screen::Results(view) = &mut self.screen {
            view.scroll = view.scroll.saturating_sub(1);
        }
    }

    pub fn retake(&mut self) {
        if !matches!(self.screen, Screen::Results(_)) {
            return;
        }
        report(retake(&*self.store).map(|_| ()));
        self.enter_landing();
    }

    // Transitions

    fn enter_landing(&mut self) {
        self.countdown.stop();
        self.screen = Screen::Landing(LandingForm::default());
    }

    fn enter_quiz(&mut self) {
        let mut session = QuizSession::new(
            Arc::clone(&self.store),
            self.clock,
            self.config.duration(),
        );

        if session.load() != SessionState::Active {
            self.enter_landing();
            return;
        }

        let mut view = QuizView {
            session,
            highlighted: 0,
            focus: Focus::Choices,
            nav_cursor: 0,
        };
        view.sync_highlight();
        self.screen = Screen::Quiz(view);
        self.countdown.start(self.config.tick(), self.tick_tx.clone());

        // A reload after the deadline submits straight away.
        self.on_tick();
    }

    fn enter_results(&mut self) {
        self.countdown.stop();
        match load_result(&*self.store) {
            Ok(result) => self.screen = Screen::Results(ResultsView { result, scroll: 0 }),
            Err(_) => self.enter_landing(),
        }
    }
}

impl QuizView {
    /// The cursor the focused panel moves, with its length.
    fn cursor_mut(&mut self) -> (&mut usize, usize) {
        match self.focus {
            Focus::Choices => {
                let len = self
                    .session
                    .current_question()
                    .map_or(0, |q| q.choices.len());
                (&mut self.highlighted, len)
            }
            Focus::Navigator => (&mut self.nav_cursor, self.session.total_questions()),
        }
    }

    /// Put the choice cursor on the recorded answer, if any.
    fn sync_highlight(&mut self) {
        let current = self.session.current_index();
        self.highlighted = self
            .session
            .current_question()
            .and_then(|q| {
                let answer = self.session.answer_for(current)?;
                q.choices.iter().position(|c| c == answer)
            })
            .unwrap_or(0);
        self.nav_cursor = current;
    }
}

fn report(result: Result<(), StoreError>) {
    if let Err(e) = result {
        error!("failed to persist quiz state: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, Question, QuizQuestion};
    use crate::session::begin_session;
    use crate::store::{keys, MemoryStore};
    use async_trait::async_trait;

    const NOW: i64 = 1_700_000_000_000;

    struct StaticSource {
        questions: Option<Vec<QuizQuestion>>,
    }

    #[async_trait]
    impl QuestionSource for StaticSource {
        async fn fetch_questions(&self) -> Result<Vec<QuizQuestion>, QuizError> {
            self.questions
                .clone()
                .ok_or_else(|| QuizError::UpstreamUnavailable("offline".to_string()))
        }
    }

    fn questions(n: usize) -> Vec<QuizQuestion> {
        (0..n)
            .map(|i| QuizQuestion {
                question: Question {
                    category: "Geography".to_string(),
                    kind: "multiple".to_string(),
                    difficulty: Difficulty::Easy,
                    question: format!("Q{}", i),
                    correct_answer: format!("R{}", i),
                    incorrect_answers: vec![format!("W{}", i)],
                },
                id: i,
                choices: vec![format!("W{}", i), format!("R{}", i)],
            })
            .collect()
    }

    fn app(store: Arc<MemoryStore>, source: Option<Vec<QuizQuestion>>) -> (App, AppEvents) {
        App::new(
            store,
            Arc::new(StaticSource { questions: source }),
            Clock::fixed(NOW),
            QuizConfig::default(),
        )
    }

    fn type_email(app: &mut App, email: &str) {
        for c in email.chars() {
            app.email_input_push(c);
        }
    }

    fn quiz_view(app: &App) -> &QuizView {
        match &app.screen {
            Screen::Quiz(view) => view,
            _ => panic!("not on quiz screen"),
        }
    }

    #[tokio::test]
    async fn test_empty_store_resumes_at_landing() {
        let (mut app, _events) = app(Arc::new(MemoryStore::new()), None);
        app.resume();
        assert_eq!(app.route(), Route::Landing);
        assert!(!app.timer_running());
    }

    #[tokio::test]
    async fn test_invalid_email_shows_inline_error() {
        let (mut app, mut events) = app(Arc::new(MemoryStore::new()), Some(questions(3)));
        type_email(&mut app, "a@b");
        app.submit_email();

        let Screen::Landing(form) = &app.screen else {
            panic!("expected landing");
        };
        assert_eq!(form.error.as_deref(), Some("Please enter a valid email address"));
        assert!(!form.loading);
        assert!(events.fetched.try_recv().is_err());

        app.email_input_push('x');
        let Screen::Landing(form) = &app.screen else {
            panic!("expected landing");
        };
        assert_eq!(form.error, None);
    }

    #[tokio::test]
    async fn test_fetch_failure_allows_retry() {
        let (mut app, mut events) = app(Arc::new(MemoryStore::new()), None);
        type_email(&mut app, "a@b.com");
        app.submit_email();

        let outcome = events.fetched.recv().await.unwrap();
        app.on_fetched(outcome);

        let Screen::Landing(form) = &app.screen else {
            panic!("expected landing");
        };
        assert_eq!(form.error.as_deref(), Some(START_FAILED_MESSAGE));
        assert!(!form.loading);
        assert_eq!(form.input, "a@b.com");
    }

    #[tokio::test]
    async fn test_empty_batch_keeps_landing_with_error() {
        let store = Arc::new(MemoryStore::new());
        let (mut app, mut events) = app(store.clone(), Some(Vec::new()));
        type_email(&mut app, "a@b.com");
        app.submit_email();

        let outcome = events.fetched.recv().await.unwrap();
        assert!(outcome.is_err());
        app.on_fetched(outcome);

        let Screen::Landing(form) = &app.screen else {
            panic!("expected landing");
        };
        assert_eq!(form.error.as_deref(), Some(START_FAILED_MESSAGE));
        assert_eq!(form.input, "a@b.com");
        assert!(!form.loading);
        assert_eq!(store.get(keys::QUESTIONS), None);
        assert_eq!(store.get(keys::START_TIME), None);
    }

    #[tokio::test]
    async fn test_full_flow_landing_to_retake() {
        let store = Arc::new(MemoryStore::new());
        let (mut app, mut events) = app(store.clone(), Some(questions(3)));

        type_email(&mut app, "a@b.com");
        app.submit_email();
        let outcome = events.fetched.recv().await.unwrap();
        app.on_fetched(outcome);

        assert_eq!(app.route(), Route::Quiz);
        assert!(app.timer_running());

        // Answer question 1 correctly via the highlighted cursor.
        app.move_down();
        app.confirm();
        // Question 2 wrong via direct selection.
        app.next_question();
        app.select_choice(0);
        // Jump to question 3 through the navigator, leave it unanswered.
        app.toggle_focus();
        app.move_down();
        app.confirm();
        assert_eq!(quiz_view(&app).session.current_index(), 2);

        // Next on the last question submits.
        app.next_question();
        assert_eq!(app.route(), Route::Results);
        assert!(!app.timer_running());

        let Screen::Results(view) = &app.screen else {
            panic!("expected results");
        };
        let card = view.result.score_card();
        assert_eq!((card.score, card.total, card.percentage), (1, 3, 33));

        app.retake();
        assert_eq!(app.route(), Route::Landing);
        for key in keys::ALL {
            assert_eq!(store.get(key), None);
        }
    }

    #[tokio::test]
    async fn test_resume_restores_highlight_and_position() {
        let store = Arc::new(MemoryStore::new());
        begin_session(&*store, "a@b.com", &questions(5), &Clock::fixed(NOW)).unwrap();

        {
            let (mut app, _events) = app(store.clone(), None);
            app.resume();
            app.next_question();
            app.select_choice(1);
        }

        let (mut app, _events) = app(store, None);
        app.resume();
        let view = quiz_view(&app);
        assert_eq!(view.session.current_index(), 1);
        assert_eq!(view.highlighted, 1);
        assert_eq!(view.session.answer_for(1), Some("R1"));
    }

    #[tokio::test]
    async fn test_resume_after_deadline_submits_immediately() {
        let store = Arc::new(MemoryStore::new());
        let long_ago = NOW - 31 * 60 * 1000;
        begin_session(&*store, "a@b.com", &questions(2), &Clock::fixed(long_ago)).unwrap();

        let (mut app, _events) = app(store.clone(), None);
        app.resume();

        assert_eq!(app.route(), Route::Results);
        assert!(!app.timer_running());
        assert!(store.get(keys::RESULT).is_some());
    }

    #[tokio::test]
    async fn test_navigation_clamps_at_first_question() {
        let store = Arc::new(MemoryStore::new());
        begin_session(&*store, "a@b.com", &questions(2), &Clock::fixed(NOW)).unwrap();
        let (mut app, _events) = app(store, None);
        app.resume();

        app.previous_question();
        assert_eq!(quiz_view(&app).session.current_index(), 0);
    }

    #[tokio::test]
    async fn test_results_scroll_is_clamped() {
        let store = Arc::new(MemoryStore::new());
        begin_session(&*store, "a@b.com", &questions(2), &Clock::fixed(NOW)).unwrap();
        let (mut app, _events) = app(store, None);
        app.resume();
        app.submit_quiz();

        app.scroll_results_up();
        app.scroll_results_down();
        app.scroll_results_down();
        app.scroll_results_down();
        let Screen::Results(view) = &app.screen else {
            panic!("expected results");
        };
        assert_eq!(view.scroll, 1);
    }
}
