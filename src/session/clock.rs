use chrono::Utc;

/// Wall-clock source in epoch milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(i64),
}

impl Clock {
    pub fn fixed(at_ms: i64) -> Self {
        Self::Fixed(at_ms)
    }

    pub fn now_ms(&self) -> i64 {
        match self {
            Clock::System => Utc::now().timestamp_millis(),
            Clock::Fixed(ms) => *ms,
        }
    }

    /// Advance a fixed clock. No effect on the system clock.
    pub fn advance_ms(&mut self, delta: i64) {
        if let Clock::Fixed(ms) = self {
            *ms += delta;
        }
    }
}
