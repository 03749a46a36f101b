use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the commitment window started by focus mode: 12 hours.
pub const LOCK_DURATION_MS: u64 = 12 * 60 * 60 * 1000;

const HOUR_MS: u64 = 60 * 60 * 1000;
const MINUTE_MS: u64 = 60 * 1000;

/// A user-defined task with a per-session completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

impl Habit {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            done: false,
        }
    }
}

/// The durable session record.
///
/// Fields are only mutated by [`super::Session`]; renderers get read access.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub(crate) username: String,
    pub(crate) habits: Vec<Habit>,
    /// Epoch milliseconds; `0` means no lock is pending.
    pub(crate) lock_until: u64,
    pub(crate) index: usize,
    pub(crate) momentum_streak: u64,
}

impl SessionState {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_onboarded(&self) -> bool {
        !self.username.is_empty()
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn lock_until(&self) -> u64 {
        self.lock_until
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn momentum_streak(&self) -> u64 {
        self.momentum_streak
    }

    /// `now < lock_until`. A zero `lock_until` is never locked.
    pub fn is_locked_at(&self, now_ms: u64) -> bool {
        now_ms < self.lock_until
    }

    /// Milliseconds left on the lock, saturating at zero.
    pub fn remaining_ms_at(&self, now_ms: u64) -> u64 {
        self.lock_until.saturating_sub(now_ms)
    }

    /// Every habit has been walked through in the current session.
    pub fn all_complete(&self) -> bool {
        !self.habits.is_empty() && self.index >= self.habits.len()
    }

    pub fn current_habit(&self) -> Option<&Habit> {
        self.habits.get(self.index)
    }

    /// Restore the record's invariants after decoding untrusted input:
    /// blank titles are dropped, then `0 <= index <= habits.len()`.
    pub(crate) fn normalize(&mut self) {
        self.habits.retain(|habit| !habit.title.trim().is_empty());
        if self.index > self.habits.len() {
            self.index = self.habits.len();
        }
    }
}

/// Whole hours and minutes left on a lock, floored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRemaining {
    pub hours: u64,
    pub minutes: u64,
    pub millis: u64,
}

impl LockRemaining {
    pub fn from_millis(millis: u64) -> Self {
        Self {
            hours: millis / HOUR_MS,
            minutes: (millis % HOUR_MS) / MINUTE_MS,
            millis,
        }
    }
}

impl fmt::Display for LockRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}
