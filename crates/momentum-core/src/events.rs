use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{FocusProgress, Habit, LockRemaining, Mode};

/// Every applied state change in the system produces an Event.
/// Renderers print them; the watcher forwards them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    UsernameSet {
        username: String,
        at: DateTime<Utc>,
    },
    HabitAdded {
        index: usize,
        title: String,
        at: DateTime<Utc>,
    },
    HabitMoved {
        from: usize,
        to: usize,
        at: DateTime<Utc>,
    },
    HabitRemoved {
        index: usize,
        title: String,
        at: DateTime<Utc>,
    },
    FocusStarted {
        habit_count: usize,
        lock_until: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    HabitCompleted {
        index: usize,
        title: String,
        /// Habits still ahead of the cursor.
        remaining: usize,
        at: DateTime<Utc>,
    },
    /// The lock ran out and the session was cleared for reuse.
    LockExpired {
        habit_count: usize,
        at: DateTime<Utc>,
    },
    /// Manual reset. `completed` records whether every habit had been done.
    SessionReset {
        momentum_streak: u64,
        completed: bool,
        at: DateTime<Utc>,
    },
    LockedAppsUpdated {
        apps: Vec<String>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        username: String,
        habits: Vec<Habit>,
        index: usize,
        locked: bool,
        lock_until: Option<DateTime<Utc>>,
        remaining: Option<LockRemaining>,
        progress: Option<FocusProgress>,
        momentum_streak: u64,
        locked_apps: Vec<String>,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::UsernameSet { at, .. }
            | Event::HabitAdded { at, .. }
            | Event::HabitMoved { at, .. }
            | Event::HabitRemoved { at, .. }
            | Event::FocusStarted { at, .. }
            | Event::HabitCompleted { at, .. }
            | Event::LockExpired { at, .. }
            | Event::SessionReset { at, .. }
            | Event::LockedAppsUpdated { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }
}
