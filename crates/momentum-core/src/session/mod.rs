//! Habit session: the persisted record and the lock/progress state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Onboarding -> Build <-> Focus -> Build (lock expiry or manual reset)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = Session::open(MemoryStore::new(), SystemClock);
//! session.set_username("ada")?;
//! session.add_habit("Meditate")?;
//! session.start_focus()?;
//! session.complete_current()?;
//! // Periodically, or at the lock deadline:
//! session.check_expiry()?;
//! ```

mod machine;
mod state;
mod store;
mod view;

pub use machine::Session;
pub use state::{Habit, LockRemaining, SessionState, LOCK_DURATION_MS};
pub use store::{
    SessionStore, KEY_HABITS, KEY_INDEX, KEY_LOCKED_APPS, KEY_LOCK_UNTIL, KEY_MOMENTUM_STREAK,
    KEY_USERNAME,
};
pub use view::{BuildView, Dot, FocusProgress, Mode};

use serde::Serialize;
use std::fmt;

use crate::events::Event;

/// Result of a state-machine operation.
///
/// A rejected operation left both memory and storage untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Applied(Event),
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn event(&self) -> Option<&Event> {
        match self {
            Outcome::Applied(event) => Some(event),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Rejected(reason) => Some(reason),
        }
    }
}

/// Why an operation was a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    EmptyTitle,
    EmptyUsername,
    /// No username yet; the build screen is not available.
    NotOnboarded,
    /// The habit list and app selection are frozen while locked.
    Locked,
    NotLocked,
    NoHabits,
    /// The cursor is already past the last habit.
    AllComplete,
    OutOfBounds { index: usize, len: usize },
    /// Moving the first habit up or the last habit down.
    AtBoundary { index: usize },
    NotAdjacent { a: usize, b: usize },
    /// `check_expiry` with no lock recorded.
    NoLockToExpire,
    UnknownApp { name: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::EmptyTitle => write!(f, "habit title is empty"),
            Rejection::EmptyUsername => write!(f, "username is empty"),
            Rejection::NotOnboarded => write!(f, "set a username first"),
            Rejection::Locked => write!(f, "a focus lock is active"),
            Rejection::NotLocked => write!(f, "no focus lock is active"),
            Rejection::NoHabits => write!(f, "there are no habits"),
            Rejection::AllComplete => write!(f, "every habit is already complete"),
            Rejection::OutOfBounds { index, len } => {
                write!(f, "position {index} is out of bounds ({len} habits)")
            }
            Rejection::AtBoundary { index } => write!(f, "position {index} cannot move further"),
            Rejection::NotAdjacent { a, b } => write!(f, "positions {a} and {b} are not adjacent"),
            Rejection::NoLockToExpire => write!(f, "no lock to expire"),
            Rejection::UnknownApp { name } => write!(f, "unknown app: {name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_outcome_serializes_with_reason() {
        let outcome = Outcome::Rejected(Rejection::OutOfBounds { index: 4, len: 2 });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "rejected");
        assert_eq!(json["reason"], "out_of_bounds");
        assert_eq!(json["len"], 2);
    }

    #[test]
    fn applied_outcome_carries_event_fields() {
        let outcome = Outcome::Applied(Event::UsernameSet {
            username: "ada".into(),
            at: crate::clock::ms_to_utc(0),
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "applied");
        assert_eq!(json["type"], "UsernameSet");
        assert!(outcome.event().is_some());
        assert!(outcome.rejection().is_none());
    }
}
