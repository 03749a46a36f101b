//! Derived, read-only views for renderers.

use serde::{Deserialize, Serialize};

use super::state::{LockRemaining, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// No username yet.
    Onboarding,
    /// Unlocked; the habit list is editable.
    Build,
    /// Locked; habits are walked one at a time.
    Focus,
}

/// Where the cursor is while focus mode is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FocusProgress {
    InProgress {
        index: usize,
        total: usize,
        title: String,
    },
    /// Every habit is done but the lock has not expired or been reset.
    AllComplete { total: usize },
}

/// One progress dot per habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dot {
    Done,
    Current,
    Pending,
}

/// Build-screen controls. While a lock is active this is the
/// locked-build-blocked variant: the list is visible but frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildView {
    pub locked: bool,
    /// `"locked for {h}h {m}m"` while locked.
    pub lock_hint: Option<String>,
    pub can_add: bool,
    pub can_start_focus: bool,
    pub can_edit_apps: bool,
}

impl FocusProgress {
    pub(crate) fn of(state: &SessionState) -> Self {
        let total = state.habits.len();
        match state.current_habit() {
            Some(habit) => FocusProgress::InProgress {
                index: state.index,
                total,
                title: habit.title.clone(),
            },
            None => FocusProgress::AllComplete { total },
        }
    }

    pub fn is_all_complete(&self) -> bool {
        matches!(self, FocusProgress::AllComplete { .. })
    }
}

pub(crate) fn progress_dots(state: &SessionState) -> Vec<Dot> {
    (0..state.habits.len())
        .map(|i| match i.cmp(&state.index) {
            std::cmp::Ordering::Less => Dot::Done,
            std::cmp::Ordering::Equal => Dot::Current,
            std::cmp::Ordering::Greater => Dot::Pending,
        })
        .collect()
}

impl BuildView {
    pub(crate) fn of(state: &SessionState, remaining: Option<LockRemaining>) -> Self {
        match remaining {
            Some(r) => Self {
                locked: true,
                lock_hint: Some(format!("locked for {r}")),
                can_add: false,
                can_start_focus: false,
                can_edit_apps: false,
            },
            None => Self {
                locked: false,
                lock_hint: None,
                can_add: true,
                can_start_focus: !state.habits.is_empty(),
                can_edit_apps: true,
            },
        }
    }
}
