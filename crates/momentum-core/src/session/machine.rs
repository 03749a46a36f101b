//! Lock/progress state machine.
//!
//! Like the rest of the core, the machine is driven entirely from outside:
//! user commands call the operations below, and a watcher calls
//! [`Session::check_expiry`] on a timer. Every operation runs to completion
//! before the next one starts, so no internal locking is needed.
//!
//! Applied operations mutate the in-memory record first and then overwrite
//! the whole record in storage. If storage fails the error propagates and the
//! in-memory copy keeps the change.

use tracing::{debug, info};

use super::state::{Habit, LockRemaining, SessionState, LOCK_DURATION_MS};
use super::store::SessionStore;
use super::view::{progress_dots, BuildView, Dot, FocusProgress, Mode};
use super::{Outcome, Rejection};
use crate::apps::LockedApps;
use crate::clock::{ms_to_utc, Clock};
use crate::error::Result;
use crate::events::Event;
use crate::storage::KvStore;

/// The session object: owns the record, its store and the clock.
///
/// Constructed once at process start and passed by `&mut` to whatever
/// drives it.
pub struct Session<S, C> {
    state: SessionState,
    apps: LockedApps,
    store: SessionStore<S>,
    clock: C,
}

impl<S: KvStore, C: Clock> Session<S, C> {
    /// Load the persisted record, falling back to defaults field by field.
    pub fn open(medium: S, clock: C) -> Self {
        let store = SessionStore::new(medium);
        let state = store.load_state();
        let apps = store.load_apps();
        debug!(
            habits = state.habits.len(),
            lock_until = state.lock_until,
            "session loaded"
        );
        Self {
            state,
            apps,
            store,
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn locked_apps(&self) -> &LockedApps {
        &self.apps
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn into_store(self) -> SessionStore<S> {
        self.store
    }

    pub fn is_locked(&self) -> bool {
        self.state.is_locked_at(self.clock.now_ms())
    }

    pub fn mode(&self) -> Mode {
        if !self.state.is_onboarded() {
            Mode::Onboarding
        } else if self.is_locked() {
            Mode::Focus
        } else {
            Mode::Build
        }
    }

    /// Milliseconds until the lock lifts; `None` when not locked.
    pub fn remaining_lock_ms(&self) -> Option<u64> {
        let now = self.clock.now_ms();
        self.state
            .is_locked_at(now)
            .then(|| self.state.remaining_ms_at(now))
    }

    /// Whole hours and minutes left on the lock; `None` when not locked.
    pub fn remaining_lock_duration(&self) -> Option<LockRemaining> {
        self.remaining_lock_ms().map(LockRemaining::from_millis)
    }

    /// Cursor position while locked; `None` outside focus mode.
    pub fn focus_progress(&self) -> Option<FocusProgress> {
        self.is_locked().then(|| FocusProgress::of(&self.state))
    }

    pub fn progress_dots(&self) -> Vec<Dot> {
        progress_dots(&self.state)
    }

    pub fn build_view(&self) -> BuildView {
        BuildView::of(&self.state, self.remaining_lock_duration())
    }

    /// The streak as text, or `placeholder` while it is zero.
    pub fn streak_label(&self, placeholder: &str) -> String {
        match self.state.momentum_streak {
            0 => placeholder.to_string(),
            n => n.to_string(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let lock_until = (self.state.lock_until != 0).then(|| ms_to_utc(self.state.lock_until));
        Event::StateSnapshot {
            mode: self.mode(),
            username: self.state.username.clone(),
            habits: self.state.habits.clone(),
            index: self.state.index,
            locked: self.is_locked(),
            lock_until,
            remaining: self.remaining_lock_duration(),
            progress: self.focus_progress(),
            momentum_streak: self.state.momentum_streak,
            locked_apps: self.apps.names().to_vec(),
            at: self.clock.now_utc(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Re-read the record from storage, discarding the in-memory copy.
    ///
    /// For front ends where other processes write the same store.
    pub fn reload(&mut self) {
        self.state = self.store.load_state();
        self.apps = self.store.load_apps();
    }

    /// Bring a freshly loaded session up to date: an elapsed lock is cleared
    /// before anything is shown in build mode.
    pub fn boot(&mut self) -> Result<Option<Event>> {
        if self.is_locked() {
            return Ok(None);
        }
        Ok(match self.check_expiry()? {
            Outcome::Applied(event) => Some(event),
            Outcome::Rejected(_) => None,
        })
    }

    pub fn set_username(&mut self, name: &str) -> Result<Outcome> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Outcome::Rejected(Rejection::EmptyUsername));
        }
        self.state.username = name.to_string();
        let event = Event::UsernameSet {
            username: self.state.username.clone(),
            at: self.clock.now_utc(),
        };
        self.commit(event)
    }

    pub fn add_habit(&mut self, title: &str) -> Result<Outcome> {
        if !self.state.is_onboarded() {
            return Ok(Outcome::Rejected(Rejection::NotOnboarded));
        }
        let title = title.trim();
        if title.is_empty() {
            return Ok(Outcome::Rejected(Rejection::EmptyTitle));
        }
        if self.is_locked() {
            return Ok(Outcome::Rejected(Rejection::Locked));
        }
        self.state.habits.push(Habit::new(title));
        let event = Event::HabitAdded {
            index: self.state.habits.len() - 1,
            title: title.to_string(),
            at: self.clock.now_utc(),
        };
        self.commit(event)
    }

    /// Swap two adjacent habits.
    pub fn reorder_habit(&mut self, a: usize, b: usize) -> Result<Outcome> {
        if let Some(reason) = self.list_frozen() {
            return Ok(Outcome::Rejected(reason));
        }
        let len = self.state.habits.len();
        if let Some(index) = [a, b].into_iter().find(|&i| i >= len) {
            return Ok(Outcome::Rejected(Rejection::OutOfBounds { index, len }));
        }
        if a.abs_diff(b) != 1 {
            return Ok(Outcome::Rejected(Rejection::NotAdjacent { a, b }));
        }
        self.state.habits.swap(a, b);
        let event = Event::HabitMoved {
            from: a,
            to: b,
            at: self.clock.now_utc(),
        };
        self.commit(event)
    }

    pub fn move_habit_up(&mut self, index: usize) -> Result<Outcome> {
        if let Some(reason) = self.list_frozen() {
            return Ok(Outcome::Rejected(reason));
        }
        if index == 0 {
            return Ok(Outcome::Rejected(Rejection::AtBoundary { index }));
        }
        self.reorder_habit(index, index - 1)
    }

    pub fn move_habit_down(&mut self, index: usize) -> Result<Outcome> {
        if let Some(reason) = self.list_frozen() {
            return Ok(Outcome::Rejected(reason));
        }
        let len = self.state.habits.len();
        if index < len && index + 1 == len {
            return Ok(Outcome::Rejected(Rejection::AtBoundary { index }));
        }
        self.reorder_habit(index, index.saturating_add(1))
    }

    pub fn remove_habit(&mut self, index: usize) -> Result<Outcome> {
        if let Some(reason) = self.list_frozen() {
            return Ok(Outcome::Rejected(reason));
        }
        let len = self.state.habits.len();
        if index >= len {
            return Ok(Outcome::Rejected(Rejection::OutOfBounds { index, len }));
        }
        let removed = self.state.habits.remove(index);
        self.state.normalize();
        let event = Event::HabitRemoved {
            index,
            title: removed.title,
            at: self.clock.now_utc(),
        };
        self.commit(event)
    }

    /// Enter focus mode and start the 12-hour lock.
    pub fn start_focus(&mut self) -> Result<Outcome> {
        if !self.state.is_onboarded() {
            return Ok(Outcome::Rejected(Rejection::NotOnboarded));
        }
        if self.state.habits.is_empty() {
            return Ok(Outcome::Rejected(Rejection::NoHabits));
        }
        let now = self.clock.now_ms();
        if self.state.is_locked_at(now) {
            return Ok(Outcome::Rejected(Rejection::Locked));
        }
        self.state.lock_until = now.saturating_add(LOCK_DURATION_MS);
        self.state.index = 0;
        // A stale session that expired without a check must not leak its flags.
        for habit in &mut self.state.habits {
            habit.done = false;
        }
        let event = Event::FocusStarted {
            habit_count: self.state.habits.len(),
            lock_until: ms_to_utc(self.state.lock_until),
            at: ms_to_utc(now),
        };
        self.commit(event)
    }

    /// Mark the habit under the cursor done and advance.
    pub fn complete_current(&mut self) -> Result<Outcome> {
        if !self.is_locked() {
            return Ok(Outcome::Rejected(Rejection::NotLocked));
        }
        let index = self.state.index;
        let Some(habit) = self.state.habits.get_mut(index) else {
            return Ok(Outcome::Rejected(Rejection::AllComplete));
        };
        habit.done = true;
        let title = habit.title.clone();
        self.state.index += 1;
        let event = Event::HabitCompleted {
            index,
            title,
            remaining: self.state.habits.len() - self.state.index,
            at: self.clock.now_utc(),
        };
        self.commit(event)
    }

    /// Clear a lock that has run out. Idempotent.
    pub fn check_expiry(&mut self) -> Result<Outcome> {
        let now = self.clock.now_ms();
        if self.state.is_locked_at(now) {
            return Ok(Outcome::Rejected(Rejection::Locked));
        }
        if self.state.lock_until == 0 {
            return Ok(Outcome::Rejected(Rejection::NoLockToExpire));
        }
        info!(
            lock_until = self.state.lock_until,
            now, "focus lock expired, resetting session"
        );
        self.clear_session();
        let event = Event::LockExpired {
            habit_count: self.state.habits.len(),
            at: ms_to_utc(now),
        };
        self.commit(event)
    }

    /// End the session early (or acknowledge a finished one) and bump the
    /// streak. Always applies.
    pub fn force_reset_and_advance_streak(&mut self) -> Result<Outcome> {
        let completed = self.state.all_complete();
        self.clear_session();
        self.state.momentum_streak = self.state.momentum_streak.saturating_add(1);
        info!(
            streak = self.state.momentum_streak,
            completed, "session reset by user"
        );
        let event = Event::SessionReset {
            momentum_streak: self.state.momentum_streak,
            completed,
            at: self.clock.now_utc(),
        };
        self.commit(event)
    }

    /// Replace the cosmetic locked-apps selection.
    pub fn set_locked_apps<I, T>(&mut self, names: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        if let Some(reason) = self.list_frozen() {
            return Ok(Outcome::Rejected(reason));
        }
        let apps = match LockedApps::from_names(names) {
            Ok(apps) => apps,
            Err(name) => return Ok(Outcome::Rejected(Rejection::UnknownApp { name })),
        };
        self.apps = apps;
        self.store.persist_apps(&self.apps)?;
        let event = Event::LockedAppsUpdated {
            apps: self.apps.names().to_vec(),
            at: self.clock.now_utc(),
        };
        debug!(?event, "applied");
        Ok(Outcome::Applied(event))
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Build-mode edits need a username and no active lock.
    fn list_frozen(&self) -> Option<Rejection> {
        if !self.state.is_onboarded() {
            Some(Rejection::NotOnboarded)
        } else if self.is_locked() {
            Some(Rejection::Locked)
        } else {
            None
        }
    }

    fn clear_session(&mut self) {
        for habit in &mut self.state.habits {
            habit.done = false;
        }
        self.state.lock_until = 0;
        self.state.index = 0;
    }

    fn commit(&mut self, event: Event) -> Result<Outcome> {
        self.store.persist(&self.state)?;
        debug!(?event, "applied");
        Ok(Outcome::Applied(event))
    }
}
