//! Tolerant load and full-overwrite persist of the session record.
//!
//! Each field lives under its own key as a JSON value. Reads never fail: a
//! missing key, a malformed payload, a value of the wrong type, or a medium
//! read error all yield the field's fallback. Writes always go through and
//! surface medium failures to the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::state::{Habit, SessionState};
use crate::apps::LockedApps;
use crate::error::Result;
use crate::storage::KvStore;

pub const KEY_USERNAME: &str = "username";
pub const KEY_HABITS: &str = "habits";
pub const KEY_LOCK_UNTIL: &str = "lockUntil";
pub const KEY_INDEX: &str = "index";
pub const KEY_MOMENTUM_STREAK: &str = "momentumStreak";
pub const KEY_LOCKED_APPS: &str = "lockedApps";

/// Session-record view over a [`KvStore`].
#[derive(Debug)]
pub struct SessionStore<S> {
    medium: S,
}

impl<S: KvStore> SessionStore<S> {
    pub fn new(medium: S) -> Self {
        Self { medium }
    }

    pub fn medium(&self) -> &S {
        &self.medium
    }

    pub fn into_inner(self) -> S {
        self.medium
    }

    /// Decode `key`, or return `fallback` on any failure.
    pub fn load_or<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.medium.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(e) => {
                tracing::warn!(key, "read failed, using default: {e}");
                return fallback;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "undecodable value, using default: {e}");
                fallback
            }
        }
    }

    /// Load the whole record, field by field.
    pub fn load_state(&self) -> SessionState {
        let mut state = SessionState {
            username: self.load_or(KEY_USERNAME, String::new()),
            habits: self.load_or::<Vec<Habit>>(KEY_HABITS, Vec::new()),
            lock_until: self.load_or(KEY_LOCK_UNTIL, 0),
            index: self.load_or(KEY_INDEX, 0),
            momentum_streak: self.load_or(KEY_MOMENTUM_STREAK, 0),
        };
        state.normalize();
        state
    }

    pub fn load_apps(&self) -> LockedApps {
        LockedApps::sanitized(self.load_or(KEY_LOCKED_APPS, Vec::new()))
    }

    /// Overwrite every field of the record in one [`KvStore::set_many`].
    ///
    /// # Errors
    /// Returns the medium failure. On a transactional medium such as
    /// [`crate::Database`] the stored record is then unchanged; on others it
    /// may be partly written.
    pub fn persist(&mut self, state: &SessionState) -> Result<()> {
        let entries = [
            (KEY_USERNAME, serde_json::to_string(&state.username)?),
            (KEY_HABITS, serde_json::to_string(&state.habits)?),
            (KEY_LOCK_UNTIL, serde_json::to_string(&state.lock_until)?),
            (KEY_INDEX, serde_json::to_string(&state.index)?),
            (KEY_MOMENTUM_STREAK, serde_json::to_string(&state.momentum_streak)?),
        ];
        self.medium.set_many(&entries)?;
        Ok(())
    }

    pub fn persist_apps(&mut self, apps: &LockedApps) -> Result<()> {
        self.write(KEY_LOCKED_APPS, apps)
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.medium.set(key, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, DatabaseError};
    use crate::storage::{Database, MemoryStore};

    struct BrokenMedium;

    impl KvStore for BrokenMedium {
        fn get(&self, _key: &str) -> Result<Option<String>, DatabaseError> {
            Err(DatabaseError::QueryFailed("disk gone".into()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), DatabaseError> {
            Err(DatabaseError::WriteRejected("quota exceeded".into()))
        }
        fn clear(&mut self) -> Result<(), DatabaseError> {
            Ok(())
        }
    }

    fn store_with(pairs: &[(&str, &str)]) -> SessionStore<MemoryStore> {
        let mut medium = MemoryStore::new();
        for (k, v) in pairs {
            medium.set(k, v).unwrap();
        }
        SessionStore::new(medium)
    }

    #[test]
    fn empty_medium_yields_defaults() {
        let store = store_with(&[]);
        assert_eq!(store.load_state(), SessionState::default());
        assert!(store.load_apps().is_empty());
    }

    #[test]
    fn corrupt_fields_fall_back_individually() {
        let store = store_with(&[
            (KEY_USERNAME, "\"ada\""),
            (KEY_HABITS, "{not json"),
            (KEY_LOCK_UNTIL, "\"soon\""),
            (KEY_INDEX, "null"),
            (KEY_MOMENTUM_STREAK, "-2"),
        ]);
        let state = store.load_state();
        assert_eq!(state.username(), "ada");
        assert!(state.habits().is_empty());
        assert_eq!(state.lock_until(), 0);
        assert_eq!(state.index(), 0);
        assert_eq!(state.momentum_streak(), 0);
    }

    #[test]
    fn out_of_range_index_is_clamped_on_load() {
        let store = store_with(&[
            (KEY_HABITS, r#"[{"title":"Read","done":true}]"#),
            (KEY_INDEX, "5"),
        ]);
        assert_eq!(store.load_state().index(), 1);
    }

    #[test]
    fn blank_titles_are_dropped_on_load() {
        let store = store_with(&[
            (KEY_HABITS, r#"[{"title":"  "},{"title":"Read","done":true},{"title":""}]"#),
            (KEY_INDEX, "3"),
        ]);
        let state = store.load_state();
        assert_eq!(
            state.habits(),
            [Habit {
                title: "Read".into(),
                done: true,
            }]
        );
        assert_eq!(state.index(), 1);
    }

    #[test]
    fn persist_then_load_round_trips() {
        let mut store = store_with(&[]);
        let state = SessionState {
            username: "ada".into(),
            habits: vec![
                Habit {
                    title: "Meditate".into(),
                    done: true,
                },
                Habit::new("Read"),
            ],
            lock_until: 1_700_000_000_000,
            index: 1,
            momentum_streak: 4,
        };
        store.persist(&state).unwrap();
        assert_eq!(store.load_state(), state);
        assert_eq!(
            store.medium().get(KEY_LOCK_UNTIL).unwrap().as_deref(),
            Some("1700000000000")
        );
    }

    #[test]
    fn apps_round_trip_and_drop_unknown_names() {
        let mut store = store_with(&[(KEY_LOCKED_APPS, r#"["Reddit","Tetris"]"#)]);
        assert_eq!(store.load_apps().names(), ["Reddit"]);

        let apps = LockedApps::from_names(["Twitch", "YouTube"]).unwrap();
        store.persist_apps(&apps).unwrap();
        assert_eq!(store.load_apps(), apps);
    }

    #[test]
    fn read_failures_are_swallowed() {
        let store = SessionStore::new(BrokenMedium);
        assert_eq!(store.load_state(), SessionState::default());
    }

    #[test]
    fn failed_persist_keeps_previous_record_on_sqlite() {
        let mut store = SessionStore::new(Database::open_memory().unwrap());
        let before = SessionState {
            username: "ada".into(),
            habits: vec![Habit {
                title: "Read".into(),
                done: true,
            }],
            lock_until: 1_700_000_000_000,
            index: 1,
            momentum_streak: 3,
        };
        store.persist(&before).unwrap();
        store
            .medium()
            .conn()
            .execute_batch(
                "CREATE TRIGGER refuse_streak BEFORE INSERT ON kv
                 WHEN NEW.key = 'momentumStreak'
                 BEGIN SELECT RAISE(ABORT, 'streak write refused'); END;",
            )
            .unwrap();

        let reset = SessionState {
            habits: vec![Habit::new("Read")],
            lock_until: 0,
            index: 0,
            momentum_streak: 4,
            ..before.clone()
        };
        assert!(store.persist(&reset).is_err());
        assert_eq!(store.load_state(), before);
    }

    #[test]
    fn write_failures_propagate() {
        let mut store = SessionStore::new(BrokenMedium);
        let err = store.persist(&SessionState::default()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Database(DatabaseError::WriteRejected(_))
        ));
    }
}
