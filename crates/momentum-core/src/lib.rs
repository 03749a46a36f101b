//! # Momentum Core Library
//!
//! This library provides the core logic for Momentum, a habit tracker that
//! walks the user through an ordered list of habits behind a 12-hour focus
//! lock. All operations are available through the standalone CLI, which is a
//! thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Session**: the persisted record plus a lock/progress state machine
//!   driven from outside; time comes from an injected [`Clock`]
//! - **Storage**: a key-value medium ([`KvStore`]) backed by SQLite or memory,
//!   and TOML-based configuration
//! - **Watcher**: an async loop that clears expired locks on a timer and at
//!   the exact deadline
//!
//! ## Key Components
//!
//! - [`Session`]: lock/progress state machine
//! - [`SessionStore`]: tolerant load and full-overwrite persist
//! - [`Database`]: SQLite key-value medium
//! - [`Config`]: application configuration management

pub mod apps;
pub mod clock;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod watch;

pub use apps::{LockedApps, APP_CATALOG};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use session::{
    BuildView, Dot, FocusProgress, Habit, LockRemaining, Mode, Outcome, Rejection, Session,
    SessionState, SessionStore, LOCK_DURATION_MS,
};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use watch::watch_expiry;
