//! # Pullup Alert Core Library
//!
//! This library provides the core business logic for the Pullup Alert
//! workout reminder. All operations are available through a standalone CLI
//! binary; any GUI would be a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Scheduler**: a wall-clock-based reminder ticker. The caller invokes
//!   `tick(now)` once per second; the scheduler decides per workout whether
//!   to roll over to a new day, fire a first due-alert, or fire a repeat
//!   reminder (with catch-up after arbitrarily long suspension gaps).
//! - **Timer engine**: named per-workout rest countdowns, at most one
//!   running at a time, also caller-ticked.
//! - **Stand-up reminder**: an independent phase machine alternating
//!   randomized sitting and standing intervals.
//! - **Storage**: a SQLite key/value table of JSON blobs plus TOML-based
//!   configuration. Reads and writes at the tick path are best-effort:
//!   failures degrade to defaults and are only logged.
//!
//! ## Key components
//!
//! - [`App`]: application state owning scheduler, timers and storage
//! - [`Scheduler`]: the reminder ticker
//! - [`TimerEngine`]: rest countdown state machine
//! - [`resolve_exercise_text`]: bracketed sets/reps template expansion

pub mod alert;
pub mod app;
pub mod clock;
pub mod completion;
pub mod error;
pub mod events;
pub mod model;
pub mod scheduler;
pub mod seed;
pub mod standup;
pub mod storage;
pub mod template;
pub mod timer;

pub use app::App;
pub use clock::DayCode;
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use model::{TimerDef, Workout};
pub use scheduler::{Scheduler, TickContext, WorkoutStatus};
pub use standup::{StandPhase, StandupTimer};
pub use storage::{Config, Database, ExerciseCategory};
pub use template::{resolve_exercise_text, VarTable};
pub use timer::{TimerEngine, TimerRuntime};
