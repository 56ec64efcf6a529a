//! Every state change in the system produces an Event.
//!
//! The CLI prints them; a GUI would subscribe. Timestamps are local
//! wall-clock naive times supplied by the caller of the tick methods.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::standup::StandPhase;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The wall-clock date changed underneath a running session.
    DayRolledOver { day: NaiveDate, at: NaiveDateTime },

    /// First alert for a workout that just became due.
    WorkoutDue {
        workout_id: String,
        title: String,
        /// Whether the UI should switch to this workout. False when a
        /// different, not-yet-completed workout is currently shown.
        take_focus: bool,
        at: NaiveDateTime,
    },

    /// Repeat reminder for a due workout that is still uncompleted.
    WorkoutReminder {
        workout_id: String,
        title: String,
        take_focus: bool,
        at: NaiveDateTime,
    },

    /// A workout was completed; repeating workouts reschedule instead of
    /// recording a completion.
    WorkoutCompleted {
        workout_id: String,
        repeating: bool,
        next_due_at: Option<NaiveDateTime>,
        at: NaiveDateTime,
    },

    TimerStarted {
        timer_id: String,
        name: String,
        duration_secs: u32,
        at: NaiveDateTime,
    },

    TimerStopped {
        timer_id: String,
        remaining_secs: u32,
        at: NaiveDateTime,
    },

    /// A countdown reached zero. `restarted` is true for repeating timers
    /// that immediately began a new lap.
    TimerFinished {
        timer_id: String,
        name: String,
        restarted: bool,
        at: NaiveDateTime,
    },

    /// The stand-up reminder flipped phase.
    StandupPhaseChanged {
        phase: StandPhase,
        until: NaiveDateTime,
        at: NaiveDateTime,
    },
}

impl Event {
    /// Events that should reach the user as an alert (sound/notification),
    /// as opposed to bookkeeping transitions.
    pub fn is_alert(&self) -> bool {
        matches!(
            self,
            Event::WorkoutDue { .. }
                | Event::WorkoutReminder { .. }
                | Event::TimerFinished { .. }
                | Event::StandupPhaseChanged { .. }
        )
    }
}
