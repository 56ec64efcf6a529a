//! Workout reminder scheduling.
//!
//! The scheduler does not run its own clock. The caller invokes
//! [`Scheduler::tick`] roughly once per second with the current wall-clock
//! time; each tick decides, per workout, whether to roll over to a new
//! day, fire a first due-alert, or fire a repeat reminder. Because every
//! decision compares against the injected `now`, the scheduler is
//! indifferent to missed ticks: after an arbitrarily long gap a single
//! tick reconciles rollover state and fires at most one alert per workout.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock;
use crate::completion;
use crate::events::Event;
use crate::model::Workout;
use crate::storage::Database;

/// Today's standing of a workout, as shown in the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutStatus {
    Pending,
    Due,
    Completed,
    NotToday,
}

/// Per-tick environment the scheduler cannot own itself.
pub struct TickContext<'a> {
    pub db: &'a Database,
    /// Category ids whose workouts are hidden from alerting.
    pub inactive_categories: &'a HashSet<String>,
    /// Workout currently shown in the UI, if any.
    pub viewed: Option<&'a str>,
}

/// A workout plus its derived runtime state. Never persisted.
#[derive(Debug, Clone)]
struct Entry {
    workout: Workout,
    /// Next trigger instant: today's fixed time, or the rolling next-due
    /// for repeating workouts. None when the stored time is unparseable.
    next_due_at: Option<NaiveDateTime>,
    is_today: bool,
    completed: bool,
    alerted_initially: bool,
    next_reminder_at: Option<NaiveDateTime>,
    last_day_key: NaiveDate,
}

impl Entry {
    fn new(workout: Workout, now: NaiveDateTime, db: &Database) -> Self {
        let today = now.date();
        let is_today = workout.runs_on(today.weekday());
        let (next_due_at, completed) = if workout.repeating {
            // A freshly loaded repeating workout starts a full interval out.
            let next = now + Duration::minutes(i64::from(workout.repeat_interval_minutes));
            (Some(next), false)
        } else {
            let due = match workout.due_time() {
                Ok(t) => Some(clock::due_instant(today, t)),
                Err(e) => {
                    debug!("workout '{}' has no usable time: {e}", workout.id);
                    None
                }
            };
            (due, completion::is_completed(db, &workout.id, today))
        };
        Self {
            workout,
            next_due_at,
            is_today,
            completed,
            alerted_initially: false,
            next_reminder_at: None,
            last_day_key: today,
        }
    }

    /// Recompute daily state when the calendar date changed underneath us.
    fn rollover(&mut self, now: NaiveDateTime, db: &Database) -> bool {
        let today = now.date();
        if self.last_day_key == today {
            return false;
        }
        self.alerted_initially = false;
        self.next_reminder_at = None;
        self.is_today = self.workout.runs_on(today.weekday());
        if self.workout.repeating {
            let stale = self
                .next_due_at
                .map(|due| due < clock::start_of_day(today))
                .unwrap_or(true);
            if stale {
                self.next_due_at = Some(now);
            }
        } else {
            self.next_due_at = self
                .workout
                .due_time()
                .ok()
                .map(|t| clock::due_instant(today, t));
            self.completed = completion::is_completed(db, &self.workout.id, today);
        }
        self.last_day_key = today;
        true
    }

    fn status(&self, now: NaiveDateTime) -> WorkoutStatus {
        if self.completed {
            WorkoutStatus::Completed
        } else if !self.is_today {
            WorkoutStatus::NotToday
        } else if self.next_due_at.map(|due| now >= due).unwrap_or(false) {
            WorkoutStatus::Due
        } else {
            WorkoutStatus::Pending
        }
    }
}

pub struct Scheduler {
    entries: Vec<Entry>,
    reminder_interval: Duration,
}

impl Scheduler {
    pub fn new(
        workouts: Vec<Workout>,
        now: NaiveDateTime,
        db: &Database,
        reminder_interval_minutes: u32,
    ) -> Self {
        let reminder_interval = Duration::minutes(i64::from(reminder_interval_minutes.max(1)));
        let entries = workouts
            .into_iter()
            .map(|w| Entry::new(w, now, db))
            .collect();
        Self {
            entries,
            reminder_interval,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn workouts(&self) -> impl Iterator<Item = &Workout> {
        self.entries.iter().map(|e| &e.workout)
    }

    pub fn get(&self, workout_id: &str) -> Option<&Workout> {
        self.find(workout_id).map(|e| &e.workout)
    }

    /// Owned copy of the definitions, for persisting the blob.
    pub fn snapshot_workouts(&self) -> Vec<Workout> {
        self.entries.iter().map(|e| e.workout.clone()).collect()
    }

    pub fn status(&self, workout_id: &str, now: NaiveDateTime) -> Option<WorkoutStatus> {
        self.find(workout_id).map(|e| e.status(now))
    }

    pub fn next_due_at(&self, workout_id: &str) -> Option<NaiveDateTime> {
        self.find(workout_id).and_then(|e| e.next_due_at)
    }

    pub fn next_reminder_at(&self, workout_id: &str) -> Option<NaiveDateTime> {
        self.find(workout_id).and_then(|e| e.next_reminder_at)
    }

    pub fn is_completed(&self, workout_id: &str) -> Option<bool> {
        self.find(workout_id).map(|e| e.completed)
    }

    fn find(&self, workout_id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.workout.id == workout_id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn add(&mut self, workout: Workout, now: NaiveDateTime, db: &Database) {
        self.entries.push(Entry::new(workout, now, db));
    }

    /// One pass of the reminder ticker. Fires at most one alert per
    /// workout per tick, however long the gap since the previous tick.
    pub fn tick(&mut self, now: NaiveDateTime, ctx: &TickContext<'_>) -> Vec<Event> {
        let mut events = Vec::new();

        let mut rolled = false;
        for entry in &mut self.entries {
            rolled |= entry.rollover(now, ctx.db);
        }
        if rolled {
            events.push(Event::DayRolledOver {
                day: now.date(),
                at: now,
            });
        }

        // Whether the viewed workout may hold on to the screen.
        let viewed_open = ctx
            .viewed
            .and_then(|id| self.find(id))
            .map(|e| !e.completed)
            .unwrap_or(false);

        for entry in &mut self.entries {
            if let Some(category) = &entry.workout.category {
                if ctx.inactive_categories.contains(category) {
                    continue;
                }
            }
            if entry.completed || !entry.is_today {
                continue;
            }
            let Some(due) = entry.next_due_at else {
                continue;
            };

            if !entry.alerted_initially && now >= due {
                entry.alerted_initially = true;
                entry.next_reminder_at = Some(due + self.reminder_interval);
                events.push(Event::WorkoutDue {
                    workout_id: entry.workout.id.clone(),
                    title: entry.workout.title.clone(),
                    take_focus: take_focus(ctx.viewed, viewed_open, &entry.workout.id),
                    at: now,
                });
            } else if entry.alerted_initially {
                let Some(reminder_at) = entry.next_reminder_at else {
                    continue;
                };
                if now >= reminder_at {
                    events.push(Event::WorkoutReminder {
                        workout_id: entry.workout.id.clone(),
                        title: entry.workout.title.clone(),
                        take_focus: take_focus(ctx.viewed, viewed_open, &entry.workout.id),
                        at: now,
                    });
                    // Catch up over missed intervals: advance repeatedly,
                    // but the single event above is all that fires.
                    let mut next = reminder_at;
                    while next <= now {
                        next += self.reminder_interval;
                    }
                    entry.next_reminder_at = Some(next);
                }
            }
        }
        events
    }

    /// Complete a workout. Non-repeating: recorded in the completion
    /// store for today. Repeating: never recorded, the next due instant
    /// moves to `now + interval`.
    pub fn complete(
        &mut self,
        workout_id: &str,
        now: NaiveDateTime,
        db: &Database,
    ) -> Option<Event> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.workout.id == workout_id)?;
        entry.alerted_initially = false;
        entry.next_reminder_at = None;
        let next_due_at = if entry.workout.repeating {
            let next =
                now + Duration::minutes(i64::from(entry.workout.repeat_interval_minutes));
            entry.next_due_at = Some(next);
            Some(next)
        } else {
            entry.completed = true;
            completion::set_completed(db, workout_id, now.date(), true);
            None
        };
        Some(Event::WorkoutCompleted {
            workout_id: workout_id.to_string(),
            repeating: entry.workout.repeating,
            next_due_at,
            at: now,
        })
    }
}

fn take_focus(viewed: Option<&str>, viewed_open: bool, workout_id: &str) -> bool {
    match viewed {
        Some(v) if v == workout_id => true,
        Some(_) if viewed_open => false,
        _ => true,
    }
}
