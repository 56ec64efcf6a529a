//! Application state.
//!
//! One struct owns every moving part: the workout scheduler, the rest
//! timers for the selected workout, the stand-up reminder, configuration
//! and the storage handle. Two independent 1-second pollers drive it:
//! [`App::tick`] (reminders and stand-up) and [`App::tick_timer`] (the
//! countdown).

use chrono::NaiveDateTime;
use rand::Rng;

use crate::error::CoreError;
use crate::events::Event;
use crate::model::Workout;
use crate::scheduler::{Scheduler, TickContext, WorkoutStatus};
use crate::seed;
use crate::standup::StandupTimer;
use crate::storage::{self, workouts, Config, Database};
use crate::template::resolve_exercise_text;
use crate::timer::TimerEngine;

pub struct App {
    db: Database,
    config: Config,
    scheduler: Scheduler,
    timers: TimerEngine,
    standup: StandupTimer,
    current: Option<String>,
}

impl App {
    /// Open storage at the default location, loading persisted workouts
    /// and importing the seed document on first run.
    pub fn open(now: NaiveDateTime) -> Result<Self, CoreError> {
        let db = Database::open()?;
        let mut config = Config::load_or_default();
        let seed_path = storage::data_dir()?.join("workouts.json");
        let bootstrap = seed::bootstrap(&db, &mut config, &seed_path, false);
        if bootstrap.imported {
            if let Err(e) = config.save() {
                tracing::warn!("could not persist seeded category defaults: {e}");
            }
        }
        Ok(Self::assemble(db, config, bootstrap.workouts, now))
    }

    /// Build an app over an already-open database (tests, custom paths).
    /// No seed import happens here.
    pub fn with_database(db: Database, config: Config, now: NaiveDateTime) -> Self {
        let list = workouts::load_or_default(&db);
        Self::assemble(db, config, list, now)
    }

    fn assemble(db: Database, config: Config, list: Vec<Workout>, now: NaiveDateTime) -> Self {
        let scheduler = Scheduler::new(list, now, &db, config.reminder.interval_minutes);
        let standup = StandupTimer::load(config.standup.clone(), &db);
        Self {
            db,
            config,
            scheduler,
            timers: TimerEngine::new(),
            standup,
            current: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn timers(&self) -> &TimerEngine {
        &self.timers
    }

    pub fn standup(&self) -> &StandupTimer {
        &self.standup
    }

    pub fn current_workout(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn status(&self, workout_id: &str, now: NaiveDateTime) -> Option<WorkoutStatus> {
        self.scheduler.status(workout_id, now)
    }

    /// Exercise lines for a workout with all template tokens resolved
    /// against the configured category variables.
    pub fn resolved_exercises(&self, workout_id: &str) -> Vec<String> {
        let vars = self.config.var_table();
        self.scheduler
            .get(workout_id)
            .map(|w| {
                w.exercises
                    .iter()
                    .map(|line| resolve_exercise_text(line, &vars))
                    .collect()
            })
            .unwrap_or_default()
    }

    // ── Pollers ──────────────────────────────────────────────────────

    /// Poller #1: the reminder ticker plus the stand-up phase machine.
    /// Alerts flagged `take_focus` switch the shown workout, which stops
    /// and resets the previous workout's timer.
    pub fn tick<R: Rng>(&mut self, now: NaiveDateTime, rng: &mut R) -> Vec<Event> {
        let inactive = self.config.inactive_categories();
        let ctx = TickContext {
            db: &self.db,
            inactive_categories: &inactive,
            viewed: self.current.as_deref(),
        };
        let mut events = self.scheduler.tick(now, &ctx);

        let focus = events.iter().rev().find_map(|event| match event {
            Event::WorkoutDue {
                workout_id,
                take_focus: true,
                ..
            }
            | Event::WorkoutReminder {
                workout_id,
                take_focus: true,
                ..
            } => Some(workout_id.clone()),
            _ => None,
        });
        if let Some(id) = focus {
            self.select_workout(Some(&id), now);
        }

        let before = self.standup.state().clone();
        let standup_event = self.standup.tick(now, rng);
        if *self.standup.state() != before {
            self.standup.save_best_effort(&self.db);
        }
        events.extend(standup_event);
        events
    }

    /// Poller #2: the countdown tick for the selected workout's timer.
    pub fn tick_timer(&mut self, now: NaiveDateTime) -> Option<Event> {
        self.timers.tick(now)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Show a workout (or none). Always stops and resets the previously
    /// active timer and installs the new workout's timer definitions.
    pub fn select_workout(&mut self, workout_id: Option<&str>, now: NaiveDateTime) {
        let _ = self.timers.stop_active(now);
        match workout_id.and_then(|id| self.scheduler.get(id)) {
            Some(workout) => {
                let defs = workout.timers.clone();
                self.current = Some(workout.id.clone());
                self.timers.load(&defs);
            }
            None => {
                self.current = None;
                self.timers.load(&[]);
            }
        }
    }

    /// Complete a workout; repeating workouts reschedule instead.
    /// Completing the shown workout returns to the overview, which stops
    /// the countdown.
    pub fn complete(&mut self, workout_id: &str, now: NaiveDateTime) -> Option<Event> {
        let event = self.scheduler.complete(workout_id, now, &self.db)?;
        if self.current.as_deref() == Some(workout_id) {
            self.select_workout(None, now);
        }
        Some(event)
    }

    /// Validate, register and persist a new workout definition.
    pub fn add_workout(&mut self, workout: Workout, now: NaiveDateTime) -> Result<(), CoreError> {
        workout.validate()?;
        self.scheduler.add(workout, now, &self.db);
        workouts::save_best_effort(&self.db, &self.scheduler.snapshot_workouts());
        Ok(())
    }

    pub fn start_timer(&mut self, timer_id: &str, now: NaiveDateTime) -> Option<Event> {
        self.timers.start(timer_id, now)
    }

    pub fn stop_timer(&mut self, timer_id: &str, reset: bool, now: NaiveDateTime) -> Option<Event> {
        self.timers.stop(timer_id, reset, now)
    }

    pub fn set_active_timer(&mut self, timer_id: &str) -> bool {
        self.timers.set_active(timer_id)
    }

    /// Flip the stand-up reminder and persist the config.
    pub fn set_standup_enabled(&mut self, enabled: bool) -> Result<(), CoreError> {
        self.config.standup.enabled = enabled;
        self.standup.set_config(self.config.standup.clone());
        self.config.save()?;
        Ok(())
    }
}
