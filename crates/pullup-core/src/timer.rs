//! Rest countdown timers.
//!
//! Tick-grained: each [`TimerEngine::tick`] subtracts one second from the
//! single running timer. Unlike the reminder scheduler there is no
//! wall-clock catch-up; a suspended session just pauses the countdown,
//! which is the desired behavior for a rest interval.
//!
//! At most one timer runs at a time. Starting or activating another timer
//! stops and resets the previous one.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::model::TimerDef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRuntime {
    pub remaining_secs: u32,
    pub running: bool,
}

/// Countdown state machine for the currently selected workout's timers.
#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    defs: Vec<TimerDef>,
    runtime: HashMap<String, TimerRuntime>,
    active: Option<String>,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a workout's timers: everything idle at full duration.
    pub fn load(&mut self, defs: &[TimerDef]) {
        self.defs = defs.to_vec();
        self.runtime = defs
            .iter()
            .map(|d| {
                (
                    d.id.clone(),
                    TimerRuntime {
                        remaining_secs: d.duration_secs,
                        running: false,
                    },
                )
            })
            .collect();
        self.active = None;
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn defs(&self) -> &[TimerDef] {
        &self.defs
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn runtime(&self, timer_id: &str) -> Option<TimerRuntime> {
        self.runtime.get(timer_id).copied()
    }

    fn duration_of(&self, timer_id: &str) -> Option<u32> {
        self.defs
            .iter()
            .find(|d| d.id == timer_id)
            .map(|d| d.duration_secs)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a timer from full duration, stopping and resetting whichever
    /// timer was active before. Returns None for an unknown id.
    pub fn start(&mut self, timer_id: &str, now: NaiveDateTime) -> Option<Event> {
        let def = self.defs.iter().find(|d| d.id == timer_id)?.clone();
        if let Some(previous) = self.active.take() {
            if previous != timer_id {
                self.reset(&previous);
            }
        }
        self.active = Some(timer_id.to_string());
        let rt = self.runtime.get_mut(timer_id)?;
        rt.remaining_secs = def.duration_secs;
        rt.running = true;
        Some(Event::TimerStarted {
            timer_id: def.id,
            name: def.name,
            duration_secs: def.duration_secs,
            at: now,
        })
    }

    /// Stop a timer, optionally resetting it to full duration. Returns
    /// None when there was nothing to do.
    pub fn stop(&mut self, timer_id: &str, reset: bool, now: NaiveDateTime) -> Option<Event> {
        let was_running = self.runtime.get(timer_id)?.running;
        if let Some(rt) = self.runtime.get_mut(timer_id) {
            rt.running = false;
        }
        if reset {
            self.reset(timer_id);
        }
        if !was_running && !reset {
            return None;
        }
        let remaining = self.runtime.get(timer_id)?.remaining_secs;
        Some(Event::TimerStopped {
            timer_id: timer_id.to_string(),
            remaining_secs: remaining,
            at: now,
        })
    }

    /// Stop and reset the active timer, if any.
    pub fn stop_active(&mut self, now: NaiveDateTime) -> Option<Event> {
        let id = self.active.clone()?;
        self.stop(&id, true, now)
    }

    /// Switch the active timer without starting it. The previous active
    /// timer is stopped and reset. Returns false for an unknown id.
    pub fn set_active(&mut self, timer_id: &str) -> bool {
        if !self.runtime.contains_key(timer_id) {
            return false;
        }
        if self.active.as_deref() == Some(timer_id) {
            return true;
        }
        if let Some(previous) = self.active.take() {
            self.reset(&previous);
        }
        self.active = Some(timer_id.to_string());
        true
    }

    /// One-second countdown tick for the running timer.
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<Event> {
        let id = self.active.clone()?;
        let def = self.defs.iter().find(|d| d.id == id)?.clone();
        let rt = self.runtime.get_mut(&id)?;
        if !rt.running {
            return None;
        }
        rt.remaining_secs = rt.remaining_secs.saturating_sub(1);
        if rt.remaining_secs > 0 {
            return None;
        }
        rt.remaining_secs = def.duration_secs;
        if !def.repeating {
            rt.running = false;
        }
        Some(Event::TimerFinished {
            timer_id: id,
            name: def.name,
            restarted: def.repeating,
            at: now,
        })
    }

    fn reset(&mut self, timer_id: &str) {
        let Some(duration) = self.duration_of(timer_id) else {
            return;
        };
        if let Some(rt) = self.runtime.get_mut(timer_id) {
            rt.running = false;
            rt.remaining_secs = duration;
        }
    }
}
