//! Stand-up reminder.
//!
//! Independent of workouts: alternates sitting and standing phases of
//! randomized length and alerts on every flip. Phase state is persisted
//! best-effort so a restarted session resumes mid-cycle instead of
//! starting over.

use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::events::Event;
use crate::storage::{Database, StandupConfig};

pub const STANDUP_STATE_KEY: &str = "standup_state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StandPhase {
    Idle,
    Sitting,
    Standing,
}

/// Persisted phase state (`standup_state` blob).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandupState {
    pub phase: StandPhase,
    pub target_at: Option<NaiveDateTime>,
}

impl Default for StandupState {
    fn default() -> Self {
        Self {
            phase: StandPhase::Idle,
            target_at: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StandupTimer {
    config: StandupConfig,
    state: StandupState,
}

impl StandupTimer {
    pub fn new(config: StandupConfig) -> Self {
        Self {
            config,
            state: StandupState::default(),
        }
    }

    pub fn with_state(config: StandupConfig, state: StandupState) -> Self {
        Self { config, state }
    }

    /// Restore the persisted phase state, best-effort.
    pub fn load(config: StandupConfig, db: &Database) -> Self {
        let state = match db.blob_get::<StandupState>(STANDUP_STATE_KEY) {
            Ok(Some(state)) => state,
            Ok(None) => StandupState::default(),
            Err(e) => {
                warn!("stand-up state read failed, starting idle: {e}");
                StandupState::default()
            }
        };
        Self { config, state }
    }

    pub fn save_best_effort(&self, db: &Database) {
        if let Err(e) = db.blob_set(STANDUP_STATE_KEY, &self.state) {
            warn!("stand-up state write failed: {e}");
        }
    }

    pub fn state(&self) -> &StandupState {
        &self.state
    }

    pub fn config(&self) -> &StandupConfig {
        &self.config
    }

    /// Applies on the next tick; disabling resets the cycle there.
    pub fn set_config(&mut self, config: StandupConfig) {
        self.config = config;
    }

    /// One pass of the stand-up poller. Emits an event exactly when the
    /// phase flips; entering the initial sitting phase is silent.
    pub fn tick<R: Rng>(&mut self, now: NaiveDateTime, rng: &mut R) -> Option<Event> {
        if !self.config.enabled {
            if self.state.phase != StandPhase::Idle {
                self.state = StandupState::default();
            }
            return None;
        }
        match (self.state.phase, self.state.target_at) {
            (StandPhase::Idle, _) => {
                self.state = StandupState {
                    phase: StandPhase::Sitting,
                    target_at: Some(now + self.draw_sit(rng)),
                };
                None
            }
            (phase, Some(target)) if now >= target => {
                let (next, span) = match phase {
                    StandPhase::Sitting => (StandPhase::Standing, self.draw_stand(rng)),
                    _ => (StandPhase::Sitting, self.draw_sit(rng)),
                };
                let until = now + span;
                self.state = StandupState {
                    phase: next,
                    target_at: Some(until),
                };
                Some(Event::StandupPhaseChanged {
                    phase: next,
                    until,
                    at: now,
                })
            }
            // Phase without a deadline (corrupt or legacy state): repair
            // by restarting the current phase.
            (phase, None) => {
                let span = match phase {
                    StandPhase::Standing => self.draw_stand(rng),
                    _ => self.draw_sit(rng),
                };
                self.state.target_at = Some(now + span);
                None
            }
            _ => None,
        }
    }

    fn draw_sit<R: Rng>(&self, rng: &mut R) -> Duration {
        draw_minutes(rng, self.config.sit_min_minutes, self.config.sit_max_minutes)
    }

    fn draw_stand<R: Rng>(&self, rng: &mut R) -> Duration {
        draw_minutes(
            rng,
            self.config.stand_min_minutes,
            self.config.stand_max_minutes,
        )
    }
}

/// Uniform draw from `min..=max` minutes, clamping degenerate ranges.
fn draw_minutes<R: Rng>(rng: &mut R, min: u32, max: u32) -> Duration {
    let lo = min.max(1);
    let hi = max.max(lo);
    Duration::minutes(i64::from(rng.gen_range(lo..=hi)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn config(enabled: bool) -> StandupConfig {
        StandupConfig {
            enabled,
            sit_min_minutes: 30,
            sit_max_minutes: 30,
            stand_min_minutes: 5,
            stand_max_minutes: 5,
        }
    }

    #[test]
    fn disabled_timer_stays_idle() {
        let mut t = StandupTimer::new(config(false));
        let mut rng = Pcg64::seed_from_u64(7);
        assert!(t.tick(at(9, 0), &mut rng).is_none());
        assert_eq!(t.state().phase, StandPhase::Idle);
    }

    #[test]
    fn enters_sitting_silently_then_alerts_on_flip() {
        let mut t = StandupTimer::new(config(true));
        let mut rng = Pcg64::seed_from_u64(7);

        assert!(t.tick(at(9, 0), &mut rng).is_none());
        assert_eq!(t.state().phase, StandPhase::Sitting);
        assert_eq!(t.state().target_at, Some(at(9, 30)));

        // Before the deadline: nothing.
        assert!(t.tick(at(9, 29), &mut rng).is_none());

        let ev = t.tick(at(9, 30), &mut rng).unwrap();
        match ev {
            Event::StandupPhaseChanged { phase, until, .. } => {
                assert_eq!(phase, StandPhase::Standing);
                assert_eq!(until, at(9, 35));
            }
            other => panic!("unexpected event {other:?}"),
        }

        // And back to sitting after the standing span.
        let ev = t.tick(at(9, 35), &mut rng).unwrap();
        assert!(matches!(
            ev,
            Event::StandupPhaseChanged {
                phase: StandPhase::Sitting,
                ..
            }
        ));
        assert_eq!(t.state().target_at, Some(at(10, 5)));
    }

    #[test]
    fn late_tick_still_flips_once() {
        let mut t = StandupTimer::new(config(true));
        let mut rng = Pcg64::seed_from_u64(1);
        t.tick(at(9, 0), &mut rng);
        // Tab suspended well past the deadline: one flip, rescheduled from now.
        let ev = t.tick(at(12, 0), &mut rng).unwrap();
        assert!(matches!(
            ev,
            Event::StandupPhaseChanged {
                phase: StandPhase::Standing,
                ..
            }
        ));
        assert_eq!(t.state().target_at, Some(at(12, 5)));
        assert!(t.tick(at(12, 1), &mut rng).is_none());
    }

    #[test]
    fn disabling_resets_cycle() {
        let mut t = StandupTimer::new(config(true));
        let mut rng = Pcg64::seed_from_u64(7);
        t.tick(at(9, 0), &mut rng);
        assert_eq!(t.state().phase, StandPhase::Sitting);

        t.set_config(config(false));
        assert!(t.tick(at(9, 1), &mut rng).is_none());
        assert_eq!(*t.state(), StandupState::default());
    }

    #[test]
    fn degenerate_range_is_clamped() {
        let mut cfg = config(true);
        cfg.sit_min_minutes = 40;
        cfg.sit_max_minutes = 10; // min > max
        let mut t = StandupTimer::new(cfg);
        let mut rng = Pcg64::seed_from_u64(7);
        t.tick(at(9, 0), &mut rng);
        assert_eq!(t.state().target_at, Some(at(9, 40)));
    }

    #[test]
    fn state_round_trips_through_storage() {
        let db = Database::open_memory().unwrap();
        let mut t = StandupTimer::load(config(true), &db);
        let mut rng = Pcg64::seed_from_u64(7);
        t.tick(at(9, 0), &mut rng);
        t.save_best_effort(&db);

        let restored = StandupTimer::load(config(true), &db);
        assert_eq!(restored.state(), t.state());
        assert_eq!(restored.state().phase, StandPhase::Sitting);
    }

    #[test]
    fn missing_deadline_is_repaired() {
        let state = StandupState {
            phase: StandPhase::Sitting,
            target_at: None,
        };
        let mut t = StandupTimer::with_state(config(true), state);
        let mut rng = Pcg64::seed_from_u64(7);
        assert!(t.tick(at(9, 0), &mut rng).is_none());
        assert_eq!(t.state().target_at, Some(at(9, 30)));
    }
}
