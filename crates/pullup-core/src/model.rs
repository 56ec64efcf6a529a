//! Persisted workout model.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::clock::{self, DayCode};
use crate::error::ValidationError;

pub const MAX_REPEAT_INTERVAL_MINUTES: u32 = 1440;

/// A named rest countdown attached to a workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerDef {
    pub id: String,
    pub name: String,
    /// Countdown length in seconds, at least 1.
    pub duration_secs: u32,
    /// Repeating timers restart from full when they hit zero.
    #[serde(default)]
    pub repeating: bool,
}

/// A workout definition as persisted in the `workouts` blob.
///
/// Runtime state (due instant, alert de-bounce, completion) is derived by
/// the scheduler and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub title: String,
    /// References an `ExerciseCategory` id in the settings.
    #[serde(default)]
    pub category: Option<String>,
    /// "HH:MM" local wall clock. Ignored when `repeating`.
    #[serde(default)]
    pub time: String,
    /// Active weekdays. Empty means every day.
    #[serde(default)]
    pub days: Vec<DayCode>,
    /// Rolling-interval workout instead of a fixed daily time.
    #[serde(default)]
    pub repeating: bool,
    #[serde(default = "default_repeat_interval")]
    pub repeat_interval_minutes: u32,
    /// Ordered exercise template lines, see [`crate::template`].
    #[serde(default)]
    pub exercises: Vec<String>,
    #[serde(default)]
    pub timers: Vec<TimerDef>,
}

fn default_repeat_interval() -> u32 {
    60
}

impl Workout {
    pub fn runs_on(&self, weekday: Weekday) -> bool {
        self.days.is_empty() || self.days.iter().any(|d| d.matches(weekday))
    }

    /// Parsed fixed time of day. Meaningless for repeating workouts.
    pub fn due_time(&self) -> Result<NaiveTime, ValidationError> {
        clock::parse_time_of_day(&self.time)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.repeating {
            if !(1..=MAX_REPEAT_INTERVAL_MINUTES).contains(&self.repeat_interval_minutes) {
                return Err(ValidationError::IntervalOutOfRange {
                    minutes: self.repeat_interval_minutes,
                });
            }
        } else {
            self.due_time()?;
        }
        for timer in &self.timers {
            if timer.duration_secs == 0 {
                return Err(ValidationError::InvalidValue {
                    field: "timers".to_string(),
                    message: format!("timer '{}' has zero duration", timer.name),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(id: &str, time: &str) -> Workout {
        Workout {
            id: id.to_string(),
            title: format!("Workout {id}"),
            category: None,
            time: time.to_string(),
            days: Vec::new(),
            repeating: false,
            repeat_interval_minutes: 60,
            exercises: Vec::new(),
            timers: Vec::new(),
        }
    }

    #[test]
    fn empty_days_means_all_days() {
        let w = fixed("a", "09:00");
        assert!(w.runs_on(Weekday::Mon));
        assert!(w.runs_on(Weekday::Sun));
    }

    #[test]
    fn day_restriction_applies() {
        let mut w = fixed("a", "09:00");
        w.days = vec![DayCode::Tue, DayCode::Thu];
        assert!(w.runs_on(Weekday::Tue));
        assert!(!w.runs_on(Weekday::Wed));
    }

    #[test]
    fn validates_fixed_time() {
        assert!(fixed("a", "09:00").validate().is_ok());
        assert!(matches!(
            fixed("a", "midnight").validate(),
            Err(ValidationError::InvalidTimeOfDay(_))
        ));
    }

    #[test]
    fn validates_repeat_interval_range() {
        let mut w = fixed("a", "");
        w.repeating = true;
        for minutes in [1, 90, 1440] {
            w.repeat_interval_minutes = minutes;
            assert!(w.validate().is_ok());
        }
        for minutes in [0, 1441] {
            w.repeat_interval_minutes = minutes;
            assert!(matches!(
                w.validate(),
                Err(ValidationError::IntervalOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn rejects_zero_duration_timer() {
        let mut w = fixed("a", "09:00");
        w.timers = vec![TimerDef {
            id: "t".to_string(),
            name: "Rest".to_string(),
            duration_secs: 0,
            repeating: false,
        }];
        assert!(w.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let w: Workout =
            serde_json::from_str(r#"{"id":"w1","title":"Pullups","time":"07:00"}"#).unwrap();
        assert!(w.days.is_empty());
        assert!(!w.repeating);
        assert_eq!(w.repeat_interval_minutes, 60);
        assert!(w.timers.is_empty());
        assert!(w.validate().is_ok());
    }
}
