//! Local wall-clock helpers.
//!
//! All scheduling math runs on `NaiveDateTime` in local wall-clock terms:
//! a workout at "09:00" fires when the wall clock reads 09:00, whatever the
//! zone. Callers inject `now`, which keeps every temporal property testable
//! without sleeping.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Calendar-day key used by the completion map, `YYYY-MM-DD`.
pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Strict `HH:MM` 24h parse.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidTimeOfDay(s.to_string());
    let (h, m) = s.split_once(':').ok_or_else(invalid)?;
    let hour: u32 = h.parse().map_err(|_| invalid())?;
    let minute: u32 = m.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// The instant a fixed-time workout becomes actionable on `day`.
pub fn due_instant(day: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    day.and_time(time)
}

pub fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// Weekday code as persisted in workout definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayCode {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayCode {
    pub const ALL: [DayCode; 7] = [
        DayCode::Mon,
        DayCode::Tue,
        DayCode::Wed,
        DayCode::Thu,
        DayCode::Fri,
        DayCode::Sat,
        DayCode::Sun,
    ];

    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayCode::Mon,
            Weekday::Tue => DayCode::Tue,
            Weekday::Wed => DayCode::Wed,
            Weekday::Thu => DayCode::Thu,
            Weekday::Fri => DayCode::Fri,
            Weekday::Sat => DayCode::Sat,
            Weekday::Sun => DayCode::Sun,
        }
    }

    pub fn matches(self, weekday: Weekday) -> bool {
        Self::from_weekday(weekday) == self
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayCode::Mon => "Mon",
            DayCode::Tue => "Tue",
            DayCode::Wed => "Wed",
            DayCode::Thu => "Thu",
            DayCode::Fri => "Fri",
            DayCode::Sat => "Sat",
            DayCode::Sun => "Sun",
        }
    }
}

impl fmt::Display for DayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mon" => Ok(DayCode::Mon),
            "tue" => Ok(DayCode::Tue),
            "wed" => Ok(DayCode::Wed),
            "thu" => Ok(DayCode::Thu),
            "fri" => Ok(DayCode::Fri),
            "sat" => Ok(DayCode::Sat),
            "sun" => Ok(DayCode::Sun),
            _ => Err(ValidationError::InvalidValue {
                field: "days".to_string(),
                message: format!("unknown day code '{s}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_key_is_iso_date() {
        assert_eq!(day_key(date(2026, 3, 7)), "2026-03-07");
    }

    #[test]
    fn parses_valid_times() {
        assert_eq!(
            parse_time_of_day("09:00").unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("23:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["", "9", "24:00", "12:60", "09:00:00", "ab:cd", " 9:00"] {
            assert!(parse_time_of_day(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn day_code_round_trips_weekdays() {
        assert!(DayCode::Sat.matches(Weekday::Sat));
        assert!(!DayCode::Sat.matches(Weekday::Sun));
        assert_eq!("wed".parse::<DayCode>().unwrap(), DayCode::Wed);
        assert!("xyz".parse::<DayCode>().is_err());
    }

    #[test]
    fn due_instant_combines_day_and_time() {
        let due = due_instant(date(2026, 3, 7), parse_time_of_day("07:30").unwrap());
        assert_eq!(due.to_string(), "2026-03-07 07:30:00");
        assert!(start_of_day(date(2026, 3, 7)) < due);
    }
}
