//! Structural validation of generation inputs.
//!
//! Checks configuration and roster integrity before a run starts:
//! - Staffing bounds (`min <= max`, non-zero capacity)
//! - Duplicate weekly pattern entries (two slots at the same
//!   weekday/time)
//! - Festival block sanity (valid month, ordered day range, usable
//!   feast slot set)
//! - Fixed-date events that name impossible dates
//! - Duplicate minister ids
//!
//! Structural problems are fatal for the run: guessing a staffing
//! minimum or silently dropping a duplicate would corrupt the quality
//! report. Malformed *availability submissions* are not validated here;
//! the normalizer fails soft on those.

use std::collections::HashSet;

use crate::calendar::{CalendarConfig, StaffingConfig};
use crate::models::Minister;

/// Validation outcome: `Ok(())` or every detected issue.
pub type ValidationResult = Result<(), Vec<ConfigError>>;

/// A structural configuration error.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Error category.
    pub kind: ConfigErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of structural errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// A staffing entry has `min > max` or `max == 0`.
    InvalidStaffing,
    /// Two weekly pattern entries share a weekday and time.
    DuplicateWeeklySlot,
    /// The festival block's month or day range is unusable.
    InvalidFestivalRange,
    /// A fixed-date event names a date that cannot exist.
    InvalidFixedDate,
    /// Two ministers share an id.
    DuplicateMinisterId,
}

impl ConfigError {
    pub(crate) fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Validates the calendar pattern and staffing table.
///
/// Returns every detected issue so the caller can report all of them at
/// once rather than fixing one per run.
pub fn validate_config(calendar: &CalendarConfig, staffing: &StaffingConfig) -> ValidationResult {
    let mut errors = Vec::new();

    for (kind, time, level) in staffing.entries() {
        if level.min > level.max {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidStaffing,
                match time {
                    Some(t) => format!(
                        "staffing for {kind:?} at {t} has min {} > max {}",
                        level.min, level.max
                    ),
                    None => format!(
                        "staffing for {kind:?} has min {} > max {}",
                        level.min, level.max
                    ),
                },
            ));
        }
        if level.max == 0 {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidStaffing,
                format!("staffing for {kind:?} allows zero ministers"),
            ));
        }
    }

    let mut seen = HashSet::new();
    for entry in &calendar.weekly {
        if !seen.insert((entry.weekday, entry.time)) {
            errors.push(ConfigError::new(
                ConfigErrorKind::DuplicateWeeklySlot,
                format!(
                    "weekly pattern lists {:?} {} more than once",
                    entry.weekday, entry.time
                ),
            ));
        }
    }

    if let Some(festival) = &calendar.festival {
        if !(1..=12).contains(&festival.month) {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidFestivalRange,
                format!("festival month {} is out of range", festival.month),
            ));
        }
        if festival.first_day > festival.last_day {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidFestivalRange,
                format!(
                    "festival runs {}..{} backwards",
                    festival.first_day, festival.last_day
                ),
            ));
        }
        if festival.first_day == 0 || festival.last_day > 31 {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidFestivalRange,
                format!(
                    "festival day range {}..{} is not a valid span of month days",
                    festival.first_day, festival.last_day
                ),
            ));
        }
        if festival.feast_times.is_empty() {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidFestivalRange,
                "festival feast day has no mass times",
            ));
        }
    }

    for event in &calendar.fixed_events {
        // Year 2000 is a leap year, so Feb 29 observances stay legal.
        if chrono::NaiveDate::from_ymd_opt(2000, event.month, event.day).is_none() {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidFixedDate,
                format!(
                    "fixed event '{}' names impossible date {:02}-{:02}",
                    event.event, event.month, event.day
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the minister roster (duplicate ids).
pub fn validate_roster(roster: &[Minister]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for minister in roster {
        if !seen.insert(minister.id.as_str()) {
            errors.push(ConfigError::new(
                ConfigErrorKind::DuplicateMinisterId,
                format!("duplicate minister id: {}", minister.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{FixedEventSpec, StaffingConfig};
    use crate::models::{Minister, SlotKind};
    use chrono::{NaiveTime, Weekday};

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_default_parish_config_is_valid() {
        let calendar = CalendarConfig::default_parish();
        let staffing = StaffingConfig::default_parish();
        assert!(validate_config(&calendar, &staffing).is_ok());
    }

    #[test]
    fn test_inverted_staffing_rejected() {
        let calendar = CalendarConfig::default_parish();
        let staffing = StaffingConfig::new().with_kind(SlotKind::Weekday, 8, 5);

        let errors = validate_config(&calendar, &staffing).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ConfigErrorKind::InvalidStaffing));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let calendar = CalendarConfig::default_parish();
        let staffing = StaffingConfig::new().with_kind(SlotKind::Weekday, 0, 0);

        let errors = validate_config(&calendar, &staffing).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ConfigErrorKind::InvalidStaffing));
    }

    #[test]
    fn test_duplicate_weekly_entry_rejected() {
        let mut calendar = CalendarConfig::default_parish();
        calendar.weekly.push(crate::calendar::WeeklySlot {
            weekday: Weekday::Sun,
            time: time(8, 0),
            label: "duplicate".into(),
        });

        let errors = validate_config(&calendar, &StaffingConfig::default_parish()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ConfigErrorKind::DuplicateWeeklySlot));
    }

    #[test]
    fn test_backwards_festival_rejected() {
        let mut calendar = CalendarConfig::default_parish();
        if let Some(festival) = calendar.festival.as_mut() {
            festival.first_day = 28;
            festival.last_day = 20;
        }

        let errors = validate_config(&calendar, &StaffingConfig::default_parish()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ConfigErrorKind::InvalidFestivalRange));
    }

    #[test]
    fn test_impossible_fixed_date_rejected() {
        let mut calendar = CalendarConfig::default_parish();
        calendar.fixed_events.push(FixedEventSpec {
            month: 2,
            day: 30,
            time: time(19, 0),
            event: "impossible".into(),
            label: "Impossible".into(),
        });

        let errors = validate_config(&calendar, &StaffingConfig::default_parish()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ConfigErrorKind::InvalidFixedDate));
    }

    #[test]
    fn test_duplicate_minister_id_rejected() {
        let roster = vec![
            Minister::new("m1", "Maria"),
            Minister::new("m2", "João"),
            Minister::new("m1", "Maria again"),
        ];

        let errors = validate_roster(&roster).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ConfigErrorKind::DuplicateMinisterId);
    }

    #[test]
    fn test_valid_roster() {
        let roster = vec![Minister::new("m1", "A"), Minister::new("m2", "B")];
        assert!(validate_roster(&roster).is_ok());
    }
}
