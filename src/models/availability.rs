//! Canonical availability model.
//!
//! Every raw questionnaire submission, whatever its schema generation,
//! is normalized into [`NormalizedAvailability`]: which weekdays a
//! minister can serve, which exact Sunday dates, and opt-in/opt-out
//! flags for named special events.
//!
//! # Explicit declines
//! An event flag of `false` is a recorded "no", distinct from an absent
//! entry (no answer). Both exclude the minister from the event's slots,
//! but only the explicit decline survives round-trips, so downstream
//! consumers can tell "declined" from "never asked".

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Well-known event keys emitted by the calendar resolver.
pub mod events {
    /// Healing service on the first Thursday.
    pub const HEALING_SERVICE: &str = "healing_service";
    /// Sacred Heart devotion on the first Friday.
    pub const FIRST_FRIDAY: &str = "first_friday";
    /// Immaculate Heart devotion on the first Saturday.
    pub const FIRST_SATURDAY: &str = "first_saturday";
    /// Evening masses of the festival block.
    pub const FESTIVAL_NOVENA: &str = "festival_novena";
    /// Masses on the festival block's final day.
    pub const FESTIVAL_FEAST: &str = "festival_feast";
}

/// Set of serviceable weekdays (Monday through Friday).
///
/// Saturday and Sunday are never members; Sunday availability is
/// date-exact and Saturday services are covered by event flags or the
/// weekly pattern's own staffing rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdaySet([bool; 5]);

impl WeekdaySet {
    /// Empty set: no weekday service.
    pub fn none() -> Self {
        Self::default()
    }

    /// All of Monday through Friday.
    pub fn all() -> Self {
        Self([true; 5])
    }

    /// Builds a set from the given days; Saturday/Sunday are ignored.
    pub fn from_days(days: &[Weekday]) -> Self {
        let mut set = Self::none();
        for &day in days {
            set.insert(day);
        }
        set
    }

    /// Adds a weekday. Saturday/Sunday are ignored.
    pub fn insert(&mut self, day: Weekday) {
        if let Some(i) = Self::index(day) {
            self.0[i] = true;
        }
    }

    /// Whether the set contains `day`. Always `false` for Sat/Sun.
    pub fn contains(&self, day: Weekday) -> bool {
        Self::index(day).map(|i| self.0[i]).unwrap_or(false)
    }

    /// Whether no weekday is serviceable.
    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|&b| b)
    }

    /// Member weekdays in Monday-first order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        const DAYS: [Weekday; 5] = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ];
        DAYS.into_iter().filter(|&d| self.contains(d))
    }

    fn index(day: Weekday) -> Option<usize> {
        let i = day.num_days_from_monday() as usize;
        (i < 5).then_some(i)
    }
}

/// Canonical per-minister availability.
///
/// Unknown fields are rejected on deserialization so the canonical
/// shape stays distinguishable from raw submission schemas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizedAvailability {
    /// Weekdays the minister can serve.
    pub weekdays: WeekdaySet,
    /// Exact Sunday dates the minister can serve. A minister may be
    /// available some Sundays of a month and not others.
    pub sundays: BTreeSet<NaiveDate>,
    /// Named-event opt-ins. `false` is an explicit decline.
    pub events: BTreeMap<String, bool>,
    /// Whether the minister volunteered for substitute duty.
    pub can_substitute: bool,
}

impl NormalizedAvailability {
    /// The fail-soft value: no availability at all.
    ///
    /// Used for missing, null, or unparseable submissions; the minister
    /// is simply never eligible.
    pub fn none() -> Self {
        Self::default()
    }

    /// Adds a serviceable weekday.
    pub fn with_weekday(mut self, day: Weekday) -> Self {
        self.weekdays.insert(day);
        self
    }

    /// Adds a serviceable Sunday date.
    pub fn with_sunday(mut self, date: NaiveDate) -> Self {
        self.sundays.insert(date);
        self
    }

    /// Records an event opt-in or explicit decline.
    pub fn with_event(mut self, event: impl Into<String>, available: bool) -> Self {
        self.events.insert(event.into(), available);
        self
    }

    /// Marks the minister as a substitute candidate.
    pub fn with_substitute(mut self, can_substitute: bool) -> Self {
        self.can_substitute = can_substitute;
        self
    }

    /// Whether the minister opted in to the named event.
    ///
    /// Absent entries and explicit declines both answer `false`.
    pub fn allows_event(&self, event: &str) -> bool {
        self.events.get(event).copied().unwrap_or(false)
    }

    /// Whether this record grants no availability of any kind.
    pub fn is_empty(&self) -> bool {
        self.weekdays.is_empty()
            && self.sundays.is_empty()
            && !self.events.values().any(|&v| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_set_membership() {
        let set = WeekdaySet::from_days(&[Weekday::Mon, Weekday::Wed]);
        assert!(set.contains(Weekday::Mon));
        assert!(!set.contains(Weekday::Tue));
        assert!(set.contains(Weekday::Wed));
        assert!(!set.is_empty());
    }

    #[test]
    fn test_weekday_set_ignores_weekend() {
        let set = WeekdaySet::from_days(&[Weekday::Sat, Weekday::Sun]);
        assert!(set.is_empty());
        assert!(!set.contains(Weekday::Sat));
        assert!(!set.contains(Weekday::Sun));
    }

    #[test]
    fn test_weekday_set_iter_order() {
        let set = WeekdaySet::from_days(&[Weekday::Fri, Weekday::Mon]);
        let days: Vec<Weekday> = set.iter().collect();
        assert_eq!(days, vec![Weekday::Mon, Weekday::Fri]);
    }

    #[test]
    fn test_event_flags_distinguish_decline_from_absent() {
        let avail = NormalizedAvailability::none()
            .with_event(events::FIRST_FRIDAY, false)
            .with_event(events::HEALING_SERVICE, true);

        assert!(avail.allows_event(events::HEALING_SERVICE));
        assert!(!avail.allows_event(events::FIRST_FRIDAY));
        // Never asked about the festival: same answer, different record.
        assert!(!avail.allows_event(events::FESTIVAL_NOVENA));
        assert_eq!(avail.events.get(events::FIRST_FRIDAY), Some(&false));
        assert_eq!(avail.events.get(events::FESTIVAL_NOVENA), None);
    }

    #[test]
    fn test_is_empty_considers_positive_flags_only() {
        let declined = NormalizedAvailability::none().with_event(events::FIRST_FRIDAY, false);
        assert!(declined.is_empty());

        let opted_in = NormalizedAvailability::none().with_event(events::FIRST_FRIDAY, true);
        assert!(!opted_in.is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let avail = NormalizedAvailability::none()
            .with_weekday(Weekday::Tue)
            .with_sunday(NaiveDate::from_ymd_opt(2025, 10, 12).unwrap())
            .with_event(events::FESTIVAL_NOVENA, true)
            .with_substitute(true);

        let json = serde_json::to_value(&avail).unwrap();
        let back: NormalizedAvailability = serde_json::from_value(json).unwrap();
        assert_eq!(back, avail);
    }
}
