//! Built-in calendar rules.
//!
//! Each rule inspects one date and edits that date's [`DayPlan`]. The
//! resolver applies them in precedence order, so later rules see (and
//! may replace or clear) what earlier rules produced:
//!
//! 1. [`WeeklyPattern`] — the recurring timetable
//! 2. [`FirstWeekdayDevotion`] — first Thursday/Friday/Saturday
//! 3. [`FestivalBlock`] — the annual multi-day festival
//! 4. [`FixedDates`] — fixed-date solemnities
//!
//! Precedence lives in the rule list, not in conditionals inside the
//! rules, so it can be inspected and tested as data.

use chrono::{Datelike, NaiveDate, Weekday};

use super::config::{DevotionSpec, FestivalConfig, FixedEventSpec, StaffingConfig, WeeklySlot};
use super::{first_weekday_of, CalendarRule, DayPlan};
use crate::error::RosterResult;
use crate::models::{events, Slot, SlotKind};

/// Emits the recurring weekly masses for the date's weekday.
#[derive(Debug)]
pub struct WeeklyPattern {
    entries: Vec<WeeklySlot>,
}

impl WeeklyPattern {
    /// Creates the rule from the configured timetable.
    pub fn new(entries: Vec<WeeklySlot>) -> Self {
        Self { entries }
    }
}

impl CalendarRule for WeeklyPattern {
    fn name(&self) -> &'static str {
        "weekly-pattern"
    }

    fn apply(&self, date: NaiveDate, staffing: &StaffingConfig, day: &mut DayPlan) -> RosterResult<()> {
        for entry in self.entries.iter().filter(|e| e.weekday == date.weekday()) {
            let kind = if entry.weekday == Weekday::Sun {
                SlotKind::Sunday
            } else {
                SlotKind::Weekday
            };
            let level = staffing.level_for(kind, entry.time)?;
            day.insert(Slot::new(date, entry.time, kind, level).with_label(entry.label.clone()));
        }
        Ok(())
    }
}

/// Emits a devotion mass on the first occurrence of a weekday.
///
/// The first occurrence is found by scanning forward from day 1, never
/// by a fixed day number. A devotion at the same time as a weekly slot
/// replaces it; at a new time it supplements the day.
#[derive(Debug)]
pub struct FirstWeekdayDevotion {
    name: &'static str,
    weekday: Weekday,
    kind: SlotKind,
    event: &'static str,
    spec: DevotionSpec,
}

impl FirstWeekdayDevotion {
    /// Healing service on the first Thursday.
    pub fn first_thursday(spec: DevotionSpec) -> Self {
        Self {
            name: "first-thursday",
            weekday: Weekday::Thu,
            kind: SlotKind::FirstThursday,
            event: events::HEALING_SERVICE,
            spec,
        }
    }

    /// Sacred Heart devotion on the first Friday.
    pub fn first_friday(spec: DevotionSpec) -> Self {
        Self {
            name: "first-friday",
            weekday: Weekday::Fri,
            kind: SlotKind::FirstFriday,
            event: events::FIRST_FRIDAY,
            spec,
        }
    }

    /// Immaculate Heart devotion on the first Saturday.
    pub fn first_saturday(spec: DevotionSpec) -> Self {
        Self {
            name: "first-saturday",
            weekday: Weekday::Sat,
            kind: SlotKind::FirstSaturday,
            event: events::FIRST_SATURDAY,
            spec,
        }
    }
}

impl CalendarRule for FirstWeekdayDevotion {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, date: NaiveDate, staffing: &StaffingConfig, day: &mut DayPlan) -> RosterResult<()> {
        if first_weekday_of(date.year(), date.month(), self.weekday) != Some(date) {
            return Ok(());
        }
        let level = staffing.level_for(self.kind, self.spec.time)?;
        day.insert(
            Slot::new(date, self.spec.time, self.kind, level)
                .with_event(self.event)
                .with_label(self.spec.label.clone()),
        );
        Ok(())
    }
}

/// Replaces the normal pattern inside the festival block.
///
/// Monday–Friday block dates collapse to one evening mass, Saturdays to
/// one (earlier) evening mass; Sundays keep the regular Sunday pattern.
/// The final day is the feast: the whole day is replaced by the feast
/// slot set. Weekly and devotion slots on block dates are discarded.
#[derive(Debug)]
pub struct FestivalBlock {
    config: FestivalConfig,
}

impl FestivalBlock {
    /// Creates the rule from the festival configuration.
    pub fn new(config: FestivalConfig) -> Self {
        Self { config }
    }
}

impl CalendarRule for FestivalBlock {
    fn name(&self) -> &'static str {
        "festival-block"
    }

    fn apply(&self, date: NaiveDate, staffing: &StaffingConfig, day: &mut DayPlan) -> RosterResult<()> {
        let cfg = &self.config;
        if date.month() != cfg.month || !(cfg.first_day..=cfg.last_day).contains(&date.day()) {
            return Ok(());
        }

        if date.day() == cfg.last_day {
            day.clear();
            for &time in &cfg.feast_times {
                let level = staffing.level_for(SlotKind::FestivalFeast, time)?;
                day.insert(
                    Slot::new(date, time, SlotKind::FestivalFeast, level)
                        .with_event(events::FESTIVAL_FEAST)
                        .with_label(format!("Festa de {}", cfg.name)),
                );
            }
            return Ok(());
        }

        if date.weekday() == Weekday::Sun {
            return Ok(());
        }

        let time = if date.weekday() == Weekday::Sat {
            cfg.saturday_time
        } else {
            cfg.weekday_time
        };
        let level = staffing.level_for(SlotKind::Festival, time)?;
        day.clear();
        day.insert(
            Slot::new(date, time, SlotKind::Festival, level)
                .with_event(events::FESTIVAL_NOVENA)
                .with_label(format!("Novena de {}", cfg.name)),
        );
        Ok(())
    }
}

/// Appends fixed-date observances, independent of the weekly pattern.
///
/// Highest precedence: a fixed slot replaces whatever already occupies
/// its time, festival slots included.
#[derive(Debug)]
pub struct FixedDates {
    events: Vec<FixedEventSpec>,
}

impl FixedDates {
    /// Creates the rule from the configured observances.
    pub fn new(events: Vec<FixedEventSpec>) -> Self {
        Self { events }
    }
}

impl CalendarRule for FixedDates {
    fn name(&self) -> &'static str {
        "fixed-dates"
    }

    fn apply(&self, date: NaiveDate, staffing: &StaffingConfig, day: &mut DayPlan) -> RosterResult<()> {
        for spec in self
            .events
            .iter()
            .filter(|e| e.month == date.month() && e.day == date.day())
        {
            let level = staffing.level_for(SlotKind::Fixed, spec.time)?;
            day.insert(
                Slot::new(date, spec.time, SlotKind::Fixed, level)
                    .with_event(spec.event.clone())
                    .with_label(spec.label.clone()),
            );
        }
        Ok(())
    }
}
