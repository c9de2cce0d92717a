//! Calendar resolution: which slots must be staffed in a month.
//!
//! `resolve_slots` is a pure function of `(config, year, month)`: it
//! enumerates every service slot of the month by evaluating an ordered
//! rule list per date. Precedence between layers is the order of the
//! list itself:
//!
//! weekly pattern < first-weekday devotions < festival block < fixed dates
//!
//! Later rules replace or clear what earlier rules produced, so the
//! festival block wins over a devotion that falls inside it, and a
//! fixed-date observance wins over everything.
//!
//! Output is sorted by `(date, time)`. The order is load-bearing: the
//! assignment selector updates fairness counts sequentially, so slots
//! must be processed chronologically.

mod config;
mod rules;

pub use config::{
    CalendarConfig, DevotionSpec, FestivalConfig, FixedEventSpec, StaffingConfig,
    StaffingOverride, WeeklySlot,
};
pub use rules::{FestivalBlock, FirstWeekdayDevotion, FixedDates, WeeklyPattern};

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{RosterError, RosterResult};
use crate::models::Slot;

/// The slots planned for a single date while rules are being applied.
///
/// Insertion replaces any slot already at the same time, which is how
/// higher-precedence rules override lower ones without knowing about
/// them.
#[derive(Debug, Default)]
pub struct DayPlan {
    slots: Vec<Slot>,
}

impl DayPlan {
    /// Adds a slot, replacing any existing slot at the same time.
    pub fn insert(&mut self, slot: Slot) {
        self.slots.retain(|s| s.time != slot.time);
        self.slots.push(slot);
    }

    /// Discards everything planned so far for the date.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// The slots planned so far.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Consumes the plan.
    pub fn into_slots(self) -> Vec<Slot> {
        self.slots
    }
}

/// A calendar rule: inspects one date and edits that date's plan.
pub trait CalendarRule: fmt::Debug {
    /// Rule name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Applies the rule to `date`.
    ///
    /// Staffing lookups may fail (missing configuration), which aborts
    /// resolution — guessing a minimum would corrupt the run.
    fn apply(&self, date: NaiveDate, staffing: &StaffingConfig, day: &mut DayPlan) -> RosterResult<()>;
}

/// Builds the precedence-ordered rule list for a configuration.
pub fn rules_for(config: &CalendarConfig) -> Vec<Box<dyn CalendarRule>> {
    let mut list: Vec<Box<dyn CalendarRule>> = Vec::new();
    list.push(Box::new(WeeklyPattern::new(config.weekly.clone())));
    if let Some(spec) = &config.first_thursday {
        list.push(Box::new(FirstWeekdayDevotion::first_thursday(spec.clone())));
    }
    if let Some(spec) = &config.first_friday {
        list.push(Box::new(FirstWeekdayDevotion::first_friday(spec.clone())));
    }
    if let Some(spec) = &config.first_saturday {
        list.push(Box::new(FirstWeekdayDevotion::first_saturday(spec.clone())));
    }
    if let Some(festival) = &config.festival {
        list.push(Box::new(FestivalBlock::new(festival.clone())));
    }
    if !config.fixed_events.is_empty() {
        list.push(Box::new(FixedDates::new(config.fixed_events.clone())));
    }
    list
}

/// Enumerates every slot of `(year, month)`, sorted by `(date, time)`.
pub fn resolve_slots(
    calendar: &CalendarConfig,
    staffing: &StaffingConfig,
    year: i32,
    month: u32,
) -> RosterResult<Vec<Slot>> {
    if !(1..=12).contains(&month) {
        return Err(RosterError::InvalidMonth(month));
    }

    let rules = rules_for(calendar);
    let mut slots = Vec::new();

    for day in 1..=31 {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            break; // Ran past the end of the month.
        };
        let mut plan = DayPlan::default();
        for rule in &rules {
            rule.apply(date, staffing, &mut plan)?;
        }
        slots.extend(plan.into_slots());
    }

    slots.sort_by_key(|s| s.ordinal());
    Ok(slots)
}

/// First occurrence of `weekday` in the month, found by scanning
/// forward from day 1.
pub fn first_weekday_of(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    (1..=7)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .find(|d| d.weekday() == weekday)
}
