//! Service slot model.
//!
//! A slot is one service instance at a specific date and time that must
//! be staffed with a bounded number of ministers. Slots are computed
//! fresh by the calendar resolver for every generation run and never
//! persisted by this crate.
//!
//! # Identity
//! A slot is uniquely identified by `(date, time)`. A day may carry
//! several slots at different times, never two at the same time.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Minimum and maximum staffing for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingLevel {
    /// Fewest ministers that make the slot fully staffed.
    pub min: u32,
    /// Most ministers that may be assigned.
    pub max: u32,
}

impl StaffingLevel {
    /// Creates a staffing level.
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Classification of a service slot.
///
/// The kind decides which availability field the eligibility filter
/// consults and which staffing entry applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    /// Recurring Monday–Friday mass.
    Weekday,
    /// Recurring Sunday mass (availability is date-exact).
    Sunday,
    /// Healing service on the first Thursday of the month.
    FirstThursday,
    /// Sacred Heart devotion on the first Friday of the month.
    FirstFriday,
    /// Immaculate Heart devotion on the first Saturday of the month.
    FirstSaturday,
    /// Evening mass inside the annual festival block.
    Festival,
    /// Mass on the festival block's final (feast) day.
    FestivalFeast,
    /// Fixed-date special event, independent of the weekly pattern.
    Fixed,
}

/// One service instance needing staffing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Calendar date of the service.
    pub date: NaiveDate,
    /// Time of day.
    pub time: NaiveTime,
    /// Slot classification.
    pub kind: SlotKind,
    /// Required staffing bounds.
    pub staffing: StaffingLevel,
    /// Named-event key consulted by the eligibility filter.
    /// `None` for weekday and Sunday slots.
    pub event: Option<String>,
    /// Display label (e.g. "Missa da Novena").
    pub label: String,
}

impl Slot {
    /// Creates a slot with no event key and an empty label.
    pub fn new(date: NaiveDate, time: NaiveTime, kind: SlotKind, staffing: StaffingLevel) -> Self {
        Self {
            date,
            time,
            kind,
            staffing,
            event: None,
            label: String::new(),
        }
    }

    /// Sets the named-event key.
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Stable identifier in `YYYY-MM-DD_HH:MM` form.
    pub fn id(&self) -> String {
        format!("{}_{}", self.date.format("%Y-%m-%d"), self.time.format("%H:%M"))
    }

    /// Weekday of this slot's date.
    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Sort key for chronological ordering.
    #[inline]
    pub fn ordinal(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.time)
    }
}
