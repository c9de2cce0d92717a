//! Calendar pattern and staffing configuration.
//!
//! Both structures are supplied by the caller (they are operational
//! data, not business logic baked into the engine). A preset matching a
//! typical parish timetable is available through the `default_parish`
//! constructors and doubles as the reference configuration in tests.

use std::collections::BTreeMap;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{RosterError, RosterResult};
use crate::models::{SlotKind, StaffingLevel};

/// One recurring weekly mass: a weekday/time pair.
///
/// The slot kind is derived from the weekday (Sunday vs. everything
/// else), so the pattern stays a plain timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySlot {
    /// Day of week the mass recurs on.
    pub weekday: Weekday,
    /// Time of day.
    pub time: NaiveTime,
    /// Display label.
    pub label: String,
}

/// A first-weekday devotion (first Thursday/Friday/Saturday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevotionSpec {
    /// Time of day. A devotion at the same time as a weekly slot
    /// replaces it; at a new time it supplements the day.
    pub time: NaiveTime,
    /// Display label.
    pub label: String,
}

/// The annual multi-day festival block.
///
/// Inside the block, Monday–Friday collapse to one evening mass and
/// Saturday to one (typically earlier) evening mass; Sundays keep the
/// regular Sunday pattern. The final day carries its own feast slot
/// set and replaces everything else on that date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FestivalConfig {
    /// Festival name, used in display labels.
    pub name: String,
    /// Month the block falls in (1-12).
    pub month: u32,
    /// First day of the block (inclusive).
    pub first_day: u32,
    /// Last day of the block (inclusive); the feast day.
    pub last_day: u32,
    /// Evening mass time on Monday–Friday block dates.
    pub weekday_time: NaiveTime,
    /// Evening mass time on Saturday block dates.
    pub saturday_time: NaiveTime,
    /// Mass times on the feast day, replacing the whole day.
    pub feast_times: Vec<NaiveTime>,
}

/// A fixed-date annual observance (e.g. a solemnity kept on its date
/// regardless of weekday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedEventSpec {
    /// Month of the observance (1-12).
    pub month: u32,
    /// Day of month.
    pub day: u32,
    /// Time of day.
    pub time: NaiveTime,
    /// Event key matched against minister event flags.
    pub event: String,
    /// Display label.
    pub label: String,
}

/// The full monthly calendar pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Recurring weekly masses.
    pub weekly: Vec<WeeklySlot>,
    /// Healing service on the first Thursday, if observed.
    pub first_thursday: Option<DevotionSpec>,
    /// Sacred Heart devotion on the first Friday, if observed.
    pub first_friday: Option<DevotionSpec>,
    /// Immaculate Heart devotion on the first Saturday, if observed.
    pub first_saturday: Option<DevotionSpec>,
    /// Annual festival block, if observed.
    pub festival: Option<FestivalConfig>,
    /// Fixed-date annual observances.
    pub fixed_events: Vec<FixedEventSpec>,
}

impl CalendarConfig {
    /// An empty pattern (no masses at all).
    pub fn empty() -> Self {
        Self {
            weekly: Vec::new(),
            first_thursday: None,
            first_friday: None,
            first_saturday: None,
            festival: None,
            fixed_events: Vec::new(),
        }
    }

    /// The reference parish timetable: three Sunday masses, a daily
    /// 06:30 mass Monday–Saturday, the three first-weekday devotions,
    /// the October festival block (Oct 20–28), and three fixed
    /// solemnities.
    pub fn default_parish() -> Self {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).expect("static time");
        Self {
            weekly: vec![
                WeeklySlot { weekday: Weekday::Sun, time: t(8, 0), label: "Missa das 8h".into() },
                WeeklySlot { weekday: Weekday::Sun, time: t(10, 0), label: "Missa das 10h".into() },
                WeeklySlot { weekday: Weekday::Sun, time: t(19, 0), label: "Missa das 19h".into() },
                WeeklySlot { weekday: Weekday::Mon, time: t(6, 30), label: "Missa da Semana".into() },
                WeeklySlot { weekday: Weekday::Tue, time: t(6, 30), label: "Missa da Semana".into() },
                WeeklySlot { weekday: Weekday::Wed, time: t(6, 30), label: "Missa da Semana".into() },
                WeeklySlot { weekday: Weekday::Thu, time: t(6, 30), label: "Missa da Semana".into() },
                WeeklySlot { weekday: Weekday::Fri, time: t(6, 30), label: "Missa da Semana".into() },
                WeeklySlot { weekday: Weekday::Sat, time: t(6, 30), label: "Missa de Sábado".into() },
            ],
            first_thursday: Some(DevotionSpec {
                time: t(19, 30),
                label: "Cura e Libertação".into(),
            }),
            first_friday: Some(DevotionSpec {
                time: t(6, 30),
                label: "Sagrado Coração".into(),
            }),
            first_saturday: Some(DevotionSpec {
                time: t(6, 30),
                label: "Imaculado Coração".into(),
            }),
            festival: Some(FestivalConfig {
                name: "São Judas Tadeu".into(),
                month: 10,
                first_day: 20,
                last_day: 28,
                weekday_time: t(19, 30),
                saturday_time: t(19, 0),
                feast_times: vec![t(7, 0), t(10, 0), t(12, 0), t(15, 0), t(17, 0), t(19, 30)],
            }),
            fixed_events: vec![
                FixedEventSpec {
                    month: 8,
                    day: 15,
                    time: t(19, 0),
                    event: "assumption".into(),
                    label: "Assunção de Maria".into(),
                },
                FixedEventSpec {
                    month: 11,
                    day: 1,
                    time: t(19, 0),
                    event: "all_saints".into(),
                    label: "Todos os Santos".into(),
                },
                FixedEventSpec {
                    month: 12,
                    day: 8,
                    time: t(19, 0),
                    event: "immaculate_conception".into(),
                    label: "Imaculada Conceição".into(),
                },
            ],
        }
    }
}

/// A per-time staffing refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingOverride {
    /// Slot kind the refinement applies to.
    pub kind: SlotKind,
    /// Exact slot time the refinement applies to.
    pub time: NaiveTime,
    /// Staffing bounds at that time.
    pub level: StaffingLevel,
}

/// Staffing bounds per slot kind, with optional per-time refinements.
///
/// Lookup order: `(kind, time)` override, then the kind's base entry.
/// A kind with neither is a fatal misconfiguration — the resolver
/// refuses to guess a minimum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffingConfig {
    base: BTreeMap<SlotKind, StaffingLevel>,
    overrides: Vec<StaffingOverride>,
}

impl StaffingConfig {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base staffing for a kind.
    pub fn with_kind(mut self, kind: SlotKind, min: u32, max: u32) -> Self {
        self.base.insert(kind, StaffingLevel::new(min, max));
        self
    }

    /// Sets a per-time refinement for a kind.
    pub fn with_override(mut self, kind: SlotKind, time: NaiveTime, min: u32, max: u32) -> Self {
        self.overrides.retain(|o| !(o.kind == kind && o.time == time));
        self.overrides.push(StaffingOverride {
            kind,
            time,
            level: StaffingLevel::new(min, max),
        });
        self
    }

    /// Resolves the staffing for a slot.
    pub fn level_for(&self, kind: SlotKind, time: NaiveTime) -> RosterResult<StaffingLevel> {
        self.overrides
            .iter()
            .find(|o| o.kind == kind && o.time == time)
            .map(|o| o.level)
            .or_else(|| self.base.get(&kind).copied())
            .ok_or(RosterError::MissingStaffing { kind })
    }

    /// All entries, for validation: `(kind, Some(time))` for overrides,
    /// `(kind, None)` for base entries.
    pub fn entries(&self) -> Vec<(SlotKind, Option<NaiveTime>, StaffingLevel)> {
        let mut out: Vec<_> = self
            .base
            .iter()
            .map(|(&kind, &level)| (kind, None, level))
            .collect();
        out.extend(
            self.overrides
                .iter()
                .map(|o| (o.kind, Some(o.time), o.level)),
        );
        out
    }

    /// The reference parish staffing table.
    ///
    /// Sunday principal masses need far more ministers than the daily
    /// 06:30 mass; the festival feast day has its own levels.
    pub fn default_parish() -> Self {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).expect("static time");
        Self::new()
            .with_kind(SlotKind::Weekday, 5, 8)
            .with_kind(SlotKind::Sunday, 20, 28)
            .with_override(SlotKind::Sunday, t(8, 0), 15, 20)
            .with_kind(SlotKind::FirstThursday, 20, 28)
            .with_kind(SlotKind::FirstFriday, 8, 12)
            .with_kind(SlotKind::FirstSaturday, 8, 12)
            .with_kind(SlotKind::Festival, 18, 20)
            .with_kind(SlotKind::FestivalFeast, 12, 12)
            .with_override(SlotKind::FestivalFeast, t(17, 0), 15, 15)
            .with_override(SlotKind::FestivalFeast, t(19, 30), 20, 25)
            .with_kind(SlotKind::Fixed, 20, 25)
    }
}
