//! The monthly generation pipeline.
//!
//! # Control flow
//!
//! 1. Validate configuration and roster (structural problems are
//!    fatal).
//! 2. Resolve the month's slots (chronological).
//! 3. For each slot in order: filter eligible ministers, select the
//!    fairness-ranked set, update running counts, score confidence.
//! 4. Aggregate the monthly quality report.
//!
//! The whole run is a pure, synchronous transformation. All run state
//! (running counts, monthly tallies, the booking ledger) lives in an
//! explicit context owned by the call — nothing ambient, so separate
//! runs never interfere and a caller may generate different months in
//! parallel.
//!
//! Slot processing must stay sequential: each slot's selection feeds
//! the next slot's fairness ranking. Parallelizing across slots would
//! break month-wide fairness.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::eligibility::{eligible_indices, BookingLedger};
use super::quality::{slot_confidence, MonthlyQualityReport, QualityParams};
use super::selector::{select_backups, select_ministers};
use crate::calendar::{resolve_slots, CalendarConfig, StaffingConfig};
use crate::error::{RosterError, RosterResult};
use crate::models::{AssignedMinister, Minister, QualityTier, SlotAssignment};
use crate::validation::{validate_config, validate_roster};

/// A generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRequest {
    /// Year to generate.
    pub year: i32,
    /// Month to generate (1-12).
    pub month: u32,
    /// Preview mode: the computation is identical, but the flag is
    /// carried onto the output so the caller knows not to commit the
    /// result to durable storage. The engine itself never writes.
    pub preview: bool,
}

impl RosterRequest {
    /// A committed (non-preview) request.
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            preview: false,
        }
    }

    /// Marks the request as a preview.
    pub fn preview(mut self) -> Self {
        self.preview = true;
        self
    }
}

/// A fully generated month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRoster {
    /// Requested year.
    pub year: i32,
    /// Requested month.
    pub month: u32,
    /// One assignment per slot, chronological.
    pub assignments: Vec<SlotAssignment>,
    /// Aggregate quality metrics.
    pub report: MonthlyQualityReport,
    /// Echo of the request's preview flag. Preview results must not be
    /// persisted.
    pub preview: bool,
}

/// Run-scoped mutable state, threaded through the slot loop.
///
/// Deliberately not stored on the generator: a generator may serve many
/// concurrent runs, each owning its own context.
struct RunContext {
    /// Fairness ranks: historical totals plus this run's increments.
    counts: Vec<u32>,
    /// Assignments granted during this run only (for the report).
    monthly: Vec<u32>,
    /// Same-instant booking guard.
    ledger: BookingLedger,
    /// Indices of active pool members.
    active: Vec<usize>,
}

impl RunContext {
    fn seed(pool: &[Minister]) -> Self {
        Self {
            counts: pool.iter().map(|m| m.total_services).collect(),
            monthly: vec![0; pool.len()],
            ledger: BookingLedger::new(),
            active: (0..pool.len()).filter(|&i| pool[i].is_active()).collect(),
        }
    }

    fn pool_mean(&self) -> f64 {
        if self.active.is_empty() {
            return 0.0;
        }
        self.active
            .iter()
            .map(|&i| f64::from(self.counts[i]))
            .sum::<f64>()
            / self.active.len() as f64
    }
}

/// The schedule generation engine.
#[derive(Debug, Clone)]
pub struct RosterGenerator {
    calendar: CalendarConfig,
    staffing: StaffingConfig,
    params: QualityParams,
    backup_count: usize,
}

impl RosterGenerator {
    /// Creates a generator over the given configuration.
    pub fn new(calendar: CalendarConfig, staffing: StaffingConfig) -> Self {
        Self {
            calendar,
            staffing,
            params: QualityParams::default(),
            backup_count: 2,
        }
    }

    /// Overrides the quality scoring parameters.
    pub fn with_params(mut self, params: QualityParams) -> Self {
        self.params = params;
        self
    }

    /// Sets how many substitute-willing backups to reserve per slot.
    pub fn with_backup_count(mut self, backup_count: usize) -> Self {
        self.backup_count = backup_count;
        self
    }

    /// Generates a month.
    ///
    /// `pool` is the full roster with normalized availability attached
    /// (see [`crate::normalize::attach_submissions`]); each minister's
    /// `total_services` seeds their fairness rank. The pool is not
    /// mutated — updated totals are the caller's to persist from the
    /// returned assignments.
    pub fn generate(&self, request: &RosterRequest, pool: &[Minister]) -> RosterResult<MonthlyRoster> {
        if !(1..=12).contains(&request.month) {
            return Err(RosterError::InvalidMonth(request.month));
        }

        let mut issues = Vec::new();
        if let Err(errors) = validate_config(&self.calendar, &self.staffing) {
            issues.extend(errors);
        }
        if let Err(errors) = validate_roster(pool) {
            issues.extend(errors);
        }
        if !issues.is_empty() {
            return Err(RosterError::Misconfigured(issues));
        }

        let slots = resolve_slots(&self.calendar, &self.staffing, request.year, request.month)?;
        info!(
            "generating {}/{}: {} slots, {} ministers{}",
            request.month,
            request.year,
            slots.len(),
            pool.len(),
            if request.preview { " (preview)" } else { "" }
        );

        let mut ctx = RunContext::seed(pool);
        let mut assignments = Vec::with_capacity(slots.len());

        for slot in slots {
            let eligible = eligible_indices(&slot, pool, &ctx.ledger);
            let pool_mean = ctx.pool_mean();
            let selected =
                select_ministers(&eligible, pool, &ctx.counts, slot.staffing.max as usize);

            let selected_counts: Vec<u32> = selected.iter().map(|&i| ctx.counts[i]).collect();
            let confidence = slot_confidence(
                selected.len(),
                slot.staffing.min,
                &selected_counts,
                pool_mean,
                &self.params,
            );
            let understaffed = (selected.len() as u32) < slot.staffing.min;
            if understaffed {
                warn!(
                    "{} understaffed: {}/{} (eligible: {})",
                    slot.id(),
                    selected.len(),
                    slot.staffing.min,
                    eligible.len()
                );
            } else {
                debug!("{}: {}/{} assigned", slot.id(), selected.len(), slot.staffing.min);
            }

            for &i in &selected {
                ctx.counts[i] += 1;
                ctx.monthly[i] += 1;
                ctx.ledger
                    .entry((slot.date, slot.time))
                    .or_default()
                    .insert(pool[i].id.clone());
            }

            let backups = select_backups(
                &eligible,
                &selected,
                pool,
                &ctx.counts,
                self.backup_count,
            );

            assignments.push(SlotAssignment {
                slot,
                ministers: to_positions(&selected, pool),
                backups: to_positions(&backups, pool),
                confidence,
                tier: QualityTier::from_confidence(confidence),
                understaffed,
            });
        }

        let report = MonthlyQualityReport::aggregate(&assignments, pool, &ctx.monthly, &self.params);
        info!(
            "generated {} assignments ({} understaffed, {:.0}% utilization)",
            report.total_slots,
            report.understaffed_count(),
            report.utilization * 100.0
        );

        Ok(MonthlyRoster {
            year: request.year,
            month: request.month,
            assignments,
            report,
            preview: request.preview,
        })
    }
}

fn to_positions(indices: &[usize], pool: &[Minister]) -> Vec<AssignedMinister> {
    indices
        .iter()
        .enumerate()
        .map(|(slot_position, &i)| AssignedMinister {
            position: slot_position as u32 + 1,
            minister_id: pool[i].id.clone(),
            name: pool[i].name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::WeeklySlot;
    use crate::models::{MinisterStatus, NormalizedAvailability, SlotKind};
    use chrono::{NaiveTime, Weekday};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// Mondays 06:30 (min 1 / max 2) only.
    fn monday_calendar() -> (CalendarConfig, StaffingConfig) {
        let mut calendar = CalendarConfig::empty();
        calendar.weekly.push(WeeklySlot {
            weekday: Weekday::Mon,
            time: t(6, 30),
            label: "Missa da Semana".into(),
        });
        let staffing = StaffingConfig::new().with_kind(SlotKind::Weekday, 1, 2);
        (calendar, staffing)
    }

    fn monday_minister(id: &str, history: u32) -> Minister {
        Minister::new(id, id)
            .with_total_services(history)
            .with_availability(NormalizedAvailability::none().with_weekday(Weekday::Mon))
    }

    #[test]
    fn test_generate_respects_capacity() {
        let (calendar, staffing) = monday_calendar();
        let generator = RosterGenerator::new(calendar, staffing);
        let pool: Vec<Minister> = (0..5).map(|i| monday_minister(&format!("m{i}"), 0)).collect();

        let roster = generator
            .generate(&RosterRequest::new(2025, 10), &pool)
            .unwrap();

        assert!(!roster.assignments.is_empty());
        for assignment in &roster.assignments {
            assert!(assignment.assigned_count() <= assignment.slot.staffing.max as usize);
            assert!(!assignment.understaffed);
        }
    }

    #[test]
    fn test_generate_rotates_for_fairness() {
        // Two Monday seats, four identical candidates: over the month,
        // assignments must spread instead of repeating the same pair.
        let (calendar, staffing) = monday_calendar();
        let generator = RosterGenerator::new(calendar, staffing);
        let pool: Vec<Minister> = (0..4).map(|i| monday_minister(&format!("m{i}"), 0)).collect();

        let roster = generator
            .generate(&RosterRequest::new(2025, 10), &pool)
            .unwrap();

        // October 2025 has four Mondays (6, 13, 20, 27) and this
        // calendar has no festival: 8 seats over 4 ministers.
        assert_eq!(roster.assignments.len(), 4);
        assert_eq!(roster.report.ministers_used, 4);
        assert!((roster.report.mean_assignments - 2.0).abs() < 1e-10);
        assert_eq!(roster.report.assignment_variance, 0.0);
    }

    #[test]
    fn test_generate_prefers_low_history() {
        let (calendar, staffing) = monday_calendar();
        let generator = RosterGenerator::new(calendar, staffing);
        let pool = vec![
            monday_minister("veteran", 40),
            monday_minister("newcomer", 2),
            monday_minister("mid", 10),
        ];

        let roster = generator
            .generate(&RosterRequest::new(2025, 10), &pool)
            .unwrap();

        let first = &roster.assignments[0];
        assert_eq!(first.ministers[0].minister_id, "newcomer");
        assert_eq!(first.ministers[1].minister_id, "mid");
        assert_eq!(first.ministers[0].position, 1);
        assert_eq!(first.ministers[1].position, 2);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let (calendar, staffing) = monday_calendar();
        let generator = RosterGenerator::new(calendar, staffing);
        let pool: Vec<Minister> = (0..6).map(|i| monday_minister(&format!("m{i}"), i)).collect();

        let a = generator
            .generate(&RosterRequest::new(2025, 10), &pool)
            .unwrap();
        let b = generator
            .generate(&RosterRequest::new(2025, 10), &pool)
            .unwrap();

        let ids = |r: &MonthlyRoster| -> Vec<Vec<String>> {
            r.assignments
                .iter()
                .map(|a| a.ministers.iter().map(|m| m.minister_id.clone()).collect())
                .collect()
        };
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_generate_understaffed_not_an_error() {
        let mut calendar = CalendarConfig::empty();
        calendar.weekly.push(WeeklySlot {
            weekday: Weekday::Mon,
            time: t(6, 30),
            label: "Missa da Semana".into(),
        });
        let staffing = StaffingConfig::new().with_kind(SlotKind::Weekday, 5, 5);
        let generator = RosterGenerator::new(calendar, staffing);
        let pool: Vec<Minister> = (0..3).map(|i| monday_minister(&format!("m{i}"), 0)).collect();

        let roster = generator
            .generate(&RosterRequest::new(2025, 10), &pool)
            .unwrap();

        let first = &roster.assignments[0];
        // Exactly the three eligible ministers, never padded.
        assert_eq!(first.assigned_count(), 3);
        assert!(first.understaffed);
        assert!((first.confidence - 0.6).abs() < 1e-10);
        assert_eq!(first.tier, QualityTier::Medium);
        assert_eq!(roster.report.understaffed_count(), roster.assignments.len());
    }

    #[test]
    fn test_generate_zero_eligible_emits_empty_slot() {
        let (calendar, staffing) = monday_calendar();
        let generator = RosterGenerator::new(calendar, staffing);
        let pool = vec![Minister::new("m1", "no availability")];

        let roster = generator
            .generate(&RosterRequest::new(2025, 10), &pool)
            .unwrap();

        assert!(!roster.assignments.is_empty());
        for assignment in &roster.assignments {
            assert_eq!(assignment.assigned_count(), 0);
            assert_eq!(assignment.confidence, 0.0);
            assert_eq!(assignment.tier, QualityTier::Low);
        }
    }

    #[test]
    fn test_generate_preview_flag_round_trips() {
        let (calendar, staffing) = monday_calendar();
        let generator = RosterGenerator::new(calendar, staffing);
        let pool = vec![monday_minister("m1", 0)];

        let committed = generator
            .generate(&RosterRequest::new(2025, 10), &pool)
            .unwrap();
        let preview = generator
            .generate(&RosterRequest::new(2025, 10).preview(), &pool)
            .unwrap();

        assert!(!committed.preview);
        assert!(preview.preview);
        // Same computation either way.
        assert_eq!(preview.assignments.len(), committed.assignments.len());
    }

    #[test]
    fn test_generate_rejects_bad_month() {
        let (calendar, staffing) = monday_calendar();
        let generator = RosterGenerator::new(calendar, staffing);
        let err = generator
            .generate(&RosterRequest::new(2025, 0), &[])
            .unwrap_err();
        assert!(matches!(err, RosterError::InvalidMonth(0)));
    }

    #[test]
    fn test_generate_rejects_duplicate_ids() {
        let (calendar, staffing) = monday_calendar();
        let generator = RosterGenerator::new(calendar, staffing);
        let pool = vec![monday_minister("m1", 0), monday_minister("m1", 3)];

        let err = generator
            .generate(&RosterRequest::new(2025, 10), &pool)
            .unwrap_err();
        assert!(matches!(err, RosterError::Misconfigured(_)));
    }

    #[test]
    fn test_generate_skips_inactive_ministers() {
        let (calendar, staffing) = monday_calendar();
        let generator = RosterGenerator::new(calendar, staffing);
        let pool = vec![
            monday_minister("m1", 0).with_status(MinisterStatus::Inactive),
            monday_minister("m2", 99),
        ];

        let roster = generator
            .generate(&RosterRequest::new(2025, 10), &pool)
            .unwrap();
        for assignment in &roster.assignments {
            assert!(!assignment.includes("m1"));
            assert!(assignment.includes("m2"));
        }
    }

    #[test]
    fn test_generate_is_stable_under_pool_permutation() {
        use rand::rngs::SmallRng;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let (calendar, staffing) = monday_calendar();
        let generator = RosterGenerator::new(calendar, staffing);
        let mut pool: Vec<Minister> = (0..8)
            .map(|i| monday_minister(&format!("m{i}"), (i % 3) as u32))
            .collect();

        let baseline = generator
            .generate(&RosterRequest::new(2025, 10), &pool)
            .unwrap();

        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..5 {
            pool.shuffle(&mut rng);
            let shuffled = generator
                .generate(&RosterRequest::new(2025, 10), &pool)
                .unwrap();
            fn ids(x: &SlotAssignment) -> Vec<String> {
                x.ministers.iter().map(|m| m.minister_id.clone()).collect()
            }
            for (a, b) in baseline.assignments.iter().zip(&shuffled.assignments) {
                assert_eq!(ids(a), ids(b), "selection depends on pool order");
            }
        }
    }

    #[test]
    fn test_full_month_respects_availability_and_instants() {
        use crate::normalize::attach_submissions;
        use serde_json::json;
        use std::collections::BTreeMap;

        let _ = env_logger::builder().is_test(true).try_init();

        let generator = RosterGenerator::new(
            CalendarConfig::default_parish(),
            StaffingConfig::default_parish(),
        );

        // A mixed pool: structured submissions, a legacy flat one, one
        // decline, and one silent minister.
        let mut submissions = BTreeMap::new();
        for i in 0..12 {
            submissions.insert(
                format!("s{i}"),
                json!({
                    "format_version": "2.0",
                    "weekdays": { "monday": true, "wednesday": i % 2 == 0, "friday": true },
                    "masses": {
                        "2025-10-05": { "08:00": true },
                        "2025-10-19": { "10:00": true }
                    },
                    "special_events": {
                        "healing_liberation": i % 3 == 0,
                        "first_friday": true,
                        "saint_judas_novena": ["2025-10-20_19:30"],
                        "saint_judas_feast": { "2025-10-28_19:30": true }
                    },
                    "can_substitute": i % 4 == 0
                }),
            );
        }
        submissions.insert(
            "legacy".to_string(),
            json!([
                { "questionId": "available_sundays", "answer": ["Domingo 12/10", "Domingo 26/10"] },
                { "questionId": "daily_mass_availability", "answer": ["Terça", "Quinta"] },
                { "questionId": "saint_judas_novena", "answer": ["Segunda 20/10 às 19h30"] },
                { "questionId": "can_substitute", "answer": "Sim" }
            ]),
        );
        submissions.insert(
            "declined".to_string(),
            json!([{ "questionId": "monthly_availability", "answer": "Não" }]),
        );

        let mut roster_input: Vec<Minister> = submissions
            .keys()
            .map(|id| Minister::new(id.clone(), id.clone()))
            .collect();
        roster_input.push(Minister::new("silent", "Silent"));
        let pool = attach_submissions(roster_input, &submissions, 2025, 10);

        let roster = generator
            .generate(&RosterRequest::new(2025, 10), &pool)
            .unwrap();

        let by_id: BTreeMap<&str, &Minister> =
            pool.iter().map(|m| (m.id.as_str(), m)).collect();

        let mut instants: BTreeMap<(chrono::NaiveDate, NaiveTime), Vec<String>> = BTreeMap::new();
        for assignment in &roster.assignments {
            let slot = &assignment.slot;
            for assigned in &assignment.ministers {
                let minister = by_id[assigned.minister_id.as_str()];

                // Availability respect, per slot day type.
                let avail = &minister.availability;
                let ok = match slot.kind {
                    SlotKind::Weekday => avail.weekdays.contains(slot.weekday()),
                    SlotKind::Sunday => avail.sundays.contains(&slot.date),
                    _ => slot
                        .event
                        .as_deref()
                        .map(|e| avail.allows_event(e))
                        .unwrap_or(false),
                };
                assert!(
                    ok,
                    "{} assigned to {} outside availability",
                    assigned.minister_id,
                    slot.id()
                );

                instants
                    .entry((slot.date, slot.time))
                    .or_default()
                    .push(assigned.minister_id.clone());
            }
        }

        // No minister twice at the same instant.
        for ((date, time), ids) in &instants {
            let unique: std::collections::BTreeSet<&String> = ids.iter().collect();
            assert_eq!(unique.len(), ids.len(), "double booking at {date} {time}");
        }

        // The decliner and the silent minister never appear.
        assert!(roster.assignments.iter().all(|a| !a.includes("declined")));
        assert!(roster.assignments.iter().all(|a| !a.includes("silent")));

        // The legacy submission produced real assignments.
        assert!(roster.assignments.iter().any(|a| a.includes("legacy")));

        assert_eq!(roster.report.total_slots, roster.assignments.len());
    }

    #[test]
    fn test_generate_reserves_backups() {
        let (calendar, staffing) = monday_calendar();
        let generator = RosterGenerator::new(calendar, staffing).with_backup_count(1);
        let pool = vec![
            monday_minister("m1", 0),
            monday_minister("m2", 0),
            monday_minister("m3", 0).with_availability(
                NormalizedAvailability::none()
                    .with_weekday(Weekday::Mon)
                    .with_substitute(true),
            ),
        ];

        let roster = generator
            .generate(&RosterRequest::new(2025, 10), &pool)
            .unwrap();

        // m1 and m2 fill the first Monday; m3 (substitute-willing) is
        // the reserve and keeps a zero running count for it.
        let first = &roster.assignments[0];
        assert_eq!(first.assigned_count(), 2);
        assert_eq!(first.backups.len(), 1);
        assert_eq!(first.backups[0].minister_id, "m3");
    }
}
