//! Roster generation pipeline.
//!
//! Wires the month's slot list to the minister pool:
//!
//! - **`eligibility`**: who may serve a slot (status, availability,
//!   same-instant bookings)
//! - **`selector`**: least-loaded greedy selection with deterministic
//!   tie-breaking
//! - **`quality`**: per-slot confidence and the monthly report
//! - **`generator`**: the sequential per-slot loop and run context
//!
//! # Algorithm
//!
//! Slots are processed in strict chronological order; every selection
//! immediately bumps the chosen ministers' running counts, so the next
//! slot ranks against updated loads. This single fairness-ranked pass
//! is the entire algorithm — no backtracking, no backfill. Shortfalls
//! are reported for a human scheduler to resolve, not escalated
//! automatically.

mod eligibility;
mod generator;
mod quality;
mod selector;

pub use eligibility::{eligible_indices, BookingLedger};
pub use generator::{MonthlyRoster, RosterGenerator, RosterRequest};
pub use quality::{
    slot_confidence, MonthlyQualityReport, Outlier, OutlierReason, QualityParams,
};
pub use selector::{select_backups, select_ministers};
