//! Error types for roster generation.
//!
//! Only structural problems are fatal: a missing staffing entry, an
//! invalid configuration, or an out-of-range request. Malformed
//! availability submissions normalize to "no availability" instead of
//! erroring, and understaffed slots are reported through the quality
//! report, never through this type.

use thiserror::Error;

use crate::models::SlotKind;
use crate::validation::ConfigError;

/// Fatal generation errors.
#[derive(Error, Debug)]
pub enum RosterError {
    /// The requested month is outside 1..=12.
    #[error("month out of range: {0} (expected 1-12)")]
    InvalidMonth(u32),

    /// No staffing entry exists for a slot kind the calendar produced.
    /// Guessing a minimum would corrupt the quality report, so the run
    /// is aborted instead.
    #[error("no staffing configured for {kind:?} slots")]
    MissingStaffing {
        /// The slot kind lacking configuration.
        kind: SlotKind,
    },

    /// The configuration or roster failed structural validation.
    #[error("invalid configuration: {}", format_errors(.0))]
    Misconfigured(Vec<ConfigError>),
}

/// Crate-wide result alias.
pub type RosterResult<T> = Result<T, RosterError>;

fn format_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
