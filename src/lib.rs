//! Minister scheduling engine for recurring parish services.
//!
//! Given a month, a staffing/calendar configuration, and a roster of
//! ministers with their submitted availability, produces a fairness-
//! balanced assignment for every service slot of the month plus a
//! quality report. The whole pipeline is a pure, synchronous
//! transformation — persistence, transport, and presentation belong to
//! the caller.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Slot`, `Minister`,
//!   `NormalizedAvailability`, `SlotAssignment`
//! - **`calendar`**: Month resolution via a precedence-ordered rule
//!   list (weekly pattern, first-weekday devotions, festival block,
//!   fixed dates)
//! - **`normalize`**: Converts raw availability submissions (two
//!   coexisting schema generations) into the canonical shape
//! - **`scheduler`**: Eligibility filtering, fair selection, quality
//!   scoring, and the `RosterGenerator` pipeline
//! - **`validation`**: Structural integrity checks on configuration
//!   and roster
//!
//! # Example
//!
//! ```
//! use parish_roster::calendar::{CalendarConfig, StaffingConfig};
//! use parish_roster::models::{Minister, NormalizedAvailability};
//! use parish_roster::scheduler::{RosterGenerator, RosterRequest};
//! use chrono::Weekday;
//!
//! let pool = vec![
//!     Minister::new("m1", "Maria").with_availability(
//!         NormalizedAvailability::none().with_weekday(Weekday::Mon),
//!     ),
//! ];
//! let generator = RosterGenerator::new(
//!     CalendarConfig::default_parish(),
//!     StaffingConfig::default_parish(),
//! );
//! let roster = generator
//!     .generate(&RosterRequest::new(2025, 10).preview(), &pool)
//!     .unwrap();
//! assert!(roster.preview);
//! assert!(!roster.assignments.is_empty());
//! ```

pub mod calendar;
pub mod error;
pub mod models;
pub mod normalize;
pub mod scheduler;
pub mod validation;

pub use error::{RosterError, RosterResult};
