//! Minister (volunteer) model.
//!
//! A minister carries an id, an activity status, the historical total of
//! services rendered, and normalized availability for the month being
//! generated. Running counts used for fairness ranking are run-scoped
//! state owned by the generator, not stored here.

use serde::{Deserialize, Serialize};

use super::NormalizedAvailability;

/// Participation status. Only `Active` ministers are ever assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinisterStatus {
    /// Eligible for scheduling.
    Active,
    /// Kept in the roster but never assigned.
    Inactive,
    /// Awaiting approval; never assigned.
    Pending,
}

/// A scheduling participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Minister {
    /// Unique minister identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Participation status.
    pub status: MinisterStatus,
    /// Historical total of services rendered, prior to this run.
    /// Seeds the running count used for fairness ranking.
    pub total_services: u32,
    /// Normalized availability for the month being generated.
    pub availability: NormalizedAvailability,
}

impl Minister {
    /// Creates an active minister with no history and no availability.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: MinisterStatus::Active,
            total_services: 0,
            availability: NormalizedAvailability::none(),
        }
    }

    /// Sets the participation status.
    pub fn with_status(mut self, status: MinisterStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the historical service total.
    pub fn with_total_services(mut self, total: u32) -> Self {
        self.total_services = total;
        self
    }

    /// Sets the normalized availability.
    pub fn with_availability(mut self, availability: NormalizedAvailability) -> Self {
        self.availability = availability;
        self
    }

    /// Whether the minister can be scheduled at all.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == MinisterStatus::Active
    }
}
