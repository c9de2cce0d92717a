//! Assignment (solution) model.
//!
//! One [`SlotAssignment`] is produced per slot: the selected ministers in
//! position order, up to two substitute-willing backups, a confidence
//! score, and the derived quality tier. Understaffed and empty slots are
//! valid assignments, not errors; they surface through the confidence
//! score and the monthly quality report.

use serde::{Deserialize, Serialize};

use super::Slot;

/// A minister placed at a numbered position within a slot.
///
/// Positions are 1-based selection order and exist purely for display
/// ("1st minister", "2nd minister"); they carry no eligibility meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedMinister {
    /// Display position, starting at 1.
    pub position: u32,
    /// Assigned minister's id.
    pub minister_id: String,
    /// Assigned minister's display name.
    pub name: String,
}

/// Quality tier derived from a slot's confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityTier {
    /// Confidence ≥ 0.8.
    High,
    /// Confidence ≥ 0.6.
    Medium,
    /// Anything below.
    Low,
}

impl QualityTier {
    /// Maps a confidence score to its tier.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            QualityTier::High
        } else if confidence >= 0.6 {
            QualityTier::Medium
        } else {
            QualityTier::Low
        }
    }
}

/// The staffing outcome for a single slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAssignment {
    /// The slot being staffed.
    pub slot: Slot,
    /// Selected ministers in position order. Never exceeds
    /// `slot.staffing.max`; may be shorter than `slot.staffing.min`.
    pub ministers: Vec<AssignedMinister>,
    /// Substitute-willing ministers held in reserve. Not counted toward
    /// staffing and not charged to running counts.
    pub backups: Vec<AssignedMinister>,
    /// Confidence in [0, 1]: staffing completeness adjusted by a
    /// fairness penalty.
    pub confidence: f64,
    /// Tier derived from `confidence`.
    pub tier: QualityTier,
    /// Whether fewer than `slot.staffing.min` ministers were selected.
    pub understaffed: bool,
}

impl SlotAssignment {
    /// Number of ministers actually assigned.
    #[inline]
    pub fn assigned_count(&self) -> usize {
        self.ministers.len()
    }

    /// Whether the slot reached its minimum staffing.
    #[inline]
    pub fn is_fully_staffed(&self) -> bool {
        !self.understaffed
    }

    /// Whether a given minister holds a position in this slot.
    pub fn includes(&self, minister_id: &str) -> bool {
        self.ministers.iter().any(|m| m.minister_id == minister_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SlotKind, StaffingLevel};
    use chrono::{NaiveDate, NaiveTime};

    fn sample() -> SlotAssignment {
        let slot = Slot::new(
            NaiveDate::from_ymd_opt(2025, 10, 6).unwrap(),
            NaiveTime::from_hms_opt(6, 30, 0).unwrap(),
            SlotKind::Weekday,
            StaffingLevel::new(2, 4),
        );
        SlotAssignment {
            slot,
            ministers: vec![
                AssignedMinister {
                    position: 1,
                    minister_id: "m1".into(),
                    name: "A".into(),
                },
                AssignedMinister {
                    position: 2,
                    minister_id: "m2".into(),
                    name: "B".into(),
                },
            ],
            backups: vec![],
            confidence: 1.0,
            tier: QualityTier::High,
            understaffed: false,
        }
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(QualityTier::from_confidence(1.0), QualityTier::High);
        assert_eq!(QualityTier::from_confidence(0.8), QualityTier::High);
        assert_eq!(QualityTier::from_confidence(0.79), QualityTier::Medium);
        assert_eq!(QualityTier::from_confidence(0.6), QualityTier::Medium);
        assert_eq!(QualityTier::from_confidence(0.59), QualityTier::Low);
        assert_eq!(QualityTier::from_confidence(0.0), QualityTier::Low);
    }

    #[test]
    fn test_assignment_queries() {
        let a = sample();
        assert_eq!(a.assigned_count(), 2);
        assert!(a.is_fully_staffed());
        assert!(a.includes("m1"));
        assert!(!a.includes("m3"));
    }
}
