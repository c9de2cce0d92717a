//! Quality scoring and the monthly report.
//!
//! # Per-slot confidence
//!
//! `confidence = clamp(coverage - fairness_penalty, 0, 1)` where
//! coverage is `assigned / min` capped at 1.0, and the penalty grows
//! with how far the selected ministers' mean running count (at
//! selection time) sits above the pool mean. A slot filled entirely
//! with already-overused ministers scores below one filled with
//! underused ministers, even at full staffing.
//!
//! The penalty weight is a tunable parameter, not a contract: the
//! weighting is heuristic, so deployments can adjust it without code
//! changes.
//!
//! # Monthly aggregate
//!
//! Utilization (distinct ministers used vs. pool), mean and variance of
//! per-minister assignment counts (lower variance = fairer month), and
//! outlier ministers beyond a configurable number of standard
//! deviations from the mean.

use serde::{Deserialize, Serialize};

use crate::models::{Minister, QualityTier, SlotAssignment};

/// Tunable scoring parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QualityParams {
    /// Weight of the fairness penalty in per-slot confidence.
    pub fairness_penalty: f64,
    /// Standard deviations from the mean that flag an outlier.
    pub outlier_sigma: f64,
}

impl Default for QualityParams {
    fn default() -> Self {
        Self {
            fairness_penalty: 0.2,
            outlier_sigma: 2.0,
        }
    }
}

/// Computes a slot's confidence score.
///
/// `selected_counts` are the selected ministers' running counts at
/// selection time (before this slot's increments); `pool_mean` is the
/// active pool's mean running count at the same instant. An empty
/// selection scores 0.
pub fn slot_confidence(
    assigned: usize,
    min_required: u32,
    selected_counts: &[u32],
    pool_mean: f64,
    params: &QualityParams,
) -> f64 {
    if assigned == 0 || selected_counts.is_empty() {
        return 0.0;
    }

    let coverage = (assigned as f64 / f64::from(min_required.max(1))).min(1.0);

    let selected_mean =
        selected_counts.iter().map(|&c| f64::from(c)).sum::<f64>() / selected_counts.len() as f64;
    let excess = (selected_mean - pool_mean).max(0.0);
    let penalty = params.fairness_penalty * excess / (pool_mean + 1.0);

    (coverage - penalty).clamp(0.0, 1.0)
}

/// Why a minister was flagged in the monthly report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutlierReason {
    /// Assignment count far above the pool mean.
    Overused,
    /// Assignment count far below the pool mean.
    Underused,
}

/// A minister whose month deviates sharply from the pool mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outlier {
    /// Minister id.
    pub minister_id: String,
    /// Display name.
    pub name: String,
    /// Assignments this month.
    pub assignments: u32,
    /// Direction of the deviation.
    pub reason: OutlierReason,
}

/// Aggregate quality metrics for a generated month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyQualityReport {
    /// Slots generated.
    pub total_slots: usize,
    /// Slots at each quality tier.
    pub high_confidence: usize,
    /// See `high_confidence`.
    pub medium_confidence: usize,
    /// See `high_confidence`.
    pub low_confidence: usize,
    /// Ids (`YYYY-MM-DD_HH:MM`) of slots below minimum staffing.
    pub understaffed: Vec<String>,
    /// Distinct ministers who received at least one assignment.
    pub ministers_used: usize,
    /// Active ministers in the pool.
    pub pool_size: usize,
    /// `ministers_used / pool_size` (0 when the pool is empty).
    pub utilization: f64,
    /// Mean assignments per active minister this month.
    pub mean_assignments: f64,
    /// Population variance of per-minister assignment counts.
    /// Lower is fairer.
    pub assignment_variance: f64,
    /// Ministers far from the mean, with the direction.
    pub outliers: Vec<Outlier>,
}

impl MonthlyQualityReport {
    /// Builds the report from a finished run.
    ///
    /// `monthly_counts[i]` is the number of assignments minister
    /// `pool[i]` received during this run (not the historical total).
    pub fn aggregate(
        assignments: &[SlotAssignment],
        pool: &[Minister],
        monthly_counts: &[u32],
        params: &QualityParams,
    ) -> Self {
        let mut high = 0;
        let mut medium = 0;
        let mut low = 0;
        let mut understaffed = Vec::new();

        for assignment in assignments {
            match assignment.tier {
                QualityTier::High => high += 1,
                QualityTier::Medium => medium += 1,
                QualityTier::Low => low += 1,
            }
            if assignment.understaffed {
                understaffed.push(assignment.slot.id());
            }
        }

        let active: Vec<usize> = (0..pool.len()).filter(|&i| pool[i].is_active()).collect();
        let pool_size = active.len();
        let ministers_used = active
            .iter()
            .filter(|&&i| monthly_counts[i] > 0)
            .count();
        let utilization = if pool_size == 0 {
            0.0
        } else {
            ministers_used as f64 / pool_size as f64
        };

        let (mean, variance) = if pool_size == 0 {
            (0.0, 0.0)
        } else {
            let mean = active
                .iter()
                .map(|&i| f64::from(monthly_counts[i]))
                .sum::<f64>()
                / pool_size as f64;
            let variance = active
                .iter()
                .map(|&i| {
                    let d = f64::from(monthly_counts[i]) - mean;
                    d * d
                })
                .sum::<f64>()
                / pool_size as f64;
            (mean, variance)
        };

        let std_dev = variance.sqrt();
        let mut outliers = Vec::new();
        if std_dev > 0.0 {
            for &i in &active {
                let deviation = f64::from(monthly_counts[i]) - mean;
                if deviation.abs() > params.outlier_sigma * std_dev {
                    outliers.push(Outlier {
                        minister_id: pool[i].id.clone(),
                        name: pool[i].name.clone(),
                        assignments: monthly_counts[i],
                        reason: if deviation > 0.0 {
                            OutlierReason::Overused
                        } else {
                            OutlierReason::Underused
                        },
                    });
                }
            }
        }

        Self {
            total_slots: assignments.len(),
            high_confidence: high,
            medium_confidence: medium,
            low_confidence: low,
            understaffed,
            ministers_used,
            pool_size,
            utilization,
            mean_assignments: mean,
            assignment_variance: variance,
            outliers,
        }
    }

    /// Number of understaffed slots.
    pub fn understaffed_count(&self) -> usize {
        self.understaffed.len()
    }

    /// Whether the month needs a human pass (understaffing or
    /// outliers).
    pub fn has_warnings(&self) -> bool {
        !self.understaffed.is_empty() || !self.outliers.is_empty()
    }
}
