//! Fair assignment selection.
//!
//! # Algorithm
//!
//! Least-loaded greedy dispatch: eligible ministers are ranked
//! ascending by running service count, ties broken by minister id so
//! the outcome never depends on incidental input order. The first
//! `min(max, eligible)` ministers are selected.
//!
//! The caller increments each selected minister's running count before
//! the next slot is processed; that sequential dependency is what turns
//! per-slot greediness into month-wide fairness, and why slots must be
//! processed in chronological order.

use crate::models::Minister;

/// Selects up to `max` ministers from `eligible` (indices into `pool`),
/// lowest running count first, ties by id.
///
/// Fewer than the slot's minimum is an understaffed outcome the caller
/// reports; this function never pads with ineligible ministers.
pub fn select_ministers(
    eligible: &[usize],
    pool: &[Minister],
    counts: &[u32],
    max: usize,
) -> Vec<usize> {
    let mut order = eligible.to_vec();
    order.sort_by(|&a, &b| {
        counts[a]
            .cmp(&counts[b])
            .then_with(|| pool[a].id.cmp(&pool[b].id))
    });
    order.truncate(max);
    order
}

/// Picks up to `max` substitute-willing reserves from the eligible
/// ministers who were not selected, ranked like the main selection.
///
/// Backups are informational: they are not counted toward staffing and
/// their running counts are untouched.
pub fn select_backups(
    eligible: &[usize],
    selected: &[usize],
    pool: &[Minister],
    counts: &[u32],
    max: usize,
) -> Vec<usize> {
    let mut reserves: Vec<usize> = eligible
        .iter()
        .copied()
        .filter(|i| !selected.contains(i) && pool[*i].availability.can_substitute)
        .collect();
    reserves.sort_by(|&a, &b| {
        counts[a]
            .cmp(&counts[b])
            .then_with(|| pool[a].id.cmp(&pool[b].id))
    });
    reserves.truncate(max);
    reserves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NormalizedAvailability;

    fn pool(ids: &[&str]) -> Vec<Minister> {
        ids.iter().map(|id| Minister::new(*id, *id)).collect()
    }

    #[test]
    fn test_lowest_count_first() {
        let pool = pool(&["a", "b", "c"]);
        let counts = vec![5, 1, 3];
        let selected = select_ministers(&[0, 1, 2], &pool, &counts, 2);
        assert_eq!(selected, vec![1, 2]);
    }

    #[test]
    fn test_ties_break_by_id() {
        let pool = pool(&["c", "a", "b"]);
        let counts = vec![2, 2, 2];
        let selected = select_ministers(&[0, 1, 2], &pool, &counts, 3);
        // All tied at 2: lexicographic id order a, b, c.
        assert_eq!(selected, vec![1, 2, 0]);
    }

    #[test]
    fn test_selection_ignores_input_order() {
        let pool = pool(&["a", "b", "c", "d"]);
        let counts = vec![4, 2, 2, 7];
        let forward = select_ministers(&[0, 1, 2, 3], &pool, &counts, 3);
        let backward = select_ministers(&[3, 2, 1, 0], &pool, &counts, 3);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_never_pads_beyond_eligible() {
        let pool = pool(&["a", "b", "c"]);
        let counts = vec![0, 0, 0];
        // min would be 5, but only 3 are eligible: exactly 3 come back.
        let selected = select_ministers(&[0, 1, 2], &pool, &counts, 5);
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn test_cap_at_max() {
        let pool = pool(&["a", "b", "c", "d", "e"]);
        let counts = vec![0; 5];
        let selected = select_ministers(&[0, 1, 2, 3, 4], &pool, &counts, 2);
        assert_eq!(selected, vec![0, 1]);
    }

    #[test]
    fn test_backups_prefer_substitutes_and_skip_selected() {
        let mut pool = pool(&["a", "b", "c", "d"]);
        pool[1].availability = NormalizedAvailability::none().with_substitute(true);
        pool[2].availability = NormalizedAvailability::none().with_substitute(true);
        let counts = vec![0, 3, 1, 0];

        let selected = vec![0];
        let backups = select_backups(&[0, 1, 2, 3], &selected, &pool, &counts, 2);
        // d never volunteered to substitute; c ranks before b on count.
        assert_eq!(backups, vec![2, 1]);
    }
}
