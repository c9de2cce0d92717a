//! Eligibility filtering.
//!
//! For one slot, narrows the roster to the ministers who may serve it:
//! active status, availability covering the slot's day type, and no
//! booking at the same date and time. Serving earlier the same day at a
//! different time is allowed — only the same instant double-books.
//!
//! Zero eligible ministers is a normal outcome (the slot is emitted
//! empty and surfaces through the quality report), never an error.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveTime};

use crate::models::{Minister, Slot, SlotKind};

/// Who is already booked at each `(date, time)` instant of the run.
///
/// Ordered maps keep every traversal deterministic.
pub type BookingLedger = BTreeMap<(NaiveDate, NaiveTime), BTreeSet<String>>;

/// Returns the indices of pool members eligible for `slot`, in pool
/// order.
pub fn eligible_indices(slot: &Slot, pool: &[Minister], ledger: &BookingLedger) -> Vec<usize> {
    let booked = ledger.get(&(slot.date, slot.time));

    pool.iter()
        .enumerate()
        .filter(|(_, minister)| {
            minister.is_active()
                && booked.map_or(true, |ids| !ids.contains(&minister.id))
                && covers(slot, minister)
        })
        .map(|(index, _)| index)
        .collect()
}

/// Whether a minister's availability covers the slot's day type.
fn covers(slot: &Slot, minister: &Minister) -> bool {
    match slot.kind {
        SlotKind::Weekday => minister.availability.weekdays.contains(slot.weekday()),
        SlotKind::Sunday => minister.availability.sundays.contains(&slot.date),
        // Devotions, festival masses, and fixed observances all key off
        // the slot's named event.
        _ => match slot.event.as_deref() {
            Some(event) => minister.availability.allows_event(event),
            None => false,
        },
    }
}
