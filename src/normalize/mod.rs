//! Availability normalization.
//!
//! Questionnaire submissions arrive in two coexisting schema
//! generations, and the store occasionally holds a submission
//! double-encoded as a JSON string. This module converts any of them
//! into the single canonical [`NormalizedAvailability`]:
//!
//! - **Structured** (current): an object keyed by semantic field name —
//!   `weekdays`, `masses` (date → time → bool), `special_events`,
//!   `can_substitute`.
//! - **Flat** (legacy): an array of `{questionId, answer}` pairs with
//!   localized answer strings ("Domingo 05/10", "Sim"/"Não").
//!
//! A third generation would get its own decoder here; downstream logic
//! only ever sees the canonical shape.
//!
//! # Fail-soft
//! A missing, null, or unparseable submission normalizes to
//! [`NormalizedAvailability::none`] — an unresponsive minister is
//! excluded, never a reason to abort the month. Explicit declines
//! ("Nenhum dia", "Não") are a different thing: they are recorded as
//! negative answers so the eligibility filter never assigns a minister
//! who said no.
//!
//! # Idempotence
//! Normalizing an already-canonical record returns it unchanged.

mod flat;
mod structured;

use std::collections::BTreeMap;

use log::{debug, warn};
use serde_json::Value;

use crate::models::{Minister, NormalizedAvailability};

/// Normalizes one raw submission.
///
/// `year`/`month` anchor legacy date strings like "05/10", which carry
/// no year of their own.
pub fn normalize(raw: &Value, year: i32, month: u32) -> NormalizedAvailability {
    match raw {
        // Some rows hold the submission JSON-encoded a second time.
        Value::String(payload) => match serde_json::from_str::<Value>(payload) {
            Ok(inner) => normalize_value(&inner, year, month),
            Err(err) => {
                warn!("submission is a string but not JSON ({err}); treating as no availability");
                NormalizedAvailability::none()
            }
        },
        _ => normalize_value(raw, year, month),
    }
}

fn normalize_value(raw: &Value, year: i32, month: u32) -> NormalizedAvailability {
    // Already canonical: hand it back untouched.
    if let Ok(canonical) = serde_json::from_value::<NormalizedAvailability>(raw.clone()) {
        return canonical;
    }

    match raw {
        Value::Object(fields) => structured::decode(fields),
        Value::Array(items) => flat::decode(items, year, month),
        Value::Null => {
            debug!("empty submission; treating as no availability");
            NormalizedAvailability::none()
        }
        other => {
            warn!(
                "unrecognized submission shape ({}); treating as no availability",
                shape_name(other)
            );
            NormalizedAvailability::none()
        }
    }
}

/// Attaches normalized availability to a roster.
///
/// Ministers without a submission get [`NormalizedAvailability::none`]
/// and will simply never be eligible.
pub fn attach_submissions(
    roster: Vec<Minister>,
    submissions: &BTreeMap<String, Value>,
    year: i32,
    month: u32,
) -> Vec<Minister> {
    roster
        .into_iter()
        .map(|minister| match submissions.get(&minister.id) {
            Some(raw) => {
                let availability = normalize(raw, year, month);
                minister.with_availability(availability)
            }
            None => {
                debug!("no submission from minister {}", minister.id);
                minister.with_availability(NormalizedAvailability::none())
            }
        })
        .collect()
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::events;
    use chrono::{NaiveDate, Weekday};
    use serde_json::json;

    #[test]
    fn test_normalize_is_idempotent() {
        let canonical = NormalizedAvailability::none()
            .with_weekday(Weekday::Tue)
            .with_sunday(NaiveDate::from_ymd_opt(2025, 10, 12).unwrap())
            .with_event(events::FESTIVAL_NOVENA, true)
            .with_event(events::FIRST_FRIDAY, false)
            .with_substitute(true);

        let raw = serde_json::to_value(&canonical).unwrap();
        assert_eq!(normalize(&raw, 2025, 10), canonical);
    }

    #[test]
    fn test_unparseable_submission_fails_soft() {
        assert_eq!(
            normalize(&json!("this is not json"), 2025, 10),
            NormalizedAvailability::none()
        );
        assert_eq!(normalize(&json!(null), 2025, 10), NormalizedAvailability::none());
        assert_eq!(normalize(&json!(42), 2025, 10), NormalizedAvailability::none());
    }

    #[test]
    fn test_string_encoded_submission_is_decoded() {
        let inner = json!({
            "format_version": "2.0",
            "weekdays": { "monday": true, "tuesday": false },
            "can_substitute": true
        });
        let wrapped = Value::String(inner.to_string());

        let avail = normalize(&wrapped, 2025, 10);
        assert!(avail.weekdays.contains(Weekday::Mon));
        assert!(!avail.weekdays.contains(Weekday::Tue));
        assert!(avail.can_substitute);
    }

    #[test]
    fn test_attach_submissions_covers_missing_ministers() {
        let roster = vec![Minister::new("m1", "A"), Minister::new("m2", "B")];
        let mut submissions = BTreeMap::new();
        submissions.insert(
            "m1".to_string(),
            json!({ "weekdays": { "friday": true }, "masses": {}, "special_events": {} }),
        );

        let pool = attach_submissions(roster, &submissions, 2025, 10);
        assert!(pool[0].availability.weekdays.contains(Weekday::Fri));
        assert!(pool[1].availability.is_empty());
    }
}
