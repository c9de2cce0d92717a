//! Decoder for the structured submission schema.
//!
//! The current questionnaire shape: an object keyed by semantic field
//! name, with ISO dates and 24h times.
//!
//! ```json
//! {
//!   "format_version": "2.0",
//!   "weekdays": { "monday": true, "friday": false },
//!   "masses": { "2025-10-05": { "08:00": true, "10:00": false } },
//!   "special_events": {
//!     "healing_liberation": true,
//!     "first_friday": false,
//!     "saint_judas_novena": ["2025-10-20_19:30"],
//!     "saint_judas_feast": { "2025-10-28_07:00": true }
//!   },
//!   "can_substitute": true
//! }
//! ```
//!
//! Only Sunday dates survive from `masses` (weekday service is driven
//! by the `weekdays` flags), and per-datetime festival answers collapse
//! to the canonical opt-in flags.

use chrono::{Datelike, NaiveDate, Weekday};
use serde_json::{Map, Value};

use crate::models::{events, NormalizedAvailability};

const NO_DAY: &str = "Nenhum dia";

pub(super) fn decode(fields: &Map<String, Value>) -> NormalizedAvailability {
    let mut avail = NormalizedAvailability::none();

    if let Some(Value::Object(weekdays)) = fields.get("weekdays") {
        for (name, value) in weekdays {
            if value.as_bool() == Some(true) {
                if let Some(day) = weekday_from_name(name) {
                    avail.weekdays.insert(day);
                }
            }
        }
    }

    if let Some(Value::Object(masses)) = fields.get("masses") {
        for (date_str, times) in masses {
            let any_time = match times {
                Value::Object(map) => map.values().any(|v| v.as_bool() == Some(true)),
                _ => false,
            };
            if !any_time {
                continue;
            }
            if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
                if date.weekday() == Weekday::Sun {
                    avail.sundays.insert(date);
                }
            }
        }
    }

    if let Some(Value::Object(special)) = fields.get("special_events") {
        for (key, value) in special {
            match (key.as_str(), value) {
                ("saint_judas_novena" | "novena", Value::Array(days)) => {
                    let opted = days
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|d| d != NO_DAY);
                    avail.events.insert(events::FESTIVAL_NOVENA.into(), opted);
                }
                ("saint_judas_feast" | "feast", Value::Object(times)) => {
                    let opted = times.values().any(|v| v.as_bool() == Some(true));
                    avail.events.insert(events::FESTIVAL_FEAST.into(), opted);
                }
                ("healing_liberation" | "healing_service", Value::Bool(b)) => {
                    avail.events.insert(events::HEALING_SERVICE.into(), *b);
                }
                (_, Value::Bool(b)) => {
                    // first_friday, first_saturday, and any fixed-event
                    // key pass through under their own name.
                    avail.events.insert(key.clone(), *b);
                }
                _ => {}
            }
        }
    }

    avail.can_substitute = matches!(fields.get("can_substitute"), Some(Value::Bool(true)));

    avail
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        _ => None,
    }
}
