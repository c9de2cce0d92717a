//! Decoder for the legacy flat submission schema.
//!
//! The older questionnaire stored an array of question/answer pairs
//! with localized answers:
//!
//! ```json
//! [
//!   { "questionId": "monthly_availability", "answer": "Sim" },
//!   { "questionId": "available_sundays", "answer": ["Domingo 05/10", "Domingo 19/10"] },
//!   { "questionId": "daily_mass_availability", "answer": ["Segunda", "Quarta"] },
//!   { "questionId": "saint_judas_novena", "answer": ["Terça 21/10 às 19h30"] },
//!   { "questionId": "saint_judas_feast_7h", "answer": "Sim" },
//!   { "questionId": "can_substitute", "answer": "Sim" }
//! ]
//! ```
//!
//! Date strings carry no year, so the requested `(year, month)` anchors
//! them. A `monthly_availability` of "Não" is an explicit decline of
//! all regular service: weekday and Sunday answers are dropped, but
//! named-event answers are still collected — event opt-ins are
//! independent of regular availability.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, Weekday};
use log::debug;
use regex::Regex;
use serde_json::Value;

use crate::models::{events, NormalizedAvailability};

const YES: &str = "Sim";
const NO_DAY: &str = "Nenhum dia";
const NO_SUNDAY: &str = "Nenhum domingo";

fn day_month_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2})/(\d{1,2})").expect("literal pattern"))
}

pub(super) fn decode(items: &[Value], year: i32, month: u32) -> NormalizedAvailability {
    let mut avail = NormalizedAvailability::none();

    // An explicit "no regular availability this month" gates the
    // weekday and Sunday questions off entirely.
    let regular = items
        .iter()
        .find(|item| question_id(item) == Some("monthly_availability"))
        .map(|item| is_yes(answer_of(item)))
        .unwrap_or(true);

    let mut feast_seen = false;
    let mut feast_opted = false;

    for item in items {
        let Some(question) = question_id(item) else {
            continue;
        };
        let answer = answer_of(item);

        match question {
            "available_sundays" if regular => {
                if let Some(Value::Array(days)) = answer {
                    for day in days.iter().filter_map(Value::as_str) {
                        if day == NO_SUNDAY {
                            continue;
                        }
                        if let Some(date) = parse_anchored_date(day, year, month) {
                            if date.weekday() == Weekday::Sun {
                                avail.sundays.insert(date);
                            }
                        }
                    }
                }
            }
            "daily_mass_availability" if regular => match answer {
                Some(Value::String(s)) if s == YES => {
                    avail.weekdays = crate::models::WeekdaySet::all();
                }
                Some(Value::Array(days)) => {
                    for day in days.iter().filter_map(Value::as_str) {
                        if let Some(weekday) = weekday_from_localized(day) {
                            avail.weekdays.insert(weekday);
                        }
                    }
                }
                // "Não" / "Nenhum dia": an explicit all-weekdays decline.
                _ => {}
            },
            "saint_judas_novena" => {
                if let Some(Value::Array(days)) = answer {
                    let opted = days.iter().filter_map(Value::as_str).any(|d| d != NO_DAY);
                    avail.events.insert(events::FESTIVAL_NOVENA.into(), opted);
                }
            }
            "healing_liberation_mass" => {
                avail
                    .events
                    .insert(events::HEALING_SERVICE.into(), is_yes(answer));
            }
            "sacred_heart_mass" => {
                avail
                    .events
                    .insert(events::FIRST_FRIDAY.into(), is_yes(answer));
            }
            "immaculate_heart_mass" => {
                avail
                    .events
                    .insert(events::FIRST_SATURDAY.into(), is_yes(answer));
            }
            "can_substitute" => {
                avail.can_substitute = is_yes(answer);
            }
            "main_service_time" => {
                // Sunday availability is date-exact in the canonical
                // shape; the preferred-time answer adds nothing.
                debug!("ignoring main_service_time answer");
            }
            feast if feast.starts_with("saint_judas_feast_") => {
                feast_seen = true;
                feast_opted |= is_yes(answer);
            }
            _ => {}
        }
    }

    if feast_seen {
        avail.events.insert(events::FESTIVAL_FEAST.into(), feast_opted);
    }

    avail
}

fn question_id(item: &Value) -> Option<&str> {
    item.get("questionId").and_then(Value::as_str)
}

fn answer_of(item: &Value) -> Option<&Value> {
    item.get("answer")
}

fn is_yes(answer: Option<&Value>) -> bool {
    match answer {
        Some(Value::String(s)) => s == YES,
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

/// Parses "Domingo 05/10"-style strings against the anchor month.
///
/// Returns `None` when the embedded month disagrees with the anchor —
/// a stale answer from another month must not leak into this run.
fn parse_anchored_date(text: &str, year: i32, month: u32) -> Option<NaiveDate> {
    let captures = day_month_re().captures(text)?;
    let day: u32 = captures.get(1)?.as_str().parse().ok()?;
    let answer_month: u32 = captures.get(2)?.as_str().parse().ok()?;
    if answer_month != month {
        debug!("dropping out-of-month answer '{text}' (expected month {month})");
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn weekday_from_localized(name: &str) -> Option<Weekday> {
    if name.contains("Segunda") {
        Some(Weekday::Mon)
    } else if name.contains("Terça") {
        Some(Weekday::Tue)
    } else if name.contains("Quarta") {
        Some(Weekday::Wed)
    } else if name.contains("Quinta") {
        Some(Weekday::Thu)
    } else if name.contains("Sexta") {
        Some(Weekday::Fri)
    } else {
        None
    }
}
