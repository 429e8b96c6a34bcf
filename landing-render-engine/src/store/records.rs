use super::error::StoreError;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub label: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Testimonial {
    pub id: i64,
    pub name: String,
    pub patent: Option<String>,
    pub position: Option<String>,
    pub text: String,
    pub image: String,
    pub outcomes: Vec<Outcome>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventItem {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub event_date: String,
}

/// Row as stored, before filtering and outcome normalization.
#[derive(Debug, Deserialize)]
struct TestimonialRow {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    patent: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    outcomes: Value,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    sort_order: Option<i64>,
}

const APPROVED: &str = "approved";

/// Outcome lists arrive either as JSON arrays or as JSON-encoded strings.
/// Anything else, and any entry missing a label or image, is dropped.
pub fn normalize_outcomes(value: &Value) -> Vec<Outcome> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| Outcome::deserialize(item).ok())
            .collect(),
        Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
            Ok(decoded @ Value::Array(_)) => normalize_outcomes(&decoded),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn rows(value: Value, what: &str) -> Result<Vec<Value>, StoreError> {
    match value {
        Value::Array(rows) => Ok(rows),
        other => Err(StoreError::Shape(format!(
            "expected an array of {what}, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Approved testimonials in ascending sort position. Rows without a sort
/// position go last; ties keep store order.
pub fn parse_testimonials(value: Value) -> Result<Vec<Testimonial>, StoreError> {
    let mut approved: Vec<TestimonialRow> = rows(value, "testimonials")?
        .into_iter()
        .filter_map(|row| match TestimonialRow::deserialize(&row) {
            Ok(row) => Some(row),
            Err(e) => {
                warn!("Skipping malformed testimonial row: {}", e);
                None
            }
        })
        .filter(|row| row.status.as_deref() == Some(APPROVED))
        .collect();

    approved.sort_by_key(|row| (row.sort_order.is_none(), row.sort_order));

    Ok(approved
        .into_iter()
        .map(|row| Testimonial {
            outcomes: normalize_outcomes(&row.outcomes),
            id: row.id,
            name: row.name,
            patent: row.patent,
            position: row.position,
            text: row.text,
            image: row.image,
            created_at: row.created_at,
        })
        .collect())
}

/// Events, most recent `event_date` first.
pub fn parse_events(value: Value) -> Result<Vec<EventItem>, StoreError> {
    let mut events: Vec<EventItem> = rows(value, "events")?
        .into_iter()
        .filter_map(|row| match EventItem::deserialize(&row) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("Skipping malformed event row: {}", e);
                None
            }
        })
        .collect();

    // ISO dates order lexically.
    events.sort_by(|a, b| b.event_date.cmp(&a.event_date));
    Ok(events)
}
