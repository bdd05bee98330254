//! Forgiving field decoders for records written by older or foreign clients.
//!
//! A field of the wrong shape decodes to its default instead of failing the
//! whole record.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::ingredient::Ingredient;

/// Decodes every element of a JSON array that fits `T`, dropping the rest.
/// Anything other than an array yields `None`.
pub fn decode_each<T: DeserializeOwned>(value: Value, what: &str) -> Option<Vec<T>> {
    let Value::Array(items) = value else {
        return None;
    };
    let items = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!("Skipping undecodable {} #{}: {}", what, i, e);
                None
            }
        })
        .collect();
    Some(items)
}

/// Positive, finite minutes rounded to a whole number; 0 otherwise.
pub fn round_minutes(minutes: f64) -> u32 {
    if minutes.is_finite() && minutes > 0.0 {
        minutes.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_list_of(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.into_iter().filter_map(text_of).collect()),
        _ => None,
    }
}

fn ingredients_of(value: Value) -> Option<Vec<Ingredient>> {
    match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(name) => Some(Ingredient::new(name, "")),
                    item => serde_json::from_value(item).ok(),
                })
                .collect(),
        ),
        _ => None,
    }
}

pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(text_of(Value::deserialize(d)?).unwrap_or_default())
}

pub fn optional_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(text_of(Value::deserialize(d)?))
}

pub fn minutes<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(number(&Value::deserialize(d)?).map_or(0, round_minutes))
}

pub fn optional_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(number(&Value::deserialize(d)?))
}

pub fn millis<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(number(&Value::deserialize(d)?)
        .filter(|n| n.is_finite())
        .map_or(0, |n| n.round() as i64))
}

pub fn text_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(text_list_of(Value::deserialize(d)?).unwrap_or_default())
}

pub fn optional_text_list<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(text_list_of(Value::deserialize(d)?))
}

pub fn ingredients<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Ingredient>, D::Error> {
    Ok(ingredients_of(Value::deserialize(d)?).unwrap_or_default())
}

pub fn optional_ingredients<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Vec<Ingredient>>, D::Error> {
    Ok(ingredients_of(Value::deserialize(d)?))
}

pub fn optional_timestamp<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        _ => None,
    })
}
