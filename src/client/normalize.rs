//! Coercion of loosely-typed API payloads into [`ClientRecord`]s.
//!
//! Nothing here fails on a single record: missing or falsy fields become
//! defaults. The only error is a top-level payload that doesn't contain a
//! record list at all.

use serde_json::{Number, Value};
use tracing::debug;

use super::ids::{IdGenerator, RandomIds};
use super::{ClientRecord, Location};
use crate::error::{Result, TrackerError};

pub const UNKNOWN_CLIENT: &str = "Unknown Client";
pub const UNKNOWN_MODEL: &str = "Unknown Model";

/// Keys that may hold the record list when the payload is an object,
/// checked in order.
const LIST_KEYS: [&str; 2] = ["clients", "data"];

/// Loose truthiness: `null`, `false`, zero and `""` are falsy, everything
/// else (including `"0"`, `[]` and `{}`) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Script-style string conversion of an arbitrary JSON value.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_to_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f != 0.0 && (f.abs() < 1e-6 || f.abs() >= 1e21) => exponent_form(f),
        // 2.0 prints as "2", not "2.0"
        Some(f) if f.fract() == 0.0 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// `1e-7`, `1.5e-7`, `1e+21`: shortest digits with a signed exponent.
fn exponent_form(f: f64) -> String {
    let formatted = format!("{f:e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => formatted,
    }
}

/// Converts a coordinate value to a finite number.
///
/// Numbers pass through; strings are trimmed and parsed as decimals. Blank
/// strings, `null`, booleans, containers and non-finite spellings like
/// `"Infinity"` or `"NaN"` yield `None`.
pub fn coerce_to_number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            let decimal = !trimmed.is_empty()
                && trimmed
                    .bytes()
                    .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'));
            if decimal {
                trimmed.parse::<f64>().ok()
            } else {
                None
            }
        }
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn text_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).filter(|v| is_truthy(v)).map(coerce_to_string)
}

fn read_location(raw: &Value) -> Location {
    let Some(location) = raw.get("location").filter(|v| v.is_object()) else {
        return Location::unknown();
    };
    match (
        coerce_to_number(location.get("lat")),
        coerce_to_number(location.get("lng")),
    ) {
        (Some(lat), Some(lng)) => Location::new(lat, lng),
        _ => Location::unknown(),
    }
}

/// Whether a normalized record can be placed on the map.
pub fn is_valid_for_marker(client: &ClientRecord) -> bool {
    client.coordinates().is_some()
}

/// Marker check over an untyped value: `location.lat` and `location.lng`
/// must both be finite JSON numbers. Numeric strings don't count.
pub fn is_valid_marker_value(value: &Value) -> bool {
    let Some(location) = value.get("location").filter(|v| v.is_object()) else {
        return false;
    };
    let finite = |key: &str| {
        location
            .get(key)
            .and_then(Value::as_f64)
            .is_some_and(f64::is_finite)
    };
    finite("lat") && finite("lng")
}

fn raw_records(payload: &Value) -> Result<&[Value]> {
    if let Value::Array(items) = payload {
        return Ok(items.as_slice());
    }
    LIST_KEYS
        .iter()
        .find_map(|key| match payload.get(*key) {
            Some(Value::Array(items)) => Some(items.as_slice()),
            _ => None,
        })
        .ok_or(TrackerError::UnexpectedPayload)
}

/// Turns raw values into [`ClientRecord`]s, drawing ids for records that
/// lack one from `G`.
#[derive(Debug, Default)]
pub struct Normalizer<G = RandomIds> {
    ids: G,
}

impl Normalizer<RandomIds> {
    pub fn new() -> Self {
        Self { ids: RandomIds }
    }
}

impl<G: IdGenerator> Normalizer<G> {
    pub fn with_ids(ids: G) -> Self {
        Self { ids }
    }

    /// Normalizes one raw record. Accepts any value; non-objects behave as
    /// an object with no keys.
    pub fn client(&mut self, raw: &Value) -> ClientRecord {
        let id = match text_field(raw, "id") {
            Some(id) => id,
            None => self.ids.next_id(),
        };

        ClientRecord {
            id,
            name: text_field(raw, "name").unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
            phone: text_field(raw, "phone"),
            email: text_field(raw, "email"),
            billing_address: text_field(raw, "billingAddress"),
            compressor_model: text_field(raw, "compressorModel")
                .unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
            next_maintenance_date: text_field(raw, "nextMaintenanceDate"),
            location: read_location(raw),
        }
    }

    /// Normalizes a top-level API response: a bare array, or an object with
    /// a `clients` or `data` array.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::UnexpectedPayload`] when no record list can be
    /// found.
    pub fn payload(&mut self, payload: &Value) -> Result<Vec<ClientRecord>> {
        let raw = raw_records(payload)?;
        let records: Vec<ClientRecord> = raw.iter().map(|r| self.client(r)).collect();
        debug!(count = records.len(), "normalized client payload");
        Ok(records)
    }
}

/// [`Normalizer::client`] with random fallback ids.
pub fn normalize_client(raw: &Value) -> ClientRecord {
    Normalizer::new().client(raw)
}

/// [`Normalizer::payload`] with random fallback ids.
///
/// # Errors
///
/// Returns [`TrackerError::UnexpectedPayload`] when no record list can be
/// found.
pub fn normalize_clients_payload(payload: &Value) -> Result<Vec<ClientRecord>> {
    Normalizer::new().payload(payload)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
