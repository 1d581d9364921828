use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::FlightError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub departure_date: String,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub seats_available: u32,
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub aircraft_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_status: Option<String>,
}

/// Accepts either a bare array of flights or a page object carrying a
/// `content` array. Any other JSON shape yields an empty list.
pub fn parse_flights(body: &str) -> Result<Vec<Flight>, FlightError> {
    let value: Value = serde_json::from_str(body)?;
    flights_from_value(value)
}

pub fn flights_from_value(value: Value) -> Result<Vec<Flight>, FlightError> {
    let items = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("content") {
            Some(content @ Value::Array(_)) => content,
            _ => {
                warn!("flight response object has no content array");
                return Ok(Vec::new());
            }
        },
        other => {
            warn!(kind = json_kind(&other), "unexpected flight response shape");
            return Ok(Vec::new());
        }
    };

    Ok(serde_json::from_value(items)?)
}

pub fn parse_cities(body: &str) -> Result<Vec<String>, FlightError> {
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        other => Err(FlightError::Parse(format!(
            "expected a list of cities, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
