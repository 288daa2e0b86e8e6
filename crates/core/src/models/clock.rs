//! Wall-clock time format shared by every model that carries a time of day.
//!
//! Times travel as `"HH:MM"`; `"HH:MM:SS"` is accepted on input and emitted
//! only when the seconds are non-zero. Use with `#[serde(with = "clock")]`.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

use crate::errors::{SchedulingError, SchedulingResult};

/// Parses `"HH:MM"` or `"HH:MM:SS"` into a clock time.
///
/// # Errors
///
/// * `SchedulingError::Validation` - the string is not a valid time of day
pub fn parse_clock_time(value: &str) -> SchedulingResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| {
            SchedulingError::Validation(format!(
                "Invalid time '{}': expected HH:MM or HH:MM:SS",
                value
            ))
        })
}

pub fn format_clock_time(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_clock_time(*time))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_clock_time(&raw).map_err(D::Error::custom)
}
