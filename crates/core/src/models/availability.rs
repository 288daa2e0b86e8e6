use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clock;
use crate::errors::{SchedulingError, SchedulingResult};

/// A doctor's recurring opening window for one weekday at one clinic.
///
/// `day_of_week` counts from Sunday (0) to Saturday (6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAvailability {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub day_of_week: i32,
    #[serde(with = "clock")]
    pub start_time: NaiveTime,
    #[serde(with = "clock")]
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
    pub is_active: bool,
}

impl WeeklyAvailability {
    pub fn validate(&self) -> SchedulingResult<()> {
        validate_window(
            self.day_of_week,
            self.start_time,
            self.end_time,
            self.slot_duration_minutes,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertAvailabilityRequest {
    #[serde(with = "clock")]
    pub start_time: NaiveTime,
    #[serde(with = "clock")]
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl UpsertAvailabilityRequest {
    pub fn validate(&self, day_of_week: i32) -> SchedulingResult<()> {
        validate_window(
            day_of_week,
            self.start_time,
            self.end_time,
            self.slot_duration_minutes,
        )
    }
}

/// Checks the shape of an availability window.
///
/// # Errors
///
/// * `SchedulingError::Validation` - weekday outside `0..=6`, non-positive
///   slot duration, or an end time not after the start time
pub fn validate_window(
    day_of_week: i32,
    start_time: NaiveTime,
    end_time: NaiveTime,
    slot_duration_minutes: i32,
) -> SchedulingResult<()> {
    if !(0..=6).contains(&day_of_week) {
        return Err(SchedulingError::Validation(format!(
            "Day of week must be between 0 (Sunday) and 6 (Saturday), got {}",
            day_of_week
        )));
    }

    if slot_duration_minutes <= 0 {
        return Err(SchedulingError::Validation(format!(
            "Slot duration must be a positive number of minutes, got {}",
            slot_duration_minutes
        )));
    }

    if end_time <= start_time {
        return Err(SchedulingError::Validation(format!(
            "Start time {} must be before end time {}",
            clock::format_clock_time(start_time),
            clock::format_clock_time(end_time)
        )));
    }

    Ok(())
}

/// Weekday of `date` in the Sunday-based numbering used by availability rows.
pub fn weekday_index(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}
