use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BookedRange, TimeOff, WeeklyAvailability, clock};
use crate::errors::SchedulingResult;

/// One bookable interval of a day. Computed on request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(with = "clock")]
    pub start_time: NaiveTime,
    #[serde(with = "clock")]
    pub end_time: NaiveTime,
    pub is_available: bool,
}

/// Everything the slot calculator needs for one doctor, clinic and date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySchedule {
    pub availability: Option<WeeklyAvailability>,
    pub booked: Vec<BookedRange>,
    pub time_off: Vec<TimeOff>,
}

impl DaySchedule {
    pub fn slots(&self, date: NaiveDate, now: NaiveDateTime) -> SchedulingResult<Vec<Slot>> {
        crate::slots::compute_slots(
            self.availability.as_ref(),
            &self.booked,
            &self.time_off,
            date,
            now,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}
