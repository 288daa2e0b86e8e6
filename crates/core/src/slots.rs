//! # Slot Calculator
//!
//! Turns a doctor's weekly availability window into the bookable slots of a
//! single date:
//!
//! 1. No (active) availability row for the weekday yields no slots
//! 2. Time off covering the date yields no slots, whatever the availability says
//! 3. The window is cut into fixed-length slots from its start; a remainder
//!    shorter than one slot is dropped
//! 4. A slot is unavailable when it overlaps a booked range, or when the date
//!    is today and the slot starts before the current time of day
//!
//! Every generated slot is returned, earliest first; callers decide whether to
//! hide the unavailable ones.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::{
    errors::{SchedulingError, SchedulingResult},
    models::{BookedRange, Slot, TimeOff, WeeklyAvailability, weekday_index},
};

/// Computes the slots of `target_date`.
///
/// `now` is the current wall-clock time at the clinic; it only matters when
/// `target_date` is today.
///
/// # Errors
///
/// * `SchedulingError::Validation` - the availability row has a non-positive
///   slot duration, an empty or inverted window, or belongs to another weekday
pub fn compute_slots(
    availability: Option<&WeeklyAvailability>,
    booked_ranges: &[BookedRange],
    time_off: &[TimeOff],
    target_date: NaiveDate,
    now: NaiveDateTime,
) -> SchedulingResult<Vec<Slot>> {
    let Some(availability) = availability.filter(|a| a.is_active) else {
        return Ok(Vec::new());
    };

    if time_off.iter().any(|leave| leave.covers(target_date)) {
        return Ok(Vec::new());
    }

    availability.validate()?;

    let weekday = weekday_index(target_date);
    if availability.day_of_week != weekday {
        return Err(SchedulingError::Validation(format!(
            "Availability for day {} cannot be used for {} (day {})",
            availability.day_of_week, target_date, weekday
        )));
    }

    let step = Duration::minutes(i64::from(availability.slot_duration_minutes));
    let window = availability
        .end_time
        .signed_duration_since(availability.start_time);
    let is_today = target_date == now.date();
    let current_time = now.time();

    // Offsets from the window start never wrap past midnight, unlike NaiveTime addition.
    let mut slots = Vec::new();
    let mut offset = Duration::zero();
    while offset + step <= window {
        let start_time = availability.start_time + offset;
        let end_time = start_time + step;

        let is_booked = booked_ranges
            .iter()
            .any(|booked| booked.overlaps(start_time, end_time));
        let is_past = is_today && start_time < current_time;

        slots.push(Slot {
            start_time,
            end_time,
            is_available: !is_booked && !is_past,
        });
        offset = offset + step;
    }

    Ok(slots)
}
