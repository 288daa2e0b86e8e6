//! # Slot Handlers
//!
//! Serves the bookable slots of a doctor at a clinic for one date.
//!
//! The three inputs of the calculator (weekly availability for the weekday,
//! booked ranges, covering time off) are fetched concurrently on a cache miss
//! and kept in the `SlotCache`. Slots themselves are recomputed on every
//! request so that slots which have started since the fetch turn unavailable.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use clinic_slots_core::{
    errors::SchedulingError,
    models::{DaySchedule, SlotsResponse, weekday_index},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{ApiState, cache::SlotCacheKey, middleware::error_handling::AppError};

/// Query parameters for the slot listing endpoint
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    /// Calendar date to list slots for (YYYY-MM-DD)
    pub date: NaiveDate,

    /// Hide slots that are booked or already started
    #[serde(default)]
    pub only_available: bool,
}

/// Lists the slots of a doctor at a clinic on a date
///
/// # Endpoint
///
/// ```text
/// GET /api/doctors/:doctor_id/clinics/:clinic_id/slots?date=2030-03-12&only_available=true
/// ```
///
/// An empty list is a normal answer: no availability configured for the
/// weekday, or the doctor is on leave.
///
/// # Errors
///
/// * `SchedulingError::Validation` - the stored availability row is malformed
/// * `SchedulingError::Database` - a lookup failed
#[axum::debug_handler]
pub async fn get_slots(
    State(state): State<Arc<ApiState>>,
    Path((doctor_id, clinic_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let key = SlotCacheKey::new(doctor_id, clinic_id, query.date);
    let schedule = cached_day_schedule(&state, key).await?;

    let mut slots = schedule.slots(query.date, state.local_now())?;
    if query.only_available {
        slots.retain(|slot| slot.is_available);
    }

    Ok(Json(SlotsResponse {
        doctor_id,
        clinic_id,
        date: query.date,
        slots,
    }))
}

/// Fetches the calculator inputs straight from storage, bypassing the cache.
pub async fn fetch_day_schedule(
    state: &ApiState,
    key: SlotCacheKey,
) -> Result<DaySchedule, SchedulingError> {
    let repository = &state.repository;
    let day_of_week = weekday_index(key.date);

    let (availability, booked, time_off) = tokio::try_join!(
        repository.availability_for_day(key.doctor_id, key.clinic_id, day_of_week),
        repository.booked_ranges(key.doctor_id, key.clinic_id, key.date),
        repository.time_off_covering(key.doctor_id, key.date),
    )?;

    Ok(DaySchedule {
        availability,
        booked,
        time_off,
    })
}

/// Returns the cached inputs for `key`, fetching and caching them on a miss.
pub async fn cached_day_schedule(
    state: &ApiState,
    key: SlotCacheKey,
) -> Result<DaySchedule, SchedulingError> {
    if let Some(schedule) = state.slot_cache.get(&key).await {
        debug!(
            "Slot cache hit: doctor={}, clinic={}, date={}",
            key.doctor_id, key.clinic_id, key.date
        );
        return Ok(schedule);
    }

    let generation = state.slot_cache.generation().await;
    let schedule = fetch_day_schedule(state, key).await?;
    state
        .slot_cache
        .insert(key, schedule.clone(), generation)
        .await;
    Ok(schedule)
}
