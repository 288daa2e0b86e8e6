//! # Availability Handlers
//!
//! Read and edit a doctor's recurring weekly windows at a clinic. Any edit
//! drops the doctor's cached day schedules.

use axum::{
    Json,
    extract::{Path, State},
};
use clinic_slots_core::models::{WeeklyAvailability, availability::UpsertAvailabilityRequest};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_availability(
    State(state): State<Arc<ApiState>>,
    Path((doctor_id, clinic_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<WeeklyAvailability>>, AppError> {
    let rows = state
        .repository
        .list_availability(doctor_id, clinic_id)
        .await?;

    Ok(Json(rows))
}

/// Creates or replaces the window of one weekday
///
/// # Endpoint
///
/// ```text
/// PUT /api/doctors/:doctor_id/clinics/:clinic_id/availability/:day_of_week
/// ```
///
/// # Errors
///
/// * `SchedulingError::Validation` - weekday outside 0..=6, non-positive slot
///   duration, or a window whose end is not after its start
#[axum::debug_handler]
pub async fn upsert_availability(
    State(state): State<Arc<ApiState>>,
    Path((doctor_id, clinic_id, day_of_week)): Path<(Uuid, Uuid, i32)>,
    Json(payload): Json<UpsertAvailabilityRequest>,
) -> Result<Json<WeeklyAvailability>, AppError> {
    payload.validate(day_of_week)?;

    let availability = state
        .repository
        .upsert_availability(doctor_id, clinic_id, day_of_week, payload)
        .await?;

    let dropped = state.slot_cache.invalidate_doctor(doctor_id).await;
    info!(
        "Availability updated: doctor={}, clinic={}, day={}, cache entries dropped={}",
        doctor_id, clinic_id, day_of_week, dropped
    );

    Ok(Json(availability))
}
