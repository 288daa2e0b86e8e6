//! # Appointment Handlers
//!
//! Booking re-runs the slot calculator on freshly fetched data and only
//! accepts a start time that is an available slot; the slot also fixes the end
//! time. Both booking and cancellation invalidate the affected day in the
//! slot cache.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clinic_slots_core::{
    errors::SchedulingError,
    models::{
        Appointment, AppointmentStatus,
        appointment::{BookAppointmentRequest, NewAppointment},
        clock::format_clock_time,
    },
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    ApiState, cache::SlotCacheKey, handlers::slots::fetch_day_schedule,
    middleware::error_handling::AppError,
};

/// Books the slot starting at `start_time`
///
/// # Endpoint
///
/// ```text
/// POST /api/appointments
/// ```
///
/// # Errors
///
/// * `SchedulingError::Validation` - the date is in the past, or no slot
///   starts at the requested time
/// * `SchedulingError::Conflict` - the slot is booked, already started, or was
///   taken by a concurrent booking
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let now = state.local_now();
    if payload.appointment_date < now.date() {
        return Err(AppError(SchedulingError::Validation(format!(
            "Cannot book an appointment on {}, which is in the past",
            payload.appointment_date
        ))));
    }

    let key = SlotCacheKey::new(
        payload.doctor_id,
        payload.clinic_id,
        payload.appointment_date,
    );
    let schedule = fetch_day_schedule(&state, key).await?;
    let slots = schedule.slots(payload.appointment_date, now)?;

    let slot = slots
        .iter()
        .find(|slot| slot.start_time == payload.start_time)
        .ok_or_else(|| {
            SchedulingError::Validation(format!(
                "No slot starts at {} on {}",
                format_clock_time(payload.start_time),
                payload.appointment_date
            ))
        })?;

    if !slot.is_available {
        return Err(AppError(SchedulingError::Conflict(format!(
            "Slot {}-{} on {} is not available",
            format_clock_time(slot.start_time),
            format_clock_time(slot.end_time),
            payload.appointment_date
        ))));
    }

    let new_appointment = NewAppointment {
        doctor_id: payload.doctor_id,
        clinic_id: payload.clinic_id,
        patient_id: payload.patient_id,
        appointment_date: payload.appointment_date,
        start_time: slot.start_time,
        end_time: slot.end_time,
    };

    let created = state
        .repository
        .create_appointment(new_appointment)
        .await?;

    // Either way the cached day no longer matches storage.
    state.slot_cache.invalidate(&key).await;

    let appointment = created.ok_or_else(|| {
        warn!(
            "Booking race lost: doctor={}, date={}, start={}",
            payload.doctor_id, payload.appointment_date, payload.start_time
        );
        SchedulingError::Conflict(format!(
            "Slot starting at {} on {} was just booked",
            format_clock_time(payload.start_time),
            payload.appointment_date
        ))
    })?;

    info!(
        "Appointment booked: id={}, doctor={}, date={}, {}-{}",
        appointment.id,
        appointment.doctor_id,
        appointment.appointment_date,
        appointment.start_time,
        appointment.end_time
    );

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Cancels an appointment and frees its slot
///
/// # Endpoint
///
/// ```text
/// POST /api/appointments/:id/cancel
/// ```
///
/// # Errors
///
/// * `SchedulingError::NotFound` - no appointment with this ID
/// * `SchedulingError::Conflict` - the appointment is already cancelled or completed
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let existing = state
        .repository
        .appointment_by_id(id)
        .await?
        .ok_or_else(|| SchedulingError::NotFound(format!("Appointment with ID {} not found", id)))?;

    if existing.status != AppointmentStatus::Scheduled {
        return Err(AppError(SchedulingError::Conflict(format!(
            "Appointment {} is {}, only scheduled appointments can be cancelled",
            id, existing.status
        ))));
    }

    // A concurrent cancel may win between the read above and this update.
    let cancelled = state
        .repository
        .cancel_appointment(id)
        .await?
        .ok_or_else(|| {
            warn!("Cancellation race lost: id={}", id);
            SchedulingError::Conflict(format!("Appointment {} is no longer scheduled", id))
        })?;

    state
        .slot_cache
        .invalidate(&SlotCacheKey::new(
            cancelled.doctor_id,
            cancelled.clinic_id,
            cancelled.appointment_date,
        ))
        .await;
    info!("Appointment cancelled: id={}", id);

    Ok(Json(cancelled))
}
