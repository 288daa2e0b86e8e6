use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clinic_slots_core::{
    errors::SchedulingError,
    models::{TimeOff, time_off::CreateTimeOffRequest},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_time_off(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Vec<TimeOff>>, AppError> {
    let time_off = state
        .repository
        .list_time_off(doctor_id)
        .await?;

    Ok(Json(time_off))
}

#[axum::debug_handler]
pub async fn create_time_off(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
    Json(payload): Json<CreateTimeOffRequest>,
) -> Result<(StatusCode, Json<TimeOff>), AppError> {
    payload.validate()?;

    let time_off = state
        .repository
        .create_time_off(doctor_id, payload)
        .await?;

    state.slot_cache.invalidate_doctor(doctor_id).await;
    info!(
        "Time off created: doctor={}, {}..={}",
        doctor_id, time_off.start_date, time_off.end_date
    );

    Ok((StatusCode::CREATED, Json(time_off)))
}

#[axum::debug_handler]
pub async fn delete_time_off(
    State(state): State<Arc<ApiState>>,
    Path((doctor_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .repository
        .delete_time_off(doctor_id, id)
        .await?;

    if !deleted {
        return Err(AppError(SchedulingError::NotFound(format!(
            "Time off with ID {} not found for doctor {}",
            id, doctor_id
        ))));
    }

    state.slot_cache.invalidate_doctor(doctor_id).await;
    info!("Time off deleted: doctor={}, id={}", doctor_id, id);

    Ok(StatusCode::NO_CONTENT)
}
