use axum::{
    Json,
    extract::{Path, State},
};
use clinic_slots_api::{
    cache::SlotCacheKey,
    handlers::availability::{list_availability, upsert_availability},
};
use clinic_slots_core::{
    errors::SchedulingError,
    models::{DaySchedule, WeeklyAvailability, availability::UpsertAvailabilityRequest},
};
use mockall::predicate::{always, eq};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::test_utils::{TestContext, prime, t, upcoming_date};

#[tokio::test]
async fn test_list_availability() {
    let mut ctx = TestContext::new();
    let date = upcoming_date();
    let (doctor_id, clinic_id) = (ctx.doctor_id, ctx.clinic_id);
    let rows = vec![ctx.availability(date, t(8, 0), t(12, 0), 20)];
    let expected = rows.clone();

    ctx.repo
        .expect_list_availability()
        .with(eq(doctor_id), eq(clinic_id))
        .times(1)
        .returning(move |_, _| Ok(rows.clone()));

    let state = ctx.build_state();
    let Json(listed) = list_availability(State(state), Path((doctor_id, clinic_id)))
        .await
        .expect("list");

    assert_eq!(listed, expected);
}

#[tokio::test]
async fn test_upsert_availability_invalidates_doctor() {
    let mut ctx = TestContext::new();
    let date = upcoming_date();
    let (doctor_id, clinic_id) = (ctx.doctor_id, ctx.clinic_id);
    let stored = ctx.availability(date, t(9, 0), t(13, 0), 15);
    let returned = stored.clone();

    ctx.repo
        .expect_upsert_availability()
        .with(eq(doctor_id), eq(clinic_id), eq(stored.day_of_week), always())
        .times(1)
        .returning(move |_, _, _, _| Ok(returned.clone()));

    let state = ctx.build_state();
    let other_doctor = Uuid::new_v4();
    prime(
        &state.slot_cache,
        SlotCacheKey::new(doctor_id, clinic_id, date),
        DaySchedule::default(),
    )
    .await;
    prime(
        &state.slot_cache,
        SlotCacheKey::new(doctor_id, Uuid::new_v4(), date),
        DaySchedule::default(),
    )
    .await;
    prime(
        &state.slot_cache,
        SlotCacheKey::new(other_doctor, clinic_id, date),
        DaySchedule::default(),
    )
    .await;

    let request = UpsertAvailabilityRequest {
        start_time: t(9, 0),
        end_time: t(13, 0),
        slot_duration_minutes: 15,
        is_active: true,
    };
    let Json(saved): Json<WeeklyAvailability> = upsert_availability(
        State(state.clone()),
        Path((doctor_id, clinic_id, stored.day_of_week)),
        Json(request),
    )
    .await
    .expect("upsert");

    assert_eq!(saved, stored);
    assert_eq!(state.slot_cache.len().await, 1);
    assert!(
        state
            .slot_cache
            .get(&SlotCacheKey::new(other_doctor, clinic_id, date))
            .await
            .is_some()
    );
}

#[tokio::test]
async fn test_upsert_availability_rejects_zero_duration() {
    let ctx = TestContext::new();
    let (doctor_id, clinic_id) = (ctx.doctor_id, ctx.clinic_id);
    // No repository expectation: the request must be rejected before storage.
    let state = ctx.build_state();

    let request = UpsertAvailabilityRequest {
        start_time: t(9, 0),
        end_time: t(13, 0),
        slot_duration_minutes: 0,
        is_active: true,
    };
    let result = upsert_availability(
        State(state),
        Path((doctor_id, clinic_id, 2)),
        Json(request),
    )
    .await;

    match result {
        Err(err) => assert!(matches!(err.0, SchedulingError::Validation(_))),
        Ok(_) => panic!("Expected validation error"),
    }
}

#[tokio::test]
async fn test_upsert_availability_rejects_bad_weekday() {
    let ctx = TestContext::new();
    let (doctor_id, clinic_id) = (ctx.doctor_id, ctx.clinic_id);
    let state = ctx.build_state();

    let request = UpsertAvailabilityRequest {
        start_time: t(9, 0),
        end_time: t(13, 0),
        slot_duration_minutes: 30,
        is_active: true,
    };
    let result = upsert_availability(
        State(state),
        Path((doctor_id, clinic_id, 9)),
        Json(request),
    )
    .await;

    assert!(result.is_err());
}
