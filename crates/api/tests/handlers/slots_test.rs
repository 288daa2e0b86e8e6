use axum::extract::{Path, Query, State};
use chrono::{Duration, NaiveDate};
use clinic_slots_core::{
    errors::SchedulingError,
    models::{BookedRange, TimeOff, weekday_index},
};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::test_utils::{TestContext, t, upcoming_date};
use clinic_slots_api::handlers::slots::{SlotsQuery, get_slots};

fn query(date: NaiveDate, only_available: bool) -> Query<SlotsQuery> {
    Query(SlotsQuery {
        date,
        only_available,
    })
}

#[tokio::test]
async fn test_get_slots_marks_booked_slot() {
    let mut ctx = TestContext::new();
    let date = upcoming_date();
    let (doctor_id, clinic_id) = (ctx.doctor_id, ctx.clinic_id);
    let availability = ctx.availability(date, t(9, 0), t(12, 0), 30);

    ctx.repo
        .expect_availability_for_day()
        .with(eq(doctor_id), eq(clinic_id), eq(weekday_index(date)))
        .times(1)
        .returning(move |_, _, _| Ok(Some(availability.clone())));
    ctx.repo
        .expect_booked_ranges()
        .with(eq(doctor_id), eq(clinic_id), eq(date))
        .times(1)
        .returning(|_, _, _| Ok(vec![BookedRange::new(t(10, 0), t(10, 30))]));
    ctx.repo
        .expect_time_off_covering()
        .with(eq(doctor_id), eq(date))
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let state = ctx.build_state();
    let response = get_slots(State(state), Path((doctor_id, clinic_id)), query(date, false))
        .await
        .expect("slots");

    assert_eq!(response.date, date);
    assert_eq!(response.slots.len(), 6);
    let unavailable: Vec<_> = response
        .slots
        .iter()
        .filter(|slot| !slot.is_available)
        .map(|slot| slot.start_time)
        .collect();
    assert_eq!(unavailable, vec![t(10, 0)]);
}

#[tokio::test]
async fn test_get_slots_only_available_filters() {
    let mut ctx = TestContext::new();
    let date = upcoming_date();
    let (doctor_id, clinic_id) = (ctx.doctor_id, ctx.clinic_id);
    let availability = ctx.availability(date, t(9, 0), t(10, 0), 20);

    ctx.repo
        .expect_availability_for_day()
        .returning(move |_, _, _| Ok(Some(availability.clone())));
    ctx.repo
        .expect_booked_ranges()
        .returning(|_, _, _| Ok(vec![BookedRange::new(t(9, 20), t(9, 40))]));
    ctx.repo
        .expect_time_off_covering()
        .returning(|_, _| Ok(Vec::new()));

    let state = ctx.build_state();
    let response = get_slots(State(state), Path((doctor_id, clinic_id)), query(date, true))
        .await
        .expect("slots");

    let starts: Vec<_> = response.slots.iter().map(|slot| slot.start_time).collect();
    assert_eq!(starts, vec![t(9, 0), t(9, 40)]);
    assert!(response.slots.iter().all(|slot| slot.is_available));
}

#[tokio::test]
async fn test_get_slots_empty_when_on_leave() {
    let mut ctx = TestContext::new();
    let date = upcoming_date();
    let (doctor_id, clinic_id) = (ctx.doctor_id, ctx.clinic_id);
    let availability = ctx.availability(date, t(9, 0), t(17, 0), 15);

    ctx.repo
        .expect_availability_for_day()
        .returning(move |_, _, _| Ok(Some(availability.clone())));
    ctx.repo
        .expect_booked_ranges()
        .returning(|_, _, _| Ok(Vec::new()));
    ctx.repo.expect_time_off_covering().returning(move |doctor_id, _| {
        Ok(vec![TimeOff {
            id: Uuid::new_v4(),
            doctor_id,
            start_date: date - Duration::days(2),
            end_date: date + Duration::days(2),
            reason: Some("Holiday".to_string()),
        }])
    });

    let state = ctx.build_state();
    let response = get_slots(State(state), Path((doctor_id, clinic_id)), query(date, false))
        .await
        .expect("slots");

    assert!(response.slots.is_empty());
}

#[tokio::test]
async fn test_get_slots_empty_without_availability() {
    let mut ctx = TestContext::new();
    let date = upcoming_date();
    let (doctor_id, clinic_id) = (ctx.doctor_id, ctx.clinic_id);

    ctx.repo
        .expect_availability_for_day()
        .returning(|_, _, _| Ok(None));
    ctx.repo
        .expect_booked_ranges()
        .returning(|_, _, _| Ok(Vec::new()));
    ctx.repo
        .expect_time_off_covering()
        .returning(|_, _| Ok(Vec::new()));

    let state = ctx.build_state();
    let response = get_slots(State(state), Path((doctor_id, clinic_id)), query(date, false))
        .await
        .expect("slots");

    assert!(response.slots.is_empty());
}

#[tokio::test]
async fn test_get_slots_served_from_cache() {
    let mut ctx = TestContext::new();
    let date = upcoming_date();
    let (doctor_id, clinic_id) = (ctx.doctor_id, ctx.clinic_id);
    let availability = ctx.availability(date, t(13, 0), t(14, 0), 30);

    // Each lookup may run once; the second request must come from the cache.
    ctx.repo
        .expect_availability_for_day()
        .times(1)
        .returning(move |_, _, _| Ok(Some(availability.clone())));
    ctx.repo
        .expect_booked_ranges()
        .times(1)
        .returning(|_, _, _| Ok(Vec::new()));
    ctx.repo
        .expect_time_off_covering()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let state = ctx.build_state();
    let first = get_slots(
        State(state.clone()),
        Path((doctor_id, clinic_id)),
        query(date, false),
    )
    .await
    .expect("first");
    let second = get_slots(
        State(state.clone()),
        Path((doctor_id, clinic_id)),
        query(date, false),
    )
    .await
    .expect("second");

    assert_eq!(first.slots, second.slots);
    assert_eq!(state.slot_cache.len().await, 1);
}

#[tokio::test]
async fn test_get_slots_rejects_broken_availability() {
    let mut ctx = TestContext::new();
    let date = upcoming_date();
    let (doctor_id, clinic_id) = (ctx.doctor_id, ctx.clinic_id);
    let availability = ctx.availability(date, t(9, 0), t(12, 0), 0);

    ctx.repo
        .expect_availability_for_day()
        .returning(move |_, _, _| Ok(Some(availability.clone())));
    ctx.repo
        .expect_booked_ranges()
        .returning(|_, _, _| Ok(Vec::new()));
    ctx.repo
        .expect_time_off_covering()
        .returning(|_, _| Ok(Vec::new()));

    let state = ctx.build_state();
    let result = get_slots(State(state), Path((doctor_id, clinic_id)), query(date, false)).await;

    match result {
        Err(err) => assert!(matches!(err.0, SchedulingError::Validation(_))),
        Ok(_) => panic!("Expected validation error"),
    }
}

#[tokio::test]
async fn test_get_slots_database_failure() {
    let mut ctx = TestContext::new();
    let date = upcoming_date();
    let (doctor_id, clinic_id) = (ctx.doctor_id, ctx.clinic_id);

    ctx.repo
        .expect_availability_for_day()
        .returning(|_, _, _| Err(eyre::eyre!("connection reset")));
    ctx.repo
        .expect_booked_ranges()
        .returning(|_, _, _| Ok(Vec::new()));
    ctx.repo
        .expect_time_off_covering()
        .returning(|_, _| Ok(Vec::new()));

    let state = ctx.build_state();
    let result = get_slots(
        State(state.clone()),
        Path((doctor_id, clinic_id)),
        query(date, false),
    )
    .await;

    match result {
        Err(err) => assert!(matches!(err.0, SchedulingError::Database(_))),
        Ok(_) => panic!("Expected database error"),
    }
    assert!(state.slot_cache.is_empty().await);
}
