use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate};
use clinic_slots_api::{
    ApiState,
    cache::{SlotCache, SlotCacheKey},
    handlers::slots::cached_day_schedule,
};
use clinic_slots_core::models::{
    Appointment, BookedRange, TimeOff, WeeklyAvailability, appointment::NewAppointment,
    availability::UpsertAvailabilityRequest, time_off::CreateTimeOffRequest,
};
use clinic_slots_db::ScheduleRepository;
use pretty_assertions::assert_eq;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::test_utils::{TestContext, t, upcoming_date};

/// Serves one availability row and a mutable booking list. The next
/// `booked_ranges` read can be held open until the test releases it.
struct HeldBookingsRepo {
    availability: WeeklyAvailability,
    booked: Mutex<Vec<BookedRange>>,
    hold_next_read: AtomicBool,
    read_started: Notify,
    release_read: Notify,
}

impl HeldBookingsRepo {
    fn new(availability: WeeklyAvailability) -> Self {
        Self {
            availability,
            booked: Mutex::new(Vec::new()),
            hold_next_read: AtomicBool::new(true),
            read_started: Notify::new(),
            release_read: Notify::new(),
        }
    }
}

#[async_trait]
impl ScheduleRepository for HeldBookingsRepo {
    async fn availability_for_day(
        &self,
        _doctor_id: Uuid,
        _clinic_id: Uuid,
        _day_of_week: i32,
    ) -> eyre::Result<Option<WeeklyAvailability>> {
        Ok(Some(self.availability.clone()))
    }

    async fn list_availability(
        &self,
        _doctor_id: Uuid,
        _clinic_id: Uuid,
    ) -> eyre::Result<Vec<WeeklyAvailability>> {
        unimplemented!("not used by slot reads")
    }

    async fn upsert_availability(
        &self,
        _doctor_id: Uuid,
        _clinic_id: Uuid,
        _day_of_week: i32,
        _request: UpsertAvailabilityRequest,
    ) -> eyre::Result<WeeklyAvailability> {
        unimplemented!("not used by slot reads")
    }

    async fn time_off_covering(
        &self,
        _doctor_id: Uuid,
        _date: NaiveDate,
    ) -> eyre::Result<Vec<TimeOff>> {
        Ok(Vec::new())
    }

    async fn list_time_off(&self, _doctor_id: Uuid) -> eyre::Result<Vec<TimeOff>> {
        unimplemented!("not used by slot reads")
    }

    async fn create_time_off(
        &self,
        _doctor_id: Uuid,
        _request: CreateTimeOffRequest,
    ) -> eyre::Result<TimeOff> {
        unimplemented!("not used by slot reads")
    }

    async fn delete_time_off(&self, _doctor_id: Uuid, _id: Uuid) -> eyre::Result<bool> {
        unimplemented!("not used by slot reads")
    }

    async fn booked_ranges(
        &self,
        _doctor_id: Uuid,
        _clinic_id: Uuid,
        _date: NaiveDate,
    ) -> eyre::Result<Vec<BookedRange>> {
        let snapshot = self.booked.lock().unwrap().clone();
        if self.hold_next_read.swap(false, Ordering::SeqCst) {
            self.read_started.notify_one();
            self.release_read.notified().await;
        }
        Ok(snapshot)
    }

    async fn appointment_by_id(&self, _id: Uuid) -> eyre::Result<Option<Appointment>> {
        unimplemented!("not used by slot reads")
    }

    async fn create_appointment(
        &self,
        _appointment: NewAppointment,
    ) -> eyre::Result<Option<Appointment>> {
        unimplemented!("not used by slot reads")
    }

    async fn cancel_appointment(&self, _id: Uuid) -> eyre::Result<Option<Appointment>> {
        unimplemented!("not used by slot reads")
    }
}

#[tokio::test]
async fn test_booking_during_read_is_not_hidden_by_cache() {
    let ctx = TestContext::new();
    let date = upcoming_date();
    let key = SlotCacheKey::new(ctx.doctor_id, ctx.clinic_id, date);
    let repo = Arc::new(HeldBookingsRepo::new(ctx.availability(
        date,
        t(9, 0),
        t(11, 0),
        30,
    )));
    let state = Arc::new(ApiState::new(
        repo.clone(),
        SlotCache::new(Duration::from_secs(60)),
        FixedOffset::east_opt(0).unwrap(),
    ));

    let reader = tokio::spawn({
        let state = state.clone();
        async move { cached_day_schedule(&state, key).await }
    });

    // The read has taken its snapshot; a booking lands and invalidates the day.
    repo.read_started.notified().await;
    repo.booked
        .lock()
        .unwrap()
        .push(BookedRange::new(t(9, 0), t(9, 30)));
    state.slot_cache.invalidate(&key).await;
    repo.release_read.notify_one();

    let in_flight = reader.await.expect("reader task").expect("schedule");
    assert!(in_flight.booked.is_empty());
    assert!(state.slot_cache.get(&key).await.is_none());

    let fresh = cached_day_schedule(&state, key).await.expect("schedule");
    assert_eq!(fresh.booked, vec![BookedRange::new(t(9, 0), t(9, 30))]);
    assert_eq!(state.slot_cache.get(&key).await, Some(fresh));
}
