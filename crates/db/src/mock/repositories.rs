use async_trait::async_trait;
use chrono::NaiveDate;
use clinic_slots_core::models::{
    Appointment, BookedRange, TimeOff, WeeklyAvailability,
    appointment::NewAppointment, availability::UpsertAvailabilityRequest,
    time_off::CreateTimeOffRequest,
};
use mockall::mock;
use uuid::Uuid;

use crate::repositories::ScheduleRepository;

// Mock repository for testing
mock! {
    pub ScheduleRepo {}

    #[async_trait]
    impl ScheduleRepository for ScheduleRepo {
        async fn availability_for_day(
            &self,
            doctor_id: Uuid,
            clinic_id: Uuid,
            day_of_week: i32,
        ) -> eyre::Result<Option<WeeklyAvailability>>;

        async fn list_availability(
            &self,
            doctor_id: Uuid,
            clinic_id: Uuid,
        ) -> eyre::Result<Vec<WeeklyAvailability>>;

        async fn upsert_availability(
            &self,
            doctor_id: Uuid,
            clinic_id: Uuid,
            day_of_week: i32,
            request: UpsertAvailabilityRequest,
        ) -> eyre::Result<WeeklyAvailability>;

        async fn time_off_covering(
            &self,
            doctor_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Vec<TimeOff>>;

        async fn list_time_off(&self, doctor_id: Uuid) -> eyre::Result<Vec<TimeOff>>;

        async fn create_time_off(
            &self,
            doctor_id: Uuid,
            request: CreateTimeOffRequest,
        ) -> eyre::Result<TimeOff>;

        async fn delete_time_off(&self, doctor_id: Uuid, id: Uuid) -> eyre::Result<bool>;

        async fn booked_ranges(
            &self,
            doctor_id: Uuid,
            clinic_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Vec<BookedRange>>;

        async fn appointment_by_id(&self, id: Uuid) -> eyre::Result<Option<Appointment>>;

        async fn create_appointment(
            &self,
            appointment: NewAppointment,
        ) -> eyre::Result<Option<Appointment>>;

        async fn cancel_appointment(&self, id: Uuid) -> eyre::Result<Option<Appointment>>;
    }
}
