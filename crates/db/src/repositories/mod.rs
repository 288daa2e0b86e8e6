//! Repository functions per table, plus the `ScheduleRepository` seam the API
//! talks to so handlers can be exercised against a mock.

pub mod appointment;
pub mod availability;
pub mod time_off;

use async_trait::async_trait;
use chrono::NaiveDate;
use clinic_slots_core::models::{
    Appointment, BookedRange, TimeOff, WeeklyAvailability,
    appointment::NewAppointment, availability::UpsertAvailabilityRequest,
    time_off::CreateTimeOffRequest,
};
use eyre::Result;
use uuid::Uuid;

use crate::DbPool;

/// Storage operations needed to compute and book appointment slots.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// The window of `day_of_week` (0 = Sunday), if the doctor configured one.
    async fn availability_for_day(
        &self,
        doctor_id: Uuid,
        clinic_id: Uuid,
        day_of_week: i32,
    ) -> Result<Option<WeeklyAvailability>>;

    async fn list_availability(
        &self,
        doctor_id: Uuid,
        clinic_id: Uuid,
    ) -> Result<Vec<WeeklyAvailability>>;

    async fn upsert_availability(
        &self,
        doctor_id: Uuid,
        clinic_id: Uuid,
        day_of_week: i32,
        request: UpsertAvailabilityRequest,
    ) -> Result<WeeklyAvailability>;

    /// Time off ranges of the doctor that include `date`.
    async fn time_off_covering(&self, doctor_id: Uuid, date: NaiveDate) -> Result<Vec<TimeOff>>;

    async fn list_time_off(&self, doctor_id: Uuid) -> Result<Vec<TimeOff>>;

    async fn create_time_off(
        &self,
        doctor_id: Uuid,
        request: CreateTimeOffRequest,
    ) -> Result<TimeOff>;

    /// Returns false when no such time off belongs to the doctor.
    async fn delete_time_off(&self, doctor_id: Uuid, id: Uuid) -> Result<bool>;

    /// Non-cancelled appointment ranges on `date`.
    async fn booked_ranges(
        &self,
        doctor_id: Uuid,
        clinic_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<BookedRange>>;

    async fn appointment_by_id(&self, id: Uuid) -> Result<Option<Appointment>>;

    /// Returns `None` if a live appointment already holds the same start.
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<Option<Appointment>>;

    /// Returns `None` if the appointment does not exist or is no longer scheduled.
    async fn cancel_appointment(&self, id: Uuid) -> Result<Option<Appointment>>;
}

/// `ScheduleRepository` backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgScheduleRepository {
    pool: DbPool,
}

impl PgScheduleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleRepository for PgScheduleRepository {
    async fn availability_for_day(
        &self,
        doctor_id: Uuid,
        clinic_id: Uuid,
        day_of_week: i32,
    ) -> Result<Option<WeeklyAvailability>> {
        let row =
            availability::get_availability_for_day(&self.pool, doctor_id, clinic_id, day_of_week)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn list_availability(
        &self,
        doctor_id: Uuid,
        clinic_id: Uuid,
    ) -> Result<Vec<WeeklyAvailability>> {
        let rows = availability::list_availability(&self.pool, doctor_id, clinic_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn upsert_availability(
        &self,
        doctor_id: Uuid,
        clinic_id: Uuid,
        day_of_week: i32,
        request: UpsertAvailabilityRequest,
    ) -> Result<WeeklyAvailability> {
        let row = availability::upsert_availability(
            &self.pool,
            doctor_id,
            clinic_id,
            day_of_week,
            request.start_time,
            request.end_time,
            request.slot_duration_minutes,
            request.is_active,
        )
        .await?;
        Ok(row.into())
    }

    async fn time_off_covering(&self, doctor_id: Uuid, date: NaiveDate) -> Result<Vec<TimeOff>> {
        let rows = time_off::get_time_off_covering(&self.pool, doctor_id, date).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_time_off(&self, doctor_id: Uuid) -> Result<Vec<TimeOff>> {
        let rows = time_off::list_time_off(&self.pool, doctor_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_time_off(
        &self,
        doctor_id: Uuid,
        request: CreateTimeOffRequest,
    ) -> Result<TimeOff> {
        let row = time_off::create_time_off(
            &self.pool,
            doctor_id,
            request.start_date,
            request.end_date,
            request.reason.as_deref(),
        )
        .await?;
        Ok(row.into())
    }

    async fn delete_time_off(&self, doctor_id: Uuid, id: Uuid) -> Result<bool> {
        time_off::delete_time_off(&self.pool, doctor_id, id).await
    }

    async fn booked_ranges(
        &self,
        doctor_id: Uuid,
        clinic_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<BookedRange>> {
        let ranges = appointment::get_booked_ranges(&self.pool, doctor_id, clinic_id, date).await?;
        Ok(ranges
            .into_iter()
            .map(|(start, end)| BookedRange::new(start, end))
            .collect())
    }

    async fn appointment_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        appointment::get_appointment_by_id(&self.pool, id)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn create_appointment(&self, new: NewAppointment) -> Result<Option<Appointment>> {
        appointment::create_appointment(&self.pool, &new)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn cancel_appointment(&self, id: Uuid) -> Result<Option<Appointment>> {
        appointment::cancel_appointment(&self.pool, id)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }
}
