use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clinic_slots_core::models::{Appointment, AppointmentStatus, TimeOff, WeeklyAvailability};
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWeeklyAvailability {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeOff {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub patient_id: Uuid,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbWeeklyAvailability> for WeeklyAvailability {
    fn from(row: DbWeeklyAvailability) -> Self {
        Self {
            id: row.id,
            doctor_id: row.doctor_id,
            clinic_id: row.clinic_id,
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
            slot_duration_minutes: row.slot_duration_minutes,
            is_active: row.is_active,
        }
    }
}

impl From<DbTimeOff> for TimeOff {
    fn from(row: DbTimeOff) -> Self {
        Self {
            id: row.id,
            doctor_id: row.doctor_id,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
        }
    }
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = eyre::Report;

    fn try_from(row: DbAppointment) -> Result<Self> {
        let status = row
            .status
            .parse::<AppointmentStatus>()
            .map_err(|e| eyre!("Appointment {} has a corrupt status: {}", row.id, e))?;

        Ok(Self {
            id: row.id,
            doctor_id: row.doctor_id,
            clinic_id: row.clinic_id,
            patient_id: row.patient_id,
            appointment_date: row.appointment_date,
            start_time: row.start_time,
            end_time: row.end_time,
            status,
            created_at: row.created_at,
        })
    }
}
