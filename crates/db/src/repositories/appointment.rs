use crate::models::DbAppointment;
use chrono::{NaiveDate, NaiveTime, Utc};
use clinic_slots_core::models::appointment::NewAppointment;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Start and end of every non-cancelled appointment of a doctor at a clinic on `date`.
pub async fn get_booked_ranges(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    clinic_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<(NaiveTime, NaiveTime)>> {
    let ranges = sqlx::query_as::<_, (NaiveTime, NaiveTime)>(
        r#"
        SELECT start_time, end_time
        FROM appointments
        WHERE doctor_id = $1 AND clinic_id = $2 AND appointment_date = $3
          AND status <> 'cancelled'
        ORDER BY start_time ASC
        "#,
    )
    .bind(doctor_id)
    .bind(clinic_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(ranges)
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, doctor_id, clinic_id, patient_id, appointment_date,
               start_time, end_time, status, created_at
        FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Inserts a scheduled appointment.
///
/// Returns `None` when a live appointment already starts at the same time,
/// which is how a lost booking race surfaces.
pub async fn create_appointment(
    pool: &Pool<Postgres>,
    appointment: &NewAppointment,
) -> Result<Option<DbAppointment>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: id={}, doctor={}, clinic={}, date={}, start={}",
        id,
        appointment.doctor_id,
        appointment.clinic_id,
        appointment.appointment_date,
        appointment.start_time
    );

    let created = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments
            (id, doctor_id, clinic_id, patient_id, appointment_date,
             start_time, end_time, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'scheduled', $8)
        ON CONFLICT (doctor_id, clinic_id, appointment_date, start_time)
            WHERE status <> 'cancelled'
        DO NOTHING
        RETURNING id, doctor_id, clinic_id, patient_id, appointment_date,
                  start_time, end_time, status, created_at
        "#,
    )
    .bind(id)
    .bind(appointment.doctor_id)
    .bind(appointment.clinic_id)
    .bind(appointment.patient_id)
    .bind(appointment.appointment_date)
    .bind(appointment.start_time)
    .bind(appointment.end_time)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(created)
}

pub async fn cancel_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let cancelled = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = 'cancelled'
        WHERE id = $1 AND status = 'scheduled'
        RETURNING id, doctor_id, clinic_id, patient_id, appointment_date,
                  start_time, end_time, status, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(cancelled)
}
