use crate::models::DbWeeklyAvailability;
use chrono::{NaiveTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_availability_for_day(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    clinic_id: Uuid,
    day_of_week: i32,
) -> Result<Option<DbWeeklyAvailability>> {
    tracing::debug!(
        "Getting availability: doctor={}, clinic={}, day={}",
        doctor_id, clinic_id, day_of_week
    );

    let availability = sqlx::query_as::<_, DbWeeklyAvailability>(
        r#"
        SELECT id, doctor_id, clinic_id, day_of_week, start_time, end_time,
               slot_duration_minutes, is_active, updated_at
        FROM weekly_availability
        WHERE doctor_id = $1 AND clinic_id = $2 AND day_of_week = $3
        "#,
    )
    .bind(doctor_id)
    .bind(clinic_id)
    .bind(day_of_week)
    .fetch_optional(pool)
    .await?;

    Ok(availability)
}

pub async fn list_availability(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    clinic_id: Uuid,
) -> Result<Vec<DbWeeklyAvailability>> {
    let rows = sqlx::query_as::<_, DbWeeklyAvailability>(
        r#"
        SELECT id, doctor_id, clinic_id, day_of_week, start_time, end_time,
               slot_duration_minutes, is_active, updated_at
        FROM weekly_availability
        WHERE doctor_id = $1 AND clinic_id = $2
        ORDER BY day_of_week ASC
        "#,
    )
    .bind(doctor_id)
    .bind(clinic_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[allow(clippy::too_many_arguments)]
pub async fn upsert_availability(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    clinic_id: Uuid,
    day_of_week: i32,
    start_time: NaiveTime,
    end_time: NaiveTime,
    slot_duration_minutes: i32,
    is_active: bool,
) -> Result<DbWeeklyAvailability> {
    let now = Utc::now();

    tracing::debug!(
        "Upserting availability: doctor={}, clinic={}, day={}, {}-{} every {} min, active={}",
        doctor_id, clinic_id, day_of_week, start_time, end_time, slot_duration_minutes, is_active
    );

    let availability = sqlx::query_as::<_, DbWeeklyAvailability>(
        r#"
        INSERT INTO weekly_availability
            (id, doctor_id, clinic_id, day_of_week, start_time, end_time,
             slot_duration_minutes, is_active, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT ON CONSTRAINT one_window_per_day
        DO UPDATE SET start_time = $5, end_time = $6, slot_duration_minutes = $7,
                      is_active = $8, updated_at = $9
        RETURNING id, doctor_id, clinic_id, day_of_week, start_time, end_time,
                  slot_duration_minutes, is_active, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(doctor_id)
    .bind(clinic_id)
    .bind(day_of_week)
    .bind(start_time)
    .bind(end_time)
    .bind(slot_duration_minutes)
    .bind(is_active)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(availability)
}
