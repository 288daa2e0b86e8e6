use crate::models::DbTimeOff;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_time_off_covering(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<DbTimeOff>> {
    let rows = sqlx::query_as::<_, DbTimeOff>(
        r#"
        SELECT id, doctor_id, start_date, end_date, reason, created_at
        FROM time_off
        WHERE doctor_id = $1 AND start_date <= $2 AND end_date >= $2
        "#,
    )
    .bind(doctor_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn list_time_off(pool: &Pool<Postgres>, doctor_id: Uuid) -> Result<Vec<DbTimeOff>> {
    let rows = sqlx::query_as::<_, DbTimeOff>(
        r#"
        SELECT id, doctor_id, start_date, end_date, reason, created_at
        FROM time_off
        WHERE doctor_id = $1
        ORDER BY start_date ASC
        "#,
    )
    .bind(doctor_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn create_time_off(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: Option<&str>,
) -> Result<DbTimeOff> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating time off: id={}, doctor={}, {}..={}",
        id, doctor_id, start_date, end_date
    );

    let time_off = sqlx::query_as::<_, DbTimeOff>(
        r#"
        INSERT INTO time_off (id, doctor_id, start_date, end_date, reason, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, doctor_id, start_date, end_date, reason, created_at
        "#,
    )
    .bind(id)
    .bind(doctor_id)
    .bind(start_date)
    .bind(end_date)
    .bind(reason)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(time_off)
}

pub async fn delete_time_off(pool: &Pool<Postgres>, doctor_id: Uuid, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM time_off
        WHERE id = $1 AND doctor_id = $2
        "#,
    )
    .bind(id)
    .bind(doctor_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
