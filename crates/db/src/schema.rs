use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // One recurring window per doctor, clinic and weekday (0 = Sunday)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS weekly_availability (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            doctor_id UUID NOT NULL,
            clinic_id UUID NOT NULL,
            day_of_week INTEGER NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            slot_duration_minutes INTEGER NOT NULL CHECK (slot_duration_minutes > 0),
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_availability_window CHECK (end_time > start_time),
            CONSTRAINT one_window_per_day UNIQUE (doctor_id, clinic_id, day_of_week)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Inclusive date ranges
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_off (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            doctor_id UUID NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            reason TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_off_range CHECK (end_date >= start_date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            doctor_id UUID NOT NULL,
            clinic_id UUID NOT NULL,
            patient_id UUID NOT NULL,
            appointment_date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'scheduled',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_appointment_range CHECK (end_time > start_time),
            CONSTRAINT valid_appointment_status CHECK (status IN ('scheduled', 'completed', 'cancelled'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes; a partial unique index keeps two live bookings off the same start
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_weekly_availability_doctor ON weekly_availability(doctor_id, clinic_id)",
        "CREATE INDEX IF NOT EXISTS idx_time_off_doctor_dates ON time_off(doctor_id, start_date, end_date)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_day ON appointments(doctor_id, clinic_id, appointment_date)",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_unique_start \
            ON appointments(doctor_id, clinic_id, appointment_date, start_time) \
            WHERE status <> 'cancelled'",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
