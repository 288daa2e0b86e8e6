use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/doctors/:doctor_id/clinics/:clinic_id/availability",
            get(handlers::availability::list_availability),
        )
        .route(
            "/api/doctors/:doctor_id/clinics/:clinic_id/availability/:day_of_week",
            put(handlers::availability::upsert_availability),
        )
}
