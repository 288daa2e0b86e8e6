use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/doctors/:doctor_id/time-off",
            get(handlers::time_off::list_time_off).post(handlers::time_off::create_time_off),
        )
        .route(
            "/api/doctors/:doctor_id/time-off/:id",
            delete(handlers::time_off::delete_time_off),
        )
}
