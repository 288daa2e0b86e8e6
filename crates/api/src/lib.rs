//! # Clinic Slots API
//!
//! The API crate provides the web server for doctor availability, time off,
//! appointment booking and the bookable-slot listing.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Error mapping to HTTP responses
//! - **Cache**: Day schedules keyed by doctor, clinic and date, with explicit invalidation
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and reaches storage through the
//! `ScheduleRepository` trait of the db crate.

/// In-memory cache of slot calculator inputs
pub mod cache;
/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use chrono::{FixedOffset, NaiveDateTime, Utc};
use clinic_slots_db::{DbPool, PgScheduleRepository, ScheduleRepository};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::cache::SlotCache;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Storage for availability, time off and appointments
    pub repository: Arc<dyn ScheduleRepository>,
    /// Fetched day schedules, invalidated on every write that affects them
    pub slot_cache: SlotCache,
    /// Offset of the clinics' wall clock from UTC
    pub clinic_offset: FixedOffset,
}

impl ApiState {
    pub fn new(
        repository: Arc<dyn ScheduleRepository>,
        slot_cache: SlotCache,
        clinic_offset: FixedOffset,
    ) -> Self {
        Self {
            repository,
            slot_cache,
            clinic_offset,
        }
    }

    /// Current wall-clock time at the clinics.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.clinic_offset).naive_local()
    }
}

/// Builds the application router with every route and the shared state attached
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Bookable slot listing
        .merge(routes::slots::routes())
        // Weekly availability management
        .merge(routes::availability::routes())
        // Time off management
        .merge(routes::time_off::routes())
        // Booking and cancellation
        .merge(routes::appointment::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// This function initializes logging, builds the state and routes, applies
/// CORS, tracing and timeout layers, and serves HTTP until shutdown.
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let repository: Arc<dyn ScheduleRepository> = Arc::new(PgScheduleRepository::new(db_pool));
    let state = Arc::new(ApiState::new(
        repository,
        SlotCache::new(config.slot_cache_ttl),
        config.clinic_offset,
    ));

    let app = app(state).layer(TraceLayer::new_for_http());

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<axum::http::HeaderValue>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .wrap_err("Invalid origin in API_CORS_ORIGINS")?;

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TimeoutLayer::new(std::time::Duration::from_secs(
                config.request_timeout,
            )))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
