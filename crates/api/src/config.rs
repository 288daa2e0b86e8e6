//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the clinic slots
//! API server. Values come from environment variables, with defaults where
//! appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `SLOT_CACHE_TTL_SECONDS`: Lifetime of cached day schedules (default: 60)
//! - `CLINIC_UTC_OFFSET`: Offset of the clinics' wall clock, e.g. "+02:00" (default: "+00:00")

use chrono::FixedOffset;
use eyre::{Result, WrapErr, eyre};
use std::{env, time::Duration};
use tracing::Level;

/// Configuration for the clinic slots API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// How long a fetched day schedule may be served from the cache
    pub slot_cache_ttl: Duration,

    /// Offset used to turn the current UTC instant into clinic wall-clock time
    pub clinic_offset: FixedOffset,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - SLOT_CACHE_TTL_SECONDS or CLINIC_UTC_OFFSET are malformed
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Network settings
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;

        // Logging settings
        let log_level = match lookup("LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase()
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .unwrap_or(30);

        let slot_cache_ttl = lookup("SLOT_CACHE_TTL_SECONDS")
            .unwrap_or_else(|| "60".to_string())
            .parse()
            .map(Duration::from_secs)
            .wrap_err("Invalid SLOT_CACHE_TTL_SECONDS value")?;

        // Clinic clock
        let clinic_offset = lookup("CLINIC_UTC_OFFSET")
            .unwrap_or_else(|| "+00:00".to_string())
            .parse::<FixedOffset>()
            .map_err(|e| eyre!("Invalid CLINIC_UTC_OFFSET value: {}", e))?;

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            slot_cache_ttl,
            clinic_offset,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
