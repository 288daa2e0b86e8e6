//! # Clinic Slots Core
//!
//! Domain types and the appointment slot calculator. Everything in this crate
//! is pure and synchronous: storage, transport and caching live in the `db`
//! and `api` crates.

pub mod errors;
pub mod models;
pub mod slots;

pub use errors::{SchedulingError, SchedulingResult};
pub use slots::compute_slots;
