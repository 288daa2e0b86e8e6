pub mod appointment;
pub mod availability;
pub mod slots;
pub mod time_off;
