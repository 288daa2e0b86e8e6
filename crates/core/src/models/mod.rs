pub mod appointment;
pub mod availability;
pub mod clock;
pub mod slot;
pub mod time_off;

pub use appointment::{Appointment, AppointmentStatus, BookedRange};
pub use availability::{WeeklyAvailability, weekday_index};
pub use slot::{DaySchedule, Slot, SlotsResponse};
pub use time_off::TimeOff;
