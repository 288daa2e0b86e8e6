use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{SchedulingError, SchedulingResult};

/// A doctor-declared leave. Both ends are inclusive calendar dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOff {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

impl TimeOff {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTimeOffRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

impl CreateTimeOffRequest {
    pub fn validate(&self) -> SchedulingResult<()> {
        if self.end_date < self.start_date {
            return Err(SchedulingError::Validation(format!(
                "Time off end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        Ok(())
    }
}
