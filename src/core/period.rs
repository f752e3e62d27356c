use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use crate::core::{AppError, Result};

/// Half-open calendar month `[start, end)` in UTC, used for due-date filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// Window for the given year and 1-based month
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::validation(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }

        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::validation(format!("year {} is out of range", year)))?;
        let end = start
            .checked_add_months(Months::new(1))
            .ok_or_else(|| AppError::validation(format!("year {} is out of range", year)))?;

        Ok(Self {
            year,
            month,
            start,
            end,
        })
    }

    /// Window of the UTC calendar month containing `instant`
    pub fn containing(instant: DateTime<Utc>) -> Result<Self> {
        Self::new(instant.year(), instant.month())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}
