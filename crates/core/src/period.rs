use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive calendar range. A range whose start is after its end contains
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn is_empty(self) -> bool {
        self.start > self.end
    }
}

/// Calendar date of a raw transaction timestamp: the part before `T`,
/// which must be `YYYY-MM-DD`.
pub fn transaction_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
