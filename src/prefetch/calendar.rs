//! Calendar Prefetch
//!
//! Predicts the calendar pages a user is likely to open next.

use chrono::{Datelike, Months, NaiveDate};

/// URL of the calendar data for a month (1-based).
pub fn calendar_url(year: i32, month: u32) -> String {
    format!("/api/calendar/{}/{}", year, month)
}

/// Previous and next month of `year`/`month` (1-based), wrapping across years.
///
/// Returns `None` for an invalid month or a date outside chrono's range.
pub fn adjacent_months(year: i32, month: u32) -> Option<[(i32, u32); 2]> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let prev = first.checked_sub_months(Months::new(1))?;
    let next = first.checked_add_months(Months::new(1))?;
    Some([
        (prev.year(), prev.month()),
        (next.year(), next.month()),
    ])
}
