use chrono::{DateTime, NaiveDate, Utc};

use crate::utils::errors::AppError;

/// Parses a `start_date`/`end_date` query value. Accepts RFC 3339 timestamps
/// or plain `YYYY-MM-DD` dates; a plain date expands to the start or end of
/// that day depending on which bound it is.
pub fn parse_date_param(value: &str, end_of_day: bool) -> Result<DateTime<Utc>, AppError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let time = if end_of_day {
            date.and_hms_opt(23, 59, 59)
        } else {
            date.and_hms_opt(0, 0, 0)
        };
        if let Some(naive) = time {
            return Ok(naive.and_utc());
        }
    }

    Err(AppError::validation(format!(
        "Invalid date value: {} (expected RFC 3339 or YYYY-MM-DD)",
        value
    )))
}
