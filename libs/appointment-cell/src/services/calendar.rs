use chrono::NaiveDate;

use shared_models::scheduling::{weekday_name, ClockTime, TimeWindow, WorkingHoursTemplate};

use crate::models::{ClosedReason, InvalidDate, SchedulingError};

/// Parses a `YYYY-MM-DD` date and rejects anything before `today`.
pub fn parse_requested_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, SchedulingError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| SchedulingError::InvalidDate(InvalidDate::Malformed(raw.to_string())))?;

    if date < today {
        return Err(SchedulingError::InvalidDate(InvalidDate::Past(date)));
    }
    Ok(date)
}

/// Opening hours for `date`, or `ClinicClosed` for a non-working weekday or a
/// blocked date.
pub fn working_hours(
    template: &WorkingHoursTemplate,
    date: NaiveDate,
) -> Result<TimeWindow, SchedulingError> {
    let hours = template.hours_for(date).ok_or_else(|| SchedulingError::ClinicClosed {
        date,
        reason: ClosedReason::NonWorkingDay(weekday_name(date)),
    })?;

    if template.is_blocked(date) {
        return Err(SchedulingError::ClinicClosed {
            date,
            reason: ClosedReason::Blocked,
        });
    }
    Ok(hours)
}

pub fn parse_start_time(raw: &str) -> Result<ClockTime, SchedulingError> {
    raw.parse::<ClockTime>()
        .map_err(|e| SchedulingError::InvalidTime(e.to_string()))
}
