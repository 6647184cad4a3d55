use std::sync::LazyLock;

use regex::Regex;

use crate::models::{BookAppointmentRequest, SchedulingError};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?1?[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}$").expect("phone pattern compiles")
});

const MIN_NAME_LEN: usize = 2;
const MIN_REASON_LEN: usize = 5;

pub fn validate_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_PATTERN.is_match(email)
}

pub fn validate_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// Field checks on a booking request. Collects every problem into one message.
pub fn validate_booking_request(request: &BookAppointmentRequest) -> Result<(), SchedulingError> {
    let mut problems = Vec::new();

    if request.patient.name.trim().chars().count() < MIN_NAME_LEN {
        problems.push(format!("patient name must be at least {} characters", MIN_NAME_LEN));
    }
    if !validate_email(request.patient.email.trim()) {
        problems.push(format!("'{}' is not a valid email address", request.patient.email));
    }
    if !validate_phone(request.patient.phone.trim()) {
        problems.push(format!("'{}' is not a valid phone number", request.patient.phone));
    }
    if request.reason.trim().chars().count() < MIN_REASON_LEN {
        problems.push(format!("reason for visit must be at least {} characters", MIN_REASON_LEN));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(SchedulingError::Validation(problems.join("; ")))
    }
}
