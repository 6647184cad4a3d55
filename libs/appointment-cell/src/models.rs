// libs/appointment-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StorageError;
use shared_models::error::AppError;
use shared_models::scheduling::{Appointment, AppointmentStatus, AppointmentType, ClockTime, PatientInfo};

// ==============================================================================
// DERIVED SLOTS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub available: bool,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub appointment_type: AppointmentType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub date: String,
    pub appointment_type: AppointmentType,
    pub available_slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub appointment_type: AppointmentType,
    pub date: String,
    pub start_time: String,
    pub patient: PatientInfo,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub date: NaiveDate,
    pub time: ClockTime,
    pub duration_minutes: u32,
    pub appointment_type: AppointmentType,
    pub patient_name: String,
    pub patient_email: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking_id: String,
    pub status: AppointmentStatus,
    pub confirmation_code: String,
    pub details: BookingDetails,
    pub message: String,
}

impl From<&Appointment> for BookingResponse {
    fn from(appointment: &Appointment) -> Self {
        Self {
            booking_id: appointment.booking_id.clone(),
            status: appointment.status,
            confirmation_code: appointment.confirmation_code.clone(),
            details: BookingDetails {
                date: appointment.date,
                time: appointment.start_time,
                duration_minutes: appointment.appointment_type.duration_minutes(),
                appointment_type: appointment.appointment_type,
                patient_name: appointment.patient.name.clone(),
                patient_email: appointment.patient.email.clone(),
                reason: appointment.reason.clone(),
            },
            message: format!(
                "Appointment successfully booked for {} on {} at {}",
                appointment.patient.name, appointment.date, appointment.start_time
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<Appointment>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidDate {
    #[error("Invalid date '{0}'. Please use the YYYY-MM-DD format")]
    Malformed(String),

    #[error("Cannot book appointments in the past ({0}). Please choose today or a later date")]
    Past(NaiveDate),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClosedReason {
    #[error("Clinic is closed on {0}s")]
    NonWorkingDay(String),

    #[error("This date is not available for appointments")]
    Blocked,
}

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("{0}")]
    InvalidDate(InvalidDate),

    #[error("{reason}. Please pick another date or call the office")]
    ClinicClosed { date: NaiveDate, reason: ClosedReason },

    #[error("The {start_time}-{end_time} slot on {date} is no longer available. Please choose another time")]
    SlotConflict {
        date: NaiveDate,
        start_time: ClockTime,
        end_time: ClockTime,
    },

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal scheduling error: {0}")]
    Internal(String),
}

impl SchedulingError {
    /// Stable machine-readable code used in tool envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            SchedulingError::InvalidDate(_) => "invalid_date",
            SchedulingError::ClinicClosed { .. } => "clinic_closed",
            SchedulingError::SlotConflict { .. } => "slot_conflict",
            SchedulingError::InvalidTime(_) => "invalid_time",
            SchedulingError::Validation(_) => "validation_error",
            SchedulingError::Storage(_) => "storage_error",
            SchedulingError::Internal(_) => "internal_error",
        }
    }

    /// Expected outcomes the patient can act on, as opposed to system failures.
    pub fn is_user_actionable(&self) -> bool {
        !matches!(self, SchedulingError::Storage(_) | SchedulingError::Internal(_))
    }
}

impl From<SchedulingError> for AppError {
    fn from(error: SchedulingError) -> Self {
        let message = error.to_string();
        match error {
            SchedulingError::InvalidDate(_)
            | SchedulingError::ClinicClosed { .. }
            | SchedulingError::InvalidTime(_) => AppError::BadRequest(message),
            SchedulingError::SlotConflict { .. } => AppError::Conflict(message),
            SchedulingError::Validation(_) => AppError::ValidationError(message),
            SchedulingError::Storage(_) => AppError::Storage(message),
            SchedulingError::Internal(_) => AppError::Internal(message),
        }
    }
}
