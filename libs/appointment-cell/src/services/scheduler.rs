// libs/appointment-cell/src/services/scheduler.rs
use std::sync::Arc;

use shared_database::ScheduleRepository;
use shared_models::scheduling::{Appointment, AppointmentType};
use shared_utils::clock::Clock;

use crate::models::{AvailabilityResponse, BookAppointmentRequest, SchedulingError, TimeSlot};
use crate::services::availability::AvailabilityService;
use crate::services::booking::BookingService;
use crate::services::validation::validate_booking_request;

/// Entry point to the scheduling cell. Built once at startup and shared by the
/// HTTP handlers and the agent's tools.
pub struct Scheduler {
    repository: Arc<ScheduleRepository>,
    availability: AvailabilityService,
    booking: BookingService,
}

impl Scheduler {
    pub fn new(repository: Arc<ScheduleRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            availability: AvailabilityService::new(Arc::clone(&repository), Arc::clone(&clock)),
            booking: BookingService::new(Arc::clone(&repository), clock),
            repository,
        }
    }

    pub async fn compute_slots(
        &self,
        date: &str,
        appointment_type: AppointmentType,
    ) -> Result<Vec<TimeSlot>, SchedulingError> {
        self.availability.compute_slots(date, appointment_type).await
    }

    pub async fn availability(
        &self,
        date: &str,
        appointment_type: AppointmentType,
    ) -> Result<AvailabilityResponse, SchedulingError> {
        let available_slots = self.compute_slots(date, appointment_type).await?;
        Ok(AvailabilityResponse {
            date: date.trim().to_string(),
            appointment_type,
            available_slots,
        })
    }

    /// Validates the request fields, then runs the booking transaction.
    pub async fn book(&self, request: BookAppointmentRequest) -> Result<Appointment, SchedulingError> {
        validate_booking_request(&request)?;
        self.booking
            .book(
                &request.date,
                &request.start_time,
                request.appointment_type,
                request.patient,
                request.reason,
            )
            .await
    }

    pub async fn all_appointments(&self) -> Result<Vec<Appointment>, SchedulingError> {
        Ok(self.repository.all_appointments().await?)
    }
}
