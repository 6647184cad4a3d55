// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_database::ScheduleRepository;
use shared_models::scheduling::{Appointment, AppointmentStatus, AppointmentType, PatientInfo};
use shared_utils::clock::Clock;

use crate::models::SchedulingError;
use crate::services::calendar::{parse_requested_date, parse_start_time, working_hours};
use crate::services::codes::allocate_identifiers;
use crate::services::locks::DateLocks;
use crate::services::slots::{is_taken, TimeRange};

pub struct BookingService {
    repository: Arc<ScheduleRepository>,
    clock: Arc<dyn Clock>,
    locks: DateLocks,
}

impl BookingService {
    pub fn new(repository: Arc<ScheduleRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            locks: DateLocks::new(),
        }
    }

    /// Reserves `[start_time, start_time + duration)` on `date` and records a
    /// confirmed appointment.
    ///
    /// The conflict check and the append happen under the date's lock, so two
    /// requests for the same slot cannot both succeed.
    pub async fn book(
        &self,
        date: &str,
        start_time: &str,
        appointment_type: AppointmentType,
        patient: PatientInfo,
        reason: String,
    ) -> Result<Appointment, SchedulingError> {
        let today = self.clock.today();
        let date = parse_requested_date(date, today)?;
        let template = self.repository.template().await?;
        working_hours(&template, date)?;

        let start = parse_start_time(start_time)?;
        let duration = appointment_type.duration_minutes();
        let range = TimeRange::starting_at(start, duration).ok_or_else(|| {
            SchedulingError::InvalidTime(format!(
                "a {} minute {} starting at {} would run past midnight",
                duration, appointment_type, start
            ))
        })?;

        let _guard = self.locks.acquire(date).await;
        self.locks.prune_before(today);
        debug!("Acquired booking lock for {}", date);

        let booked = self.repository.appointments_on(&template, date).await;
        if is_taken(&range, &booked) {
            warn!(
                "Slot conflict for {} {}-{} ({} existing bookings that day)",
                date,
                range.start,
                range.end,
                booked.len()
            );
            return Err(SchedulingError::SlotConflict {
                date,
                start_time: range.start,
                end_time: range.end,
            });
        }

        let mut existing = template.booked_appointments.clone();
        existing.extend(self.repository.log().snapshot().await);
        let (booking_id, confirmation_code) =
            allocate_identifiers(today, &existing, &mut rand::thread_rng())?;

        let appointment = Appointment {
            booking_id,
            confirmation_code,
            date,
            start_time: range.start,
            end_time: range.end,
            appointment_type,
            patient,
            reason,
            status: AppointmentStatus::Confirmed,
            created_at: self.clock.now(),
        };

        self.repository.record(appointment.clone()).await?;

        info!(
            "Booked {} {} on {} {}-{} (confirmation {})",
            appointment.booking_id,
            appointment.appointment_type,
            appointment.date,
            appointment.start_time,
            appointment.end_time,
            appointment.confirmation_code
        );
        Ok(appointment)
    }
}
