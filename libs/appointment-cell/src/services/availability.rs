// libs/appointment-cell/src/services/availability.rs
use std::sync::Arc;

use tracing::debug;

use shared_database::ScheduleRepository;
use shared_models::scheduling::AppointmentType;
use shared_utils::clock::Clock;

use crate::models::{SchedulingError, TimeSlot};
use crate::services::calendar::{parse_requested_date, working_hours};
use crate::services::slots::{candidate_ranges, is_taken};

pub struct AvailabilityService {
    repository: Arc<ScheduleRepository>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
    pub fn new(repository: Arc<ScheduleRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Slots for `date` in ascending start order, each marked free or taken.
    ///
    /// A closed or blocked day yields an empty list rather than an error. Lunch
    /// never shows up as a taken slot; those candidates are left out entirely.
    pub async fn compute_slots(
        &self,
        date: &str,
        appointment_type: AppointmentType,
    ) -> Result<Vec<TimeSlot>, SchedulingError> {
        let date = parse_requested_date(date, self.clock.today())?;
        let template = self.repository.template().await?;

        let hours = match working_hours(&template, date) {
            Ok(hours) => hours,
            Err(SchedulingError::ClinicClosed { reason, .. }) => {
                debug!("No slots on {}: {}", date, reason);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let booked = self.repository.appointments_on(&template, date).await;

        let slots: Vec<TimeSlot> = candidate_ranges(
            hours,
            template.lunch_break,
            template.appointment_slot_interval,
            appointment_type.duration_minutes(),
        )
        .into_iter()
        .map(|range| TimeSlot {
            start_time: range.start,
            end_time: range.end,
            available: !is_taken(&range, &booked),
        })
        .collect();

        debug!(
            "Computed {} {} slots on {} ({} free)",
            slots.len(),
            appointment_type,
            date,
            slots.iter().filter(|slot| slot.available).count()
        );
        Ok(slots)
    }
}
