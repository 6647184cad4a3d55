use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_models::scheduling::{Appointment, WorkingHoursTemplate};

use crate::appointment_log::AppointmentLog;
use crate::error::StorageError;

/// Where the working-hours template comes from.
#[derive(Debug)]
pub enum TemplateSource {
    /// Re-read on every request so edits to blocked dates apply without a restart.
    File(PathBuf),
    Static(Arc<WorkingHoursTemplate>),
}

/// Read access to the clinic schedule plus the single write path for bookings.
/// Holds no business rules.
#[derive(Debug)]
pub struct ScheduleRepository {
    template: TemplateSource,
    log: AppointmentLog,
}

impl ScheduleRepository {
    pub fn new(template: TemplateSource, log: AppointmentLog) -> Self {
        Self { template, log }
    }

    pub fn in_memory(template: WorkingHoursTemplate) -> Self {
        Self::new(TemplateSource::Static(Arc::new(template)), AppointmentLog::in_memory())
    }

    /// Opens the file-backed repository and checks the template once up front.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StorageError> {
        let template = load_template(&config.schedule_path).await?;
        info!(
            "Schedule template loaded from {} ({} blocked dates, {} seeded bookings)",
            config.schedule_path.display(),
            template.blocked_dates.len(),
            template.booked_appointments.len()
        );

        let log = AppointmentLog::open(&config.appointments_path).await?;
        Ok(Self::new(TemplateSource::File(config.schedule_path.clone()), log))
    }

    pub async fn template(&self) -> Result<Arc<WorkingHoursTemplate>, StorageError> {
        match &self.template {
            TemplateSource::File(path) => Ok(Arc::new(load_template(path).await?)),
            TemplateSource::Static(template) => Ok(Arc::clone(template)),
        }
    }

    /// Seeded and booked appointments falling on `date`.
    pub async fn appointments_on(
        &self,
        template: &WorkingHoursTemplate,
        date: NaiveDate,
    ) -> Vec<Appointment> {
        let mut appointments: Vec<Appointment> = template
            .booked_appointments
            .iter()
            .filter(|appointment| appointment.date == date)
            .cloned()
            .collect();
        appointments.extend(self.log.on_date(date).await);
        appointments
    }

    /// The full log, seeded bookings first.
    pub async fn all_appointments(&self) -> Result<Vec<Appointment>, StorageError> {
        let template = self.template().await?;
        let mut appointments = template.booked_appointments.clone();
        appointments.extend(self.log.snapshot().await);
        Ok(appointments)
    }

    pub async fn record(&self, appointment: Appointment) -> Result<(), StorageError> {
        self.log.append(appointment).await
    }

    pub fn log(&self) -> &AppointmentLog {
        &self.log
    }
}

async fn load_template(path: &Path) -> Result<WorkingHoursTemplate, StorageError> {
    debug!("Reading schedule template from {}", path.display());
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StorageError::io(path, e))?;
    let template: WorkingHoursTemplate = serde_json::from_str(&raw)?;
    template.validate().map_err(StorageError::InvalidTemplate)?;
    Ok(template)
}
