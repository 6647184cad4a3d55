pub mod appointment_log;
pub mod error;
pub mod repository;

pub use appointment_log::AppointmentLog;
pub use error::StorageError;
pub use repository::{ScheduleRepository, TemplateSource};
