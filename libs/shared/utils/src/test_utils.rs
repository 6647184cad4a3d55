use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::json;

use shared_config::AppConfig;
use shared_models::scheduling::{
    Appointment, AppointmentStatus, AppointmentType, ClockTime, PatientInfo, WorkingHoursTemplate,
};

use crate::clock::FixedClock;

pub struct TestConfig {
    pub google_api_key: String,
    pub llm_base_url: String,
    pub data_dir: std::path::PathBuf,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            google_api_key: "test-google-api-key".to_string(),
            llm_base_url: "http://localhost:54321/v1beta".to_string(),
            data_dir: std::env::temp_dir(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            google_api_key: self.google_api_key.clone(),
            llm_model: "gemini-test".to_string(),
            llm_base_url: self.llm_base_url.clone(),
            llm_temperature: 0.0,
            model_timeout: Duration::from_secs(5),
            tool_timeout: Duration::from_secs(5),
            schedule_path: self.data_dir.join("doctor_schedule.json"),
            appointments_path: self.data_dir.join("appointments.jsonl"),
            clinic_info_path: self.data_dir.join("clinic_info.json"),
            clinic_phone: "+1-555-123-4567".to_string(),
            port: 0,
        }
    }
}

/// Calendar used across the test suites. "Today" is Wednesday 2030-01-09.
pub struct TestCalendar;

impl TestCalendar {
    pub fn today() -> NaiveDate {
        date(2030, 1, 9)
    }

    pub fn yesterday() -> NaiveDate {
        date(2030, 1, 8)
    }

    pub fn next_monday() -> NaiveDate {
        date(2030, 1, 14)
    }

    pub fn next_tuesday() -> NaiveDate {
        date(2030, 1, 15)
    }

    pub fn next_saturday() -> NaiveDate {
        date(2030, 1, 12)
    }

    pub fn next_sunday() -> NaiveDate {
        date(2030, 1, 13)
    }

    /// A Monday listed in the template's blocked dates.
    pub fn blocked_monday() -> NaiveDate {
        date(2030, 1, 21)
    }

    pub fn clock() -> FixedClock {
        FixedClock::new(Self::today().and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap()))
    }
}

/// Monday to Friday 08:00-18:00, Saturday 09:00-13:00, Sunday closed,
/// lunch 12:00-13:00, 30 minute slot interval.
pub fn sample_template() -> WorkingHoursTemplate {
    serde_json::from_value(sample_template_json()).unwrap()
}

pub fn sample_template_json() -> serde_json::Value {
    json!({
        "working_hours": {
            "monday": {"start": "08:00", "end": "18:00"},
            "tuesday": {"start": "08:00", "end": "18:00"},
            "wednesday": {"start": "08:00", "end": "18:00"},
            "thursday": {"start": "08:00", "end": "18:00"},
            "friday": {"start": "08:00", "end": "18:00"},
            "saturday": {"start": "09:00", "end": "13:00"},
            "sunday": null
        },
        "lunch_break": {"start": "12:00", "end": "13:00"},
        "appointment_slot_interval": 30,
        "blocked_dates": [TestCalendar::blocked_monday().to_string()],
        "booked_appointments": []
    })
}

pub fn sample_patient() -> PatientInfo {
    PatientInfo {
        name: "Jane Doe".to_string(),
        email: "jane.doe@example.com".to_string(),
        phone: "+1-555-010-0100".to_string(),
    }
}

pub fn seeded_appointment(
    date: NaiveDate,
    start: &str,
    appointment_type: AppointmentType,
) -> Appointment {
    let start_time: ClockTime = start.parse().unwrap();
    Appointment {
        booking_id: format!("SEED-{}-{}", date.format("%Y%m%d"), start.replace(':', "")),
        confirmation_code: "SEED00".to_string(),
        date,
        start_time,
        end_time: start_time
            .checked_add_minutes(appointment_type.duration_minutes())
            .unwrap(),
        appointment_type,
        patient: sample_patient(),
        reason: "Seeded booking".to_string(),
        status: AppointmentStatus::Confirmed,
        created_at: NaiveDateTime::new(date, NaiveTime::MIN),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
