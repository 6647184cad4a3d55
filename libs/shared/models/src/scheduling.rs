use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

// ==============================================================================
// CLOCK TIME
// ==============================================================================

/// A wall-clock time in the clinic's timezone, stored as minutes since midnight.
///
/// `24:00` is representable so that an interval may end exactly at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);
    pub const END_OF_DAY: ClockTime = ClockTime(MINUTES_PER_DAY);

    pub fn from_hm(hours: u32, minutes: u32) -> Option<Self> {
        if minutes >= 60 {
            return None;
        }
        let total = hours.checked_mul(60)?.checked_add(minutes)?;
        (total <= MINUTES_PER_DAY).then_some(Self(total))
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    /// Adds minutes without rolling over into the next day.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        Self::from_minutes(self.0.checked_add(minutes)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseClockTimeError(pub String);

impl fmt::Display for ParseClockTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time '{}', expected HH:MM", self.0)
    }
}

impl std::error::Error for ParseClockTimeError {}

impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseClockTimeError(s.to_string());
        let (hours, minutes) = s.trim().split_once(':').ok_or_else(err)?;

        let valid_part = |part: &str, max_len: usize| {
            !part.is_empty() && part.len() <= max_len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !valid_part(hours, 2) || minutes.len() != 2 || !valid_part(minutes, 2) {
            return Err(err());
        }

        let hours: u32 = hours.parse().map_err(|_| err())?;
        let minutes: u32 = minutes.parse().map_err(|_| err())?;
        if hours > 24 || (hours == 24 && minutes != 0) {
            return Err(err());
        }
        Self::from_hm(hours, minutes).ok_or_else(err)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

// ==============================================================================
// APPOINTMENT TYPES
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentType {
    Consultation,
    Followup,
    Physical,
    Specialist,
}

impl AppointmentType {
    pub const ALL: [AppointmentType; 4] = [
        AppointmentType::Consultation,
        AppointmentType::Followup,
        AppointmentType::Physical,
        AppointmentType::Specialist,
    ];

    pub fn duration_minutes(self) -> u32 {
        match self {
            AppointmentType::Consultation => 30,
            AppointmentType::Followup => 15,
            AppointmentType::Physical => 45,
            AppointmentType::Specialist => 60,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentType::Consultation => "consultation",
            AppointmentType::Followup => "followup",
            AppointmentType::Physical => "physical",
            AppointmentType::Specialist => "specialist",
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        AppointmentType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown appointment type '{}'. Use one of: consultation, followup, physical, specialist",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Confirmed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
        }
    }
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub booking_id: String,
    pub confirmation_code: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub appointment_type: AppointmentType,
    pub patient: PatientInfo,
    pub reason: String,
    pub status: AppointmentStatus,
    pub created_at: NaiveDateTime,
}

// ==============================================================================
// WORKING HOURS TEMPLATE
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: ClockTime,
    pub end: ClockTime,
}

/// The clinic's recurring week, lunch break, blocked dates and seeded bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHoursTemplate {
    /// Lower-case weekday name to opening hours; missing or `null` means closed.
    pub working_hours: BTreeMap<String, Option<TimeWindow>>,
    pub lunch_break: TimeWindow,
    pub appointment_slot_interval: u32,
    #[serde(default)]
    pub blocked_dates: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub booked_appointments: Vec<Appointment>,
}

impl WorkingHoursTemplate {
    pub fn hours_for(&self, date: NaiveDate) -> Option<TimeWindow> {
        self.working_hours
            .get(&weekday_name(date))
            .copied()
            .flatten()
    }

    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.blocked_dates.contains(&date)
    }

    /// Structural checks applied when the template is loaded.
    pub fn validate(&self) -> Result<(), String> {
        if self.appointment_slot_interval == 0 {
            return Err("appointment_slot_interval must be greater than zero".to_string());
        }
        if self.lunch_break.start >= self.lunch_break.end {
            return Err("lunch_break start must be before its end".to_string());
        }
        for (day, window) in &self.working_hours {
            if let Some(window) = window {
                if window.start >= window.end {
                    return Err(format!("working hours for {} start after they end", day));
                }
            }
        }
        Ok(())
    }
}

pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string().to_lowercase()
}
