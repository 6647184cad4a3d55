use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_LLM_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CLINIC_PHONE: &str = "+1-555-123-4567";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required setting {name}: {description}")]
    Missing { name: &'static str, description: &'static str },

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub google_api_key: String,
    pub llm_model: String,
    pub llm_base_url: String,
    pub llm_temperature: f32,
    pub model_timeout: Duration,
    pub tool_timeout: Duration,
    pub schedule_path: PathBuf,
    pub appointments_path: PathBuf,
    pub clinic_info_path: PathBuf,
    pub clinic_phone: String,
    pub port: u16,
}

impl AppConfig {
    /// Reads settings from the process environment. Call `dotenv().ok()` first
    /// if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let google_api_key = lookup("GOOGLE_API_KEY")
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing {
                name: "GOOGLE_API_KEY",
                description: "Google API key for Gemini",
            })?;

        let llm_model = string_or_default(&lookup, "LLM_MODEL", DEFAULT_LLM_MODEL);
        if llm_model.contains("1.5") {
            warn!(
                "LLM_MODEL is set to '{}' which may be deprecated. Consider using '{}' or newer.",
                llm_model, DEFAULT_LLM_MODEL
            );
        }

        let config = Self {
            google_api_key,
            llm_model,
            llm_base_url: string_or_default(&lookup, "LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
            llm_temperature: parse_or_default(&lookup, "LLM_TEMPERATURE", 0.7)?,
            model_timeout: Duration::from_secs(parse_or_default(&lookup, "MODEL_TIMEOUT_SECS", 30)?),
            tool_timeout: Duration::from_secs(parse_or_default(&lookup, "TOOL_TIMEOUT_SECS", 10)?),
            schedule_path: string_or_default(&lookup, "SCHEDULE_PATH", "data/doctor_schedule.json").into(),
            appointments_path: string_or_default(&lookup, "APPOINTMENTS_PATH", "data/appointments.jsonl").into(),
            clinic_info_path: string_or_default(&lookup, "CLINIC_INFO_PATH", "data/clinic_info.json").into(),
            clinic_phone: string_or_default(&lookup, "CLINIC_PHONE", DEFAULT_CLINIC_PHONE),
            port: parse_or_default(&lookup, "BACKEND_PORT", 8000)?,
        };

        Ok(config)
    }
}

fn string_or_default<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => value,
        _ => {
            warn!("{} not set, using default '{}'", name, default);
            default.to_string()
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        _ => Ok(default),
    }
}
