// libs/agent-cell/src/services/tools.rs
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration as DateDuration;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use appointment_cell::models::{BookAppointmentRequest, BookingResponse, SchedulingError, TimeSlot};
use appointment_cell::Scheduler;
use shared_models::error::AppError;
use shared_models::scheduling::{Appointment, AppointmentType, PatientInfo};
use shared_utils::clock::Clock;

use crate::error::AgentError;
use crate::models::{ToolDeclaration, ToolInvocation};

pub const CHECK_AVAILABILITY: &str = "check_availability";
pub const BOOK_APPOINTMENT: &str = "book_appointment";

const MAX_LISTED_SLOTS: usize = 10;

pub const BOOKING_FIELDS: [&str; 7] = [
    "appointment_type",
    "date",
    "start_time",
    "patient_name",
    "patient_email",
    "patient_phone",
    "reason",
];

/// The tools the model may call, parsed from a raw invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulingTool {
    CheckAvailability(Value),
    BookAppointment(Value),
}

impl SchedulingTool {
    pub fn parse(invocation: &ToolInvocation) -> Result<Self, AgentError> {
        match invocation.name.as_str() {
            CHECK_AVAILABILITY => Ok(SchedulingTool::CheckAvailability(invocation.arguments.clone())),
            BOOK_APPOINTMENT => Ok(SchedulingTool::BookAppointment(invocation.arguments.clone())),
            other => Err(AgentError::ToolExecution {
                tool: other.to_string(),
                message: "unknown tool".to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SchedulingTool::CheckAvailability(_) => CHECK_AVAILABILITY,
            SchedulingTool::BookAppointment(_) => BOOK_APPOINTMENT,
        }
    }
}

pub fn tool_declarations() -> Vec<ToolDeclaration> {
    let string = |description: &str| json!({ "type": "STRING", "description": description });
    let appointment_type =
        "One of 'consultation' (30 min), 'followup' (15 min), 'physical' (45 min), 'specialist' (60 min)";

    vec![
        ToolDeclaration {
            name: CHECK_AVAILABILITY,
            description: "Check the doctor's open time slots for a date and appointment type. \
                Use this when the patient asks about availability or wants to see open times.",
            parameters: json!({
                "type": "OBJECT",
                "properties": {
                    "date": string("Date in YYYY-MM-DD format"),
                    "appointment_type": string(&format!("{}. Defaults to 'consultation'", appointment_type)),
                },
                "required": ["date"],
            }),
        },
        ToolDeclaration {
            name: BOOK_APPOINTMENT,
            description: "Book an appointment. Only call this after the patient has confirmed \
                every detail. Returns a booking id and confirmation code.",
            parameters: json!({
                "type": "OBJECT",
                "properties": {
                    "appointment_type": string(appointment_type),
                    "date": string("Appointment date in YYYY-MM-DD format"),
                    "start_time": string("Start time in HH:MM format"),
                    "patient_name": string("Patient's full name"),
                    "patient_email": string("Patient's email address"),
                    "patient_phone": string("Patient's phone number"),
                    "reason": string("Reason for the visit"),
                },
                "required": BOOKING_FIELDS,
            }),
        },
    ]
}

/// The scheduling operations the tools call into.
#[async_trait]
pub trait SchedulingBackend: Send + Sync {
    async fn compute_slots(
        &self,
        date: &str,
        appointment_type: AppointmentType,
    ) -> Result<Vec<TimeSlot>, SchedulingError>;

    async fn book(&self, request: BookAppointmentRequest) -> Result<Appointment, SchedulingError>;
}

#[async_trait]
impl SchedulingBackend for Scheduler {
    async fn compute_slots(
        &self,
        date: &str,
        appointment_type: AppointmentType,
    ) -> Result<Vec<TimeSlot>, SchedulingError> {
        Scheduler::compute_slots(self, date, appointment_type).await
    }

    async fn book(&self, request: BookAppointmentRequest) -> Result<Appointment, SchedulingError> {
        Scheduler::book(self, request).await
    }
}

/// Runs scheduling tools against the shared scheduler and wraps every outcome
/// the patient can act on in a JSON envelope for the model.
pub struct ToolExecutor {
    scheduler: Arc<dyn SchedulingBackend>,
    clock: Arc<dyn Clock>,
}

impl ToolExecutor {
    pub fn new(scheduler: Arc<dyn SchedulingBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { scheduler, clock }
    }

    pub async fn execute(&self, tool: &SchedulingTool) -> Result<Value, AgentError> {
        debug!("Executing tool {}", tool.name());
        match tool {
            SchedulingTool::CheckAvailability(args) => self.check_availability(args).await,
            SchedulingTool::BookAppointment(args) => self.book_appointment(args).await,
        }
    }

    async fn check_availability(&self, args: &Value) -> Result<Value, AgentError> {
        let Some(args) = args.as_object() else {
            return Ok(json!({
                "error": "Invalid input format. Expected JSON with 'date' and 'appointment_type' fields."
            }));
        };

        let Some(date) = string_arg(args, "date").filter(|date| !date.trim().is_empty()) else {
            let today = self.clock.today();
            let upcoming: Vec<String> = (1..=3)
                .map(|days| (today + DateDuration::days(days)).to_string())
                .collect();
            return Ok(json!({
                "error": "No date provided",
                "suggestion": format!(
                    "Please specify a date. Here are some upcoming dates: {}",
                    upcoming.join(", ")
                ),
            }));
        };

        let appointment_type = match string_arg(args, "appointment_type") {
            None => AppointmentType::Consultation,
            Some(raw) if raw.trim().is_empty() => AppointmentType::Consultation,
            Some(raw) => match raw.parse::<AppointmentType>() {
                Ok(appointment_type) => appointment_type,
                Err(message) => {
                    return Ok(json!({ "error": message, "code": "invalid_appointment_type" }));
                }
            },
        };

        let slots = match self.scheduler.compute_slots(&date, appointment_type).await {
            Ok(slots) => slots,
            Err(error) => return scheduling_envelope(CHECK_AVAILABILITY, error, false),
        };

        let free: Vec<String> = slots
            .iter()
            .filter(|slot| slot.available)
            .map(|slot| slot.start_time.to_string())
            .collect();

        if free.is_empty() {
            return Ok(json!({
                "date": date,
                "available": false,
                "message": format!("No available slots on {}. Consider checking nearby dates.", date),
            }));
        }

        Ok(json!({
            "date": date,
            "available": true,
            "appointment_type": appointment_type,
            "available_slots": free.iter().take(MAX_LISTED_SLOTS).collect::<Vec<_>>(),
            "total_available": free.len(),
        }))
    }

    async fn book_appointment(&self, args: &Value) -> Result<Value, AgentError> {
        let Some(args) = args.as_object() else {
            return Ok(json!({
                "success": false,
                "error": "Invalid input format. Expected JSON with booking details."
            }));
        };

        let missing: Vec<&str> = BOOKING_FIELDS
            .iter()
            .copied()
            .filter(|field| args.get(*field).map_or(true, Value::is_null))
            .collect();
        if !missing.is_empty() {
            return Ok(json!({
                "success": false,
                "error": format!("Missing required fields: {}", missing.join(", ")),
                "required_fields": BOOKING_FIELDS,
            }));
        }

        let field = |name: &str| string_arg(args, name).unwrap_or_default();
        let appointment_type = match field("appointment_type").parse::<AppointmentType>() {
            Ok(appointment_type) => appointment_type,
            Err(message) => {
                return Ok(json!({ "success": false, "error": message, "status_code": 422 }));
            }
        };

        let request = BookAppointmentRequest {
            appointment_type,
            date: field("date"),
            start_time: field("start_time"),
            patient: PatientInfo {
                name: field("patient_name"),
                email: field("patient_email"),
                phone: field("patient_phone"),
            },
            reason: field("reason"),
        };

        match self.scheduler.book(request).await {
            Ok(appointment) => {
                info!("Tool booked {}", appointment.booking_id);
                let response = BookingResponse::from(&appointment);
                Ok(json!({
                    "success": true,
                    "booking_id": response.booking_id,
                    "confirmation_code": response.confirmation_code,
                    "status": response.status,
                    "details": response.details,
                    "message": response.message,
                }))
            }
            Err(error) => scheduling_envelope(BOOK_APPOINTMENT, error, true),
        }
    }
}

/// Strings pass through; numbers and booleans are rendered so "date": 20300114
/// still reaches the date parser and fails there with a useful message.
fn string_arg(args: &Map<String, Value>, name: &str) -> Option<String> {
    match args.get(name)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Patient-actionable errors go back to the model; system failures abort the turn.
fn scheduling_envelope(tool: &str, error: SchedulingError, booking: bool) -> Result<Value, AgentError> {
    if !error.is_user_actionable() {
        return Err(AgentError::ToolExecution {
            tool: tool.to_string(),
            message: error.to_string(),
        });
    }

    debug!("Tool {} returned {}", tool, error.code());
    let message = error.to_string();
    if booking {
        let status_code = AppError::from(error).status_code().as_u16();
        Ok(json!({ "success": false, "error": message, "status_code": status_code }))
    } else {
        Ok(json!({ "error": message, "code": error.code() }))
    }
}
