// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::debug;

use shared_models::error::AppError;

use crate::models::{
    AppointmentsResponse, AvailabilityQuery, AvailabilityResponse, BookAppointmentRequest,
    BookingResponse,
};
use crate::services::Scheduler;

// ==============================================================================
// CALENDAR HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_availability(
    State(scheduler): State<Arc<Scheduler>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    debug!("Availability requested for {} ({})", query.date, query.appointment_type);

    let response = scheduler
        .availability(&query.date, query.appointment_type)
        .await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(scheduler): State<Arc<Scheduler>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    debug!(
        "Booking requested for {} at {} ({})",
        request.date, request.start_time, request.appointment_type
    );

    let appointment = scheduler.book(request).await?;

    Ok(Json(BookingResponse::from(&appointment)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(scheduler): State<Arc<Scheduler>>,
) -> Result<Json<AppointmentsResponse>, AppError> {
    let appointments = scheduler.all_appointments().await?;

    Ok(Json(AppointmentsResponse { appointments }))
}
