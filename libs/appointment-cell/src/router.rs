// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::Scheduler;

pub fn calendar_routes(scheduler: Arc<Scheduler>) -> Router {
    Router::new()
        .route("/availability", get(handlers::get_availability))
        .route("/book", post(handlers::book_appointment))
        .route("/appointments", get(handlers::list_appointments))
        .with_state(scheduler)
}
