// libs/agent-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::SchedulingAgent;

pub fn agent_routes(agent: Arc<SchedulingAgent>) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/health", get(handlers::health_check))
        .with_state(agent)
}
