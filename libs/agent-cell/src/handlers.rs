// libs/agent-cell/src/handlers.rs
use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::debug;

use shared_models::error::AppError;

use crate::models::{ChatRequest, ChatResponse, HealthResponse};
use crate::services::SchedulingAgent;

pub const SERVICE_NAME: &str = "Medical Appointment Scheduling Agent";

#[axum::debug_handler]
pub async fn chat(
    State(agent): State<Arc<SchedulingAgent>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::ValidationError("message must not be empty".to_string()));
    }

    let history = request.conversation_history.unwrap_or_default();
    debug!("Chat message received with {} prior turns", history.len());

    let reply = agent.process_message(&request.message, &history).await;

    Ok(Json(reply))
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
