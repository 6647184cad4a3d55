use std::sync::Arc;

use axum::{
    Json, Router,
    routing::get,
};
use serde_json::{json, Value};

use agent_cell::{agent_routes, SchedulingAgent};
use appointment_cell::{calendar_routes, Scheduler};

pub const SERVICE_TITLE: &str = "Medical Appointment Scheduling Agent API";

async fn root() -> Json<Value> {
    Json(json!({
        "message": SERVICE_TITLE,
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/api/health",
    }))
}

pub fn create_router(scheduler: Arc<Scheduler>, agent: Arc<SchedulingAgent>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api/calendly", calendar_routes(scheduler))
        .nest("/api", agent_routes(agent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use agent_cell::services::{AgentSettings, ClinicKnowledgeBase, GeminiClient, ToolExecutor};
    use axum::{body::Body, http::{Request, StatusCode}};
    use shared_database::ScheduleRepository;
    use shared_utils::test_utils::{sample_template, TestCalendar, TestConfig};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let config = TestConfig::default().to_app_config();
        let clock = Arc::new(TestCalendar::clock());
        let scheduler = Arc::new(Scheduler::new(
            Arc::new(ScheduleRepository::in_memory(sample_template())),
            clock.clone(),
        ));
        let agent = SchedulingAgent::new(
            Arc::new(GeminiClient::new(&config).unwrap()),
            Arc::new(ClinicKnowledgeBase::from_passages(Vec::new())),
            ToolExecutor::new(scheduler.clone(), clock),
            AgentSettings {
                model_timeout: Duration::from_secs(1),
                tool_timeout: Duration::from_secs(1),
                clinic_phone: config.clinic_phone.clone(),
            },
        );
        create_router(scheduler, Arc::new(agent))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_routes_are_mounted() {
        let (status, body) = get(test_router(), "/").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], SERVICE_TITLE);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["docs"], "/api/health");

        let (status, body) = get(test_router(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");

        let (status, _) = get(
            test_router(),
            &format!("/api/calendly/availability?date={}&appointment_type=physical", TestCalendar::next_monday()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(test_router(), "/api/calendly/appointments").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["appointments"], serde_json::json!([]));
    }
}
