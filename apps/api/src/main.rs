use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{error, info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use agent_cell::services::{
    AgentSettings, ClinicKnowledgeBase, GeminiClient, SchedulingAgent, ToolExecutor,
};
use appointment_cell::Scheduler;
use shared_config::AppConfig;
use shared_database::ScheduleRepository;
use shared_utils::clock::{Clock, SystemClock};

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic scheduling API server");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("Server stopped: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let repository = ScheduleRepository::from_config(&config)
        .await
        .context("failed to open the schedule repository")?;
    let scheduler = Arc::new(Scheduler::new(Arc::new(repository), Arc::clone(&clock)));

    let model = GeminiClient::new(&config).context("failed to build the language model client")?;
    let agent = SchedulingAgent::new(
        Arc::new(model),
        Arc::new(ClinicKnowledgeBase::new(config.clinic_info_path.clone())),
        ToolExecutor::new(scheduler.clone(), clock),
        AgentSettings::from_config(&config),
    );
    info!("Scheduling agent ready (model {})", config.llm_model);

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(scheduler, Arc::new(agent))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
