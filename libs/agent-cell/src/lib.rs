pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::AgentError;
pub use models::*;
pub use router::agent_routes;
pub use services::SchedulingAgent;
