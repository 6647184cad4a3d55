pub mod gemini;
pub mod knowledge;
pub mod knowledge_router;
pub mod model;
pub mod orchestrator;
pub mod prompts;
pub mod tools;

pub use gemini::GeminiClient;
pub use knowledge::{ClinicKnowledgeBase, KnowledgeRetriever};
pub use model::ChatModel;
pub use orchestrator::{AgentSettings, SchedulingAgent, TurnPhase};
pub use tools::{SchedulingBackend, SchedulingTool, ToolExecutor};
