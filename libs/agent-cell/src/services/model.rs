use async_trait::async_trait;

use crate::error::AgentError;
use crate::models::{ModelOutput, ModelRequest};

/// Conversation history in, either text or structured tool calls out.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelOutput, AgentError>;
}
