// libs/agent-cell/src/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ==============================================================================
// CONVERSATION MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnMetadata {
    pub used_faq: bool,
    pub tools_used: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one `process_message` call. `conversation_history` is the input
/// history plus the new user and assistant turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    pub response: String,
    pub conversation_history: Vec<ConversationTurn>,
    pub metadata: TurnMetadata,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Option<Vec<ConversationTurn>>,
}

pub type ChatResponse = AgentReply;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

// ==============================================================================
// MODEL EXCHANGE
// ==============================================================================

/// A structured tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub call_id: String,
    pub name: String,
    pub arguments: Value,
}

/// Messages sent to the model within a single turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelMessage {
    User(String),
    Assistant(String),
    /// The model's own request for tools, echoed back before the results.
    ToolCalls(Vec<ToolInvocation>),
    ToolResult {
        call_id: String,
        name: String,
        content: Value,
    },
}

impl From<&ConversationTurn> for ModelMessage {
    fn from(turn: &ConversationTurn) -> Self {
        match turn.role {
            Role::User => ModelMessage::User(turn.content.clone()),
            Role::Assistant => ModelMessage::Assistant(turn.content.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDeclaration {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub system_prompt: String,
    pub messages: Vec<ModelMessage>,
    pub tools: Vec<ToolDeclaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    ToolCall(ToolInvocation),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelOutput {
    pub parts: Vec<ContentPart>,
}

impl ModelOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self { parts: vec![ContentPart::Text(text.into())] }
    }

    /// Text fragments concatenated in the order received.
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text(text) => Some(text.as_str()),
                ContentPart::ToolCall(_) => None,
            })
            .collect()
    }

    pub fn tool_calls(&self) -> Vec<ToolInvocation> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::ToolCall(call) => Some(call.clone()),
                ContentPart::Text(_) => None,
            })
            .collect()
    }
}
