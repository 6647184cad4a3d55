// libs/agent-cell/src/services/orchestrator.rs
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use shared_config::AppConfig;

use crate::error::AgentError;
use crate::models::{
    AgentReply, ConversationTurn, ModelMessage, ModelOutput, ModelRequest, TurnMetadata,
};
use crate::services::knowledge::KnowledgeRetriever;
use crate::services::knowledge_router::should_attach_context;
use crate::services::model::ChatModel;
use crate::services::prompts::{fallback_message, system_prompt};
use crate::services::tools::{tool_declarations, SchedulingTool, ToolExecutor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Routing,
    AwaitingModel,
    DispatchingTools,
    Responding,
    Done,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnPhase::Routing => "routing",
            TurnPhase::AwaitingModel => "awaiting_model",
            TurnPhase::DispatchingTools => "dispatching_tools",
            TurnPhase::Responding => "responding",
            TurnPhase::Done => "done",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub model_timeout: Duration,
    pub tool_timeout: Duration,
    pub clinic_phone: String,
}

impl AgentSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model_timeout: config.model_timeout,
            tool_timeout: config.tool_timeout,
            clinic_phone: config.clinic_phone.clone(),
        }
    }
}

/// Runs one conversation turn: optional knowledge lookup, a model call, at most
/// one round of tool calls, and a follow-up model call.
pub struct SchedulingAgent {
    model: Arc<dyn ChatModel>,
    knowledge: Arc<dyn KnowledgeRetriever>,
    tools: ToolExecutor,
    settings: AgentSettings,
    system_prompt: String,
}

impl SchedulingAgent {
    pub fn new(
        model: Arc<dyn ChatModel>,
        knowledge: Arc<dyn KnowledgeRetriever>,
        tools: ToolExecutor,
        settings: AgentSettings,
    ) -> Self {
        let system_prompt = system_prompt(&settings.clinic_phone);
        Self {
            model,
            knowledge,
            tools,
            settings,
            system_prompt,
        }
    }

    /// Never fails: any error is logged and answered with the fallback message.
    /// The returned history is `history` plus this turn's user and assistant
    /// entries; the user entry is always the original message.
    pub async fn process_message(&self, message: &str, history: &[ConversationTurn]) -> AgentReply {
        let mut metadata = TurnMetadata::default();

        let response = match self.run_turn(message, history, &mut metadata).await {
            Ok(response) => response,
            Err(e) => {
                error!("Conversation turn failed: {}", e);
                metadata = TurnMetadata {
                    used_faq: false,
                    tools_used: 0,
                    error: Some(e.to_string()),
                };
                fallback_message(&self.settings.clinic_phone)
            }
        };

        let mut conversation_history = Vec::with_capacity(history.len() + 2);
        conversation_history.extend_from_slice(history);
        conversation_history.push(ConversationTurn::user(message));
        conversation_history.push(ConversationTurn::assistant(response.clone()));

        AgentReply {
            response,
            conversation_history,
            metadata,
        }
    }

    async fn run_turn(
        &self,
        message: &str,
        history: &[ConversationTurn],
        metadata: &mut TurnMetadata,
    ) -> Result<String, AgentError> {
        enter(TurnPhase::Routing);
        let mut outbound = message.to_string();
        if should_attach_context(message) {
            let context = self.knowledge.context_for(message).await?;
            outbound.push_str(&format!("\n\nRelevant Clinic Information:\n{}\n", context));
            metadata.used_faq = true;
        }

        let mut messages: Vec<ModelMessage> = history.iter().map(ModelMessage::from).collect();
        messages.push(ModelMessage::User(outbound));
        let mut request = ModelRequest {
            system_prompt: self.system_prompt.clone(),
            messages,
            tools: tool_declarations(),
        };

        enter(TurnPhase::AwaitingModel);
        let output = self.call_model(&request).await?;
        let calls = output.tool_calls();

        if calls.is_empty() {
            return Ok(respond(&output));
        }

        enter(TurnPhase::DispatchingTools);
        metadata.tools_used = calls.len();
        request.messages.push(ModelMessage::ToolCalls(calls.clone()));

        for call in calls {
            let tool = SchedulingTool::parse(&call)?;
            let result = timeout(self.settings.tool_timeout, self.tools.execute(&tool))
                .await
                .map_err(|_| AgentError::ToolTimeout {
                    tool: call.name.clone(),
                    timeout: self.settings.tool_timeout,
                })??;

            debug!("Tool {} ({}) returned {}", call.name, call.call_id, result);
            request.messages.push(ModelMessage::ToolResult {
                call_id: call.call_id,
                name: call.name,
                content: result,
            });
        }

        enter(TurnPhase::AwaitingModel);
        let follow_up = self.call_model(&request).await?;
        if !follow_up.tool_calls().is_empty() {
            warn!(
                "Ignoring {} tool calls in the follow-up response",
                follow_up.tool_calls().len()
            );
        }

        info!("Turn completed with {} tool calls", metadata.tools_used);
        Ok(respond(&follow_up))
    }

    async fn call_model(&self, request: &ModelRequest) -> Result<ModelOutput, AgentError> {
        timeout(self.settings.model_timeout, self.model.generate(request))
            .await
            .map_err(|_| AgentError::ModelTimeout(self.settings.model_timeout))?
    }
}

fn enter(phase: TurnPhase) {
    debug!("Turn phase: {}", phase);
}

fn respond(output: &ModelOutput) -> String {
    enter(TurnPhase::Responding);
    let text = output.joined_text();
    enter(TurnPhase::Done);
    text
}
