#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use agent_cell::models::{ContentPart, ModelOutput, ModelRequest, ToolInvocation};
use agent_cell::services::{
    AgentSettings, ChatModel, KnowledgeRetriever, SchedulingAgent, SchedulingBackend, ToolExecutor,
};
use agent_cell::AgentError;
use appointment_cell::models::{BookAppointmentRequest, SchedulingError, TimeSlot};
use appointment_cell::Scheduler;
use shared_database::ScheduleRepository;
use shared_models::scheduling::{Appointment, AppointmentType};
use shared_utils::test_utils::{sample_template, TestCalendar};

pub const CLINIC_PHONE: &str = "+1-555-123-4567";

/// Replays queued outputs in order and records every request it receives.
#[derive(Default)]
pub struct ScriptedModel {
    outputs: Mutex<VecDeque<Result<ModelOutput, AgentError>>>,
    requests: Mutex<Vec<ModelRequest>>,
    delay: Option<Duration>,
}

impl ScriptedModel {
    pub fn new(outputs: Vec<Result<ModelOutput, AgentError>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(vec![Ok(ModelOutput::text("too late"))])
        }
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelOutput, AgentError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::UpstreamModel("script exhausted".to_string())))
    }
}

pub struct StaticKnowledge {
    pub context: String,
    pub queries: Mutex<Vec<String>>,
}

impl StaticKnowledge {
    pub fn new(context: &str) -> Self {
        Self {
            context: context.to_string(),
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl KnowledgeRetriever for StaticKnowledge {
    async fn context_for(&self, query: &str) -> Result<String, AgentError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.context.clone())
    }
}

pub struct FailingKnowledge;

#[async_trait]
impl KnowledgeRetriever for FailingKnowledge {
    async fn context_for(&self, _query: &str) -> Result<String, AgentError> {
        Err(AgentError::KnowledgeRetrieval("vector store offline".to_string()))
    }
}

/// A scheduler that never answers within any reasonable tool timeout.
pub struct StalledScheduler {
    pub stall: Duration,
}

#[async_trait]
impl SchedulingBackend for StalledScheduler {
    async fn compute_slots(
        &self,
        _date: &str,
        _appointment_type: AppointmentType,
    ) -> Result<Vec<TimeSlot>, SchedulingError> {
        tokio::time::sleep(self.stall).await;
        Ok(Vec::new())
    }

    async fn book(&self, _request: BookAppointmentRequest) -> Result<Appointment, SchedulingError> {
        tokio::time::sleep(self.stall).await;
        Err(SchedulingError::Internal("stalled scheduler".to_string()))
    }
}

pub fn tool_call(name: &str, arguments: Value) -> ModelOutput {
    ModelOutput {
        parts: vec![ContentPart::ToolCall(ToolInvocation {
            call_id: format!("call_{}", name),
            name: name.to_string(),
            arguments,
        })],
    }
}

pub fn test_scheduler() -> Arc<Scheduler> {
    Arc::new(Scheduler::new(
        Arc::new(ScheduleRepository::in_memory(sample_template())),
        Arc::new(TestCalendar::clock()),
    ))
}

pub fn settings() -> AgentSettings {
    AgentSettings {
        model_timeout: Duration::from_secs(5),
        tool_timeout: Duration::from_secs(5),
        clinic_phone: CLINIC_PHONE.to_string(),
    }
}

pub fn build_agent(
    model: Arc<ScriptedModel>,
    knowledge: Arc<dyn KnowledgeRetriever>,
    scheduler: Arc<Scheduler>,
    settings: AgentSettings,
) -> SchedulingAgent {
    build_agent_with_backend(model, knowledge, scheduler, settings)
}

pub fn build_agent_with_backend(
    model: Arc<ScriptedModel>,
    knowledge: Arc<dyn KnowledgeRetriever>,
    scheduler: Arc<dyn SchedulingBackend>,
    settings: AgentSettings,
) -> SchedulingAgent {
    SchedulingAgent::new(
        model,
        knowledge,
        ToolExecutor::new(scheduler, Arc::new(TestCalendar::clock())),
        settings,
    )
}
