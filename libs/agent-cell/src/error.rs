// libs/agent-cell/src/error.rs
use std::time::Duration;

use thiserror::Error;

/// Failures inside one conversation turn. None of these reach the patient; the
/// orchestrator answers with the fallback message and records the text in the
/// turn metadata.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Language model request failed: {0}")]
    UpstreamModel(String),

    #[error("Language model did not answer within {0:?}")]
    ModelTimeout(Duration),

    #[error("Tool '{tool}' failed: {message}")]
    ToolExecution { tool: String, message: String },

    #[error("Tool '{tool}' did not finish within {timeout:?}")]
    ToolTimeout { tool: String, timeout: Duration },

    #[error("Knowledge retrieval failed: {0}")]
    KnowledgeRetrieval(String),
}

impl From<reqwest::Error> for AgentError {
    fn from(error: reqwest::Error) -> Self {
        AgentError::UpstreamModel(error.to_string())
    }
}
