// libs/agent-cell/src/services/gemini.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::error::AgentError;
use crate::models::{ContentPart, ModelMessage, ModelOutput, ModelRequest, ToolDeclaration, ToolInvocation};
use crate::services::model::ChatModel;

/// Client for Gemini's `generateContent` endpoint with function calling.
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    http_client: Client,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, AgentError> {
        let http_client = Client::builder()
            .timeout(config.model_timeout)
            .build()?;

        Ok(Self {
            api_key: config.google_api_key.clone(),
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
            model: config.llm_model.clone(),
            temperature: config.llm_temperature,
            http_client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_body(&self, request: &ModelRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(&request.system_prompt)],
            },
            contents: request.messages.iter().map(to_content).collect(),
            tools: if request.tools.is_empty() {
                Vec::new()
            } else {
                vec![ToolSet {
                    function_declarations: request.tools.clone(),
                }]
            },
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        }
    }
}

fn to_content(message: &ModelMessage) -> Content {
    match message {
        ModelMessage::User(text) => Content {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        },
        ModelMessage::Assistant(text) => Content {
            role: Some("model".to_string()),
            parts: vec![Part::text(text)],
        },
        ModelMessage::ToolCalls(calls) => Content {
            role: Some("model".to_string()),
            parts: calls
                .iter()
                .map(|call| Part {
                    function_call: Some(FunctionCall {
                        name: call.name.clone(),
                        args: call.arguments.clone(),
                    }),
                    ..Part::default()
                })
                .collect(),
        },
        ModelMessage::ToolResult { name, content, .. } => Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                function_response: Some(FunctionResponse {
                    name: name.clone(),
                    // the API only accepts an object here
                    response: match content {
                        Value::Object(_) => content.clone(),
                        other => json!({ "result": other }),
                    },
                }),
                ..Part::default()
            }],
        },
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelOutput, AgentError> {
        let body = self.build_body(request);
        debug!(
            "Calling {} with {} messages and {} tools",
            self.model,
            body.contents.len(),
            request.tools.len()
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}", status);
            return Err(AgentError::UpstreamModel(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AgentError::UpstreamModel(format!("Invalid Gemini response: {}", e)))?;

        let candidate = payload
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::UpstreamModel("Gemini returned no candidates".to_string()))?;

        let parts = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| {
                if let Some(call) = part.function_call {
                    Some(ContentPart::ToolCall(ToolInvocation {
                        call_id: format!("call_{}", Uuid::new_v4().simple()),
                        name: call.name,
                        arguments: call.args,
                    }))
                } else {
                    part.text.map(ContentPart::Text)
                }
            })
            .collect();

        Ok(ModelOutput { parts })
    }
}

// ==============================================================================
// WIRE TYPES
// ==============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolSet>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolSet {
    function_declarations: Vec<ToolDeclaration>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    function_call: Option<FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    function_response: Option<FunctionResponse>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    /// Gemini leaves `args` out for calls without parameters.
    #[serde(default = "empty_args")]
    args: Value,
}

fn empty_args() -> Value {
    Value::Object(Map::new())
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}
