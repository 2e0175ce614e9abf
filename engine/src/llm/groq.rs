//! Groq provider
//!
//! Talks to Groq's OpenAI-compatible chat-completions API with native tool
//! calling: the tool catalog is sent as the `tools` request field and
//! requested invocations come back as structured `tool_calls` on the
//! assistant message.

use super::{ChatResponse, LLMError, LLMProvider, Message, MessageRole, ToolCallRequest, ToolSpec};
use crate::config::LLMConfig;
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct GroqProvider {
    config: LLMConfig,
    api_key: String,
    client: reqwest::Client,
}

impl GroqProvider {
    pub fn new(config: LLMConfig, api_key: impl Into<String>) -> Self {
        Self {
            config,
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }
}

/// Convert a transcript message to the chat-completions wire shape.
fn to_wire(msg: &Message) -> Value {
    let mut wire = json!({
        "role": msg.role.to_string(),
        "content": msg.content,
    });

    if msg.role == MessageRole::Tool {
        if let Some(id) = &msg.tool_call_id {
            wire["tool_call_id"] = json!(id);
        }
        if let Some(name) = &msg.name {
            wire["name"] = json!(name);
        }
    }

    if !msg.tool_calls.is_empty() {
        wire["tool_calls"] = Value::Array(
            msg.tool_calls
                .iter()
                .map(|tc| {
                    json!({
                        "id": tc.id,
                        "type": "function",
                        "function": {
                            "name": tc.name,
                            "arguments": tc.arguments,
                        }
                    })
                })
                .collect(),
        );
    }

    wire
}

/// Convert a tool spec to the `tools` request entry shape.
fn spec_to_wire(spec: &ToolSpec) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": spec.name,
            "description": spec.description,
            "parameters": spec.parameters,
        }
    })
}

/// Parse the assistant message out of a chat-completions response body.
fn parse_response(data: &Value) -> super::Result<ChatResponse> {
    let message = data
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| LLMError::ParseError("No message in response".to_string()))?;

    let content = message
        .get("content")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string());

    let mut tool_calls = Vec::new();
    if let Some(calls) = message.get("tool_calls").and_then(|c| c.as_array()) {
        for call in calls {
            let id = call
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or_else(|| LLMError::ParseError("Tool call missing id".to_string()))?;
            let function = call
                .get("function")
                .ok_or_else(|| LLMError::ParseError("Tool call missing function".to_string()))?;
            let name = function
                .get("name")
                .and_then(|v| v.as_str())
                .ok_or_else(|| LLMError::ParseError("Tool call missing name".to_string()))?;
            let arguments = function
                .get("arguments")
                .and_then(|v| v.as_str())
                .unwrap_or("{}");

            tool_calls.push(ToolCallRequest::new(id, name, arguments));
        }
    }

    if content.is_none() && tool_calls.is_empty() {
        return Err(LLMError::ParseError("Empty response message".to_string()));
    }

    Ok(ChatResponse {
        content,
        tool_calls,
    })
}

#[async_trait]
impl LLMProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[ToolSpec]>,
    ) -> super::Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let api_messages: Vec<Value> = messages.iter().map(to_wire).collect();

        let mut payload = json!({
            "model": self.config.model,
            "messages": api_messages,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "top_p": self.config.top_p,
        });

        if let Some(tools) = tools {
            payload["tools"] = Value::Array(tools.iter().map(spec_to_wire).collect());
            payload["tool_choice"] = json!("auto");
        }

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => LLMError::AuthenticationFailed(text),
                429 => LLMError::RateLimitExceeded,
                _ => LLMError::InvalidRequest(text),
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        parse_response(&data)
    }
}
