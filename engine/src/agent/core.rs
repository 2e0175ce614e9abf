//! Agent Core
//!
//! This module implements the two-round orchestration protocol that turns one
//! user message into at most one batch of tool calls and one final reply:
//!
//! 1. Append the user message to the transcript
//! 2. Call the model with the tool catalog (tool choice auto)
//! 3. If the model replies with plain text, that text is the answer
//! 4. If the model requests tool calls, execute them sequentially in the
//!    order listed, appending each result to the transcript
//! 5. Call the model again without the tool catalog for the final reply
//!
//! The second call cannot request further tools, which bounds every turn to
//! one tool round. Tool side effects committed in step 4 are never rolled
//! back; a failure in step 5 degrades to a fixed reply while the store keeps
//! the writes.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::llm::{ChatResponse, LLMError, LLMProvider, Message};
use crate::tools::ToolRegistry;

use super::Transcript;

/// Timeout for each model call in seconds
const MODEL_TIMEOUT_SECS: u64 = 120;

/// Reply prefix for a turn where the first model call failed
const FIRST_ROUND_FAILURE_PREFIX: &str = "I apologize, but I encountered an error";

/// Reply for a turn where tools ran but the summary call failed
const SECOND_ROUND_FAILURE_REPLY: &str =
    "I processed your request but encountered an issue generating the final response. \
     Please try again.";

/// Conversational goal agent driving the tool-calling loop.
///
/// One agent owns one conversation session; turns are processed strictly
/// sequentially through `&mut self`. The store behind the registry may be
/// shared across independent agents.
pub struct GoalAgent {
    provider: Arc<dyn LLMProvider>,
    tools: Arc<ToolRegistry>,
    system_prompt: String,
    transcript: Transcript,
}

impl GoalAgent {
    /// Create a new agent with the given provider, tool registry, and
    /// system prompt.
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tools: Arc<ToolRegistry>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            tools,
            system_prompt: system_prompt.into(),
            transcript: Transcript::new(),
        }
    }

    /// The conversation transcript for this session.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Reset the conversation history.
    pub fn reset(&mut self) {
        self.transcript.clear();
        info!("Conversation history reset");
    }

    /// Process one user turn and return the final reply.
    ///
    /// Every per-turn failure degrades to a returned string; the transcript
    /// keeps prior turns intact so the user can simply try again.
    pub async fn chat(&mut self, user_message: &str) -> String {
        self.transcript.push(Message::user(user_message));

        // Round one: model sees the full transcript plus the tool catalog.
        let first = match self.call_model(true).await {
            Ok(response) => response,
            Err(e) => {
                error!("Model call failed: {}", e);
                return format!("{}: {}. Please try again.", FIRST_ROUND_FAILURE_PREFIX, e);
            }
        };

        if !first.has_tool_calls() {
            let reply = first.content.unwrap_or_default();
            self.transcript.push(Message::assistant(reply.clone()));
            return reply;
        }

        // Record the assistant turn including the raw tool call requests,
        // then execute them sequentially in the order the model listed them.
        let calls = first.tool_calls.clone();
        self.transcript.push(Message::assistant_with_calls(
            first.content.unwrap_or_default(),
            calls.clone(),
        ));

        for call in &calls {
            debug!("Tool call: {} ({})", call.name, call.id);

            let payload = match self.tools.dispatch(&call.name, &call.arguments).await {
                Ok(value) => value,
                Err(e) => {
                    // One failing call never aborts the batch; the model
                    // explains the failure to the user in round two.
                    warn!("Tool call '{}' failed: {}", call.name, e);
                    e.to_result_json()
                }
            };

            self.transcript
                .push(Message::tool_result(payload.to_string(), &call.id, &call.name));
        }

        // Round two: no tool catalog, so the model cannot chain further
        // calls. Side effects above are already committed either way.
        let second = match self.call_model(false).await {
            Ok(response) => response,
            Err(e) => {
                error!("Summary model call failed: {}", e);
                return SECOND_ROUND_FAILURE_REPLY.to_string();
            }
        };

        let reply = second.content.unwrap_or_default();
        self.transcript.push(Message::assistant(reply.clone()));
        reply
    }

    /// Call the model with the system prompt plus the full transcript.
    async fn call_model(&self, with_tools: bool) -> Result<ChatResponse, LLMError> {
        let mut messages = Vec::with_capacity(self.transcript.len() + 1);
        messages.push(Message::system(&self.system_prompt));
        messages.extend_from_slice(self.transcript.messages());

        let tools = if with_tools {
            Some(self.tools.specs())
        } else {
            None
        };

        match timeout(
            Duration::from_secs(MODEL_TIMEOUT_SECS),
            self.provider.complete(&messages, tools),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                error!("Model call timed out after {}s", MODEL_TIMEOUT_SECS);
                Err(LLMError::Timeout)
            }
        }
    }
}
