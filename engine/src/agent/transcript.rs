//! Conversation transcript
//!
//! Ordered record of user, assistant, and tool messages for one conversation
//! session. The system prompt is not stored here; the agent prepends it on
//! every model call. When the estimated token footprint exceeds the budget,
//! the oldest entries are dropped while the most recent exchange is kept.

use crate::llm::{Message, MessageRole};

/// Default context budget in tokens (conservative estimate for most models)
const DEFAULT_CONTEXT_LIMIT: usize = 24_000;

/// Average tokens per character (rough estimate: 1 token ≈ 4 characters)
const CHARS_PER_TOKEN: usize = 4;

/// Explicit conversation state owned by one agent session.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    context_limit: usize,
    token_count: usize,
}

impl Transcript {
    /// Create an empty transcript with the default context budget
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_CONTEXT_LIMIT)
    }

    /// Create an empty transcript with a specific context budget
    pub fn with_limit(context_limit: usize) -> Self {
        Self {
            messages: Vec::new(),
            context_limit,
            token_count: 0,
        }
    }

    /// Append a message, trimming old entries if the budget is exceeded.
    pub fn push(&mut self, message: Message) {
        self.token_count += Self::estimate_tokens(&message);
        self.messages.push(message);

        if self.token_count > self.context_limit {
            self.trim();
        }
    }

    /// All messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Reset the conversation, discarding all history.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.token_count = 0;
    }

    /// Drop oldest messages until back under the budget, always keeping the
    /// most recent exchange.
    ///
    /// Tool results are only meaningful after the assistant message that
    /// requested them, so dropping that message also drops its results; the
    /// transcript head is never a tool-role message.
    fn trim(&mut self) {
        while self.token_count > self.context_limit && self.messages.len() > 2 {
            self.remove_front();
            while self
                .messages
                .first()
                .is_some_and(|m| m.role == MessageRole::Tool)
            {
                self.remove_front();
            }
        }
    }

    fn remove_front(&mut self) {
        let removed = self.messages.remove(0);
        self.token_count = self
            .token_count
            .saturating_sub(Self::estimate_tokens(&removed));
    }

    /// Rough token estimate from character count.
    fn estimate_tokens(message: &Message) -> usize {
        let overhead = 10;
        message.content.len().div_ceil(CHARS_PER_TOKEN) + overhead
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
