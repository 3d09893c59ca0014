//! Append-only chat transcript for one session.
//!
//! Every submission appends the user turn first and only then calls the
//! language model, so a failed call leaves that turn unanswered in the
//! transcript. Turns are never removed or reordered.

use crate::error::ChatError;
use crate::llm::{ChatProvider, ChatRequest};
use crate::types::{ChatTurn, Role};

/// Ordered user/assistant turns, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn, send the whole transcript, and append the reply.
    ///
    /// On failure the user turn stays in place with no assistant turn after it.
    /// Blank input is rejected before anything is appended.
    pub async fn submit(
        &mut self,
        provider: &dyn ChatProvider,
        text: &str,
    ) -> Result<&ChatTurn, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.turns.push(ChatTurn::user(text));
        let request = ChatRequest::transcript(&self.turns);

        match provider.complete(&request).await {
            Ok(reply) => {
                tracing::debug!(
                    provider = provider.name(),
                    turns = self.turns.len() + 1,
                    tokens = ?reply.tokens_used,
                    latency_ms = reply.latency_ms,
                    "Chat reply received"
                );
                self.turns.push(ChatTurn::assistant(reply.text));
                Ok(&self.turns[self.turns.len() - 1])
            }
            Err(e) => {
                tracing::warn!(turns = self.turns.len(), "Chat call failed: {e}");
                Err(e.into())
            }
        }
    }

    /// The full transcript for display. Has no side effects.
    pub fn render(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// True when the last turn is a user turn that never got a reply.
    pub fn has_unanswered_turn(&self) -> bool {
        self.turns.last().is_some_and(|t| t.role == Role::User)
    }
}
