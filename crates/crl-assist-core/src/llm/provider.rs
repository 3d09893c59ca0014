//! Chat provider trait and request/response types.

use crate::error::CallFailure;
use crate::types::ChatTurn;
use async_trait::async_trait;

/// An ordered list of messages to send in one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
}

impl ChatRequest {
    /// A single user message, used for one-shot prompts.
    pub fn single_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatTurn::user(prompt)],
        }
    }

    /// The full transcript, oldest turn first.
    pub fn transcript(turns: &[ChatTurn]) -> Self {
        Self {
            messages: turns.to_vec(),
        }
    }
}

/// The reply from a completion call.
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// Text of the first choice
    pub text: String,
    /// Model identifier reported by the API
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all chat backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn ChatProvider>` inside the session).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logging (e.g., "openai").
    fn name(&self) -> &str;

    /// Send the messages and return the top reply.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, CallFailure>;
}
