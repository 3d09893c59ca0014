//! Language model integration.
//!
//! A small provider abstraction over chat-completion backends. The OpenAI
//! Chat Completions API is the only backend; tests plug in mock providers.

pub(crate) mod openai;
pub(crate) mod provider;

pub use openai::OpenAiProvider;
pub use provider::{ChatProvider, ChatReply, ChatRequest};
