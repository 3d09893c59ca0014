//! OpenAI provider using the Chat Completions API.

use super::provider::{ChatProvider, ChatReply, ChatRequest};
use crate::config::LlmConfig;
use crate::error::CallFailure;
use crate::http;
use crate::types::{ChatTurn, Credential};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// OpenAI provider using Chat Completions API.
pub struct OpenAiProvider {
    credential: Credential,
    model: String,
    client: reqwest::Client,
    endpoint: String,
    timeout_ms: Option<u64>,
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig, credential: Credential) -> Self {
        Self {
            credential,
            model: config.model.clone(),
            client: http::client(),
            endpoint: config.endpoint.clone(),
            timeout_ms: config.timeout_ms,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
}

// --- Response types ---

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, CallFailure> {
        let start = Instant::now();

        let body = CompletionRequest {
            model: &self.model,
            messages: &request.messages,
        };

        tracing::debug!(
            model = %self.model,
            messages = request.messages.len(),
            "Sending chat completion"
        );

        let builder = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.credential.expose())
            .json(&body);
        let resp = http::send_checked(http::with_timeout(builder, self.timeout_ms)).await?;
        let completion: CompletionResponse = http::read_json(resp).await?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                CallFailure::MalformedBody("OpenAI returned no message content".to_string())
            })?;

        Ok(ChatReply {
            text,
            model: completion.model,
            tokens_used: completion.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
