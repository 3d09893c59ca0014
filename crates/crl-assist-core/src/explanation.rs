//! One-shot AI interpretation of a classification result.

use crate::error::ExplanationError;
use crate::llm::{ChatProvider, ChatRequest};
use crate::types::ClassificationResult;

/// Build the prompt asking for a clinical-style reading of the result.
///
/// The probability is always rendered with two decimals.
pub fn explanation_prompt(result: &ClassificationResult) -> String {
    format!(
        "The uploaded ultrasound image was classified as **'{}'** \
         with a probability of **{:.2}**.\n\n\
         Please provide a short, clinical-style explanation of this result. \
         Consider if the image might be usable for crown-rump length (CRL) measurement.",
        result.prediction, result.probability
    )
}

/// Ask the language model to explain a classification result.
pub async fn request_explanation(
    provider: &dyn ChatProvider,
    result: &ClassificationResult,
) -> Result<String, ExplanationError> {
    let request = ChatRequest::single_prompt(explanation_prompt(result));
    let reply = provider.complete(&request).await?;

    tracing::debug!(
        provider = provider.name(),
        model = %reply.model,
        tokens = ?reply.tokens_used,
        latency_ms = reply.latency_ms,
        "Explanation generated"
    );
    Ok(reply.text)
}
