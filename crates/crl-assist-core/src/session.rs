//! One interactive user session.
//!
//! A [`Session`] owns everything that lives for the duration of one user's
//! visit: the classifier client, the language model provider (present only
//! once a credential has been entered), the chat transcript, and the most
//! recent classification. Nothing here is shared between sessions.

use crate::classifier::{Classifier, HttpClassifier};
use crate::config::{Config, LlmConfig};
use crate::conversation::Conversation;
use crate::error::{ChatError, ClassificationError, ExplanationError};
use crate::explanation;
use crate::llm::{ChatProvider, OpenAiProvider};
use crate::types::{ChatTurn, ClassificationResult, Credential};
use crate::upload::ImageUpload;

/// What happened to the optional explanation step.
#[derive(Debug)]
pub enum Explanation {
    /// No credential was present, so no call was made
    Skipped,
    /// The language model produced an interpretation
    Generated(String),
    /// The call failed; the classification result is still valid
    Failed(ExplanationError),
}

/// Result of analyzing one uploaded image.
#[derive(Debug)]
pub struct InferenceOutcome {
    pub result: ClassificationResult,
    pub explanation: Explanation,
}

/// State for one interactive session.
pub struct Session {
    classifier: Box<dyn Classifier>,
    llm_config: LlmConfig,
    llm: Option<Box<dyn ChatProvider>>,
    conversation: Conversation,
    last_result: Option<ClassificationResult>,
}

impl Session {
    /// Create a session talking to the configured endpoints.
    ///
    /// The language model stays disabled until [`Session::set_credential`].
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            Box::new(HttpClassifier::new(&config.classifier)),
            config.llm.clone(),
            None,
        )
    }

    /// Assemble a session from explicit collaborators.
    pub fn with_parts(
        classifier: Box<dyn Classifier>,
        llm_config: LlmConfig,
        llm: Option<Box<dyn ChatProvider>>,
    ) -> Self {
        Self {
            classifier,
            llm_config,
            llm,
            conversation: Conversation::new(),
            last_result: None,
        }
    }

    /// Enable the language model with the user's API key.
    ///
    /// Replacing the key keeps the existing transcript.
    pub fn set_credential(&mut self, credential: Credential) {
        tracing::debug!(model = %self.llm_config.model, "API key set for session");
        self.llm = Some(Box::new(OpenAiProvider::new(&self.llm_config, credential)));
    }

    /// Whether a credential has been entered.
    pub fn has_credential(&self) -> bool {
        self.llm.is_some()
    }

    /// Classify an image, then explain the result if a credential is present.
    ///
    /// Only the classification can fail the call. An explanation failure is
    /// reported inside the outcome.
    pub async fn analyze(
        &mut self,
        upload: &ImageUpload,
    ) -> Result<InferenceOutcome, ClassificationError> {
        self.last_result = None;
        let result = self.classifier.classify(upload).await?;
        self.last_result = Some(result.clone());

        let explanation = match self.llm.as_deref() {
            None => {
                tracing::debug!("No API key; skipping AI interpretation");
                Explanation::Skipped
            }
            Some(provider) => match explanation::request_explanation(provider, &result).await {
                Ok(text) => Explanation::Generated(text),
                Err(e) => {
                    tracing::warn!("{e}");
                    Explanation::Failed(e)
                }
            },
        };

        Ok(InferenceOutcome {
            result,
            explanation,
        })
    }

    /// Submit a chat message. Refused without a credential.
    pub async fn ask(&mut self, text: &str) -> Result<&ChatTurn, ChatError> {
        let Some(provider) = self.llm.as_deref() else {
            return Err(ChatError::MissingCredential);
        };
        self.conversation.submit(provider, text).await
    }

    /// The chat transcript, oldest first.
    pub fn transcript(&self) -> &[ChatTurn] {
        self.conversation.render()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The most recent successful classification, if any.
    pub fn last_result(&self) -> Option<&ClassificationResult> {
        self.last_result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UploadConfig;
    use crate::error::CallFailure;
    use crate::test_support::{sample_image, MockClassifier, MockProvider};

    fn upload() -> ImageUpload {
        ImageUpload::from_bytes(
            "scan.jpg",
            sample_image(image::ImageFormat::Jpeg),
            &UploadConfig::default(),
        )
        .unwrap()
    }

    fn session(classifier: &MockClassifier, llm: Option<&MockProvider>) -> Session {
        Session::with_parts(
            Box::new(classifier.clone()),
            LlmConfig::default(),
            llm.map(|p| Box::new(p.clone()) as Box<dyn ChatProvider>),
        )
    }

    #[tokio::test]
    async fn test_analyze_without_credential_skips_explanation() {
        let classifier = MockClassifier::returning("good", 0.87);
        let provider = MockProvider::replying("unused");
        let mut session = session(&classifier, None);

        let outcome = session.analyze(&upload()).await.unwrap();
        assert_eq!(outcome.result.prediction, "good");
        assert_eq!(outcome.result.probability, 0.87);
        assert!(matches!(outcome.explanation, Explanation::Skipped));
        assert!(!session.has_credential());
        assert_eq!(provider.call_count(), 0);

        // Asking without a key is refused too, still without a call.
        assert!(session.ask("What is CRL?").await.is_err());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_with_credential_generates_explanation() {
        let classifier = MockClassifier::returning("good", 0.87);
        let provider = MockProvider::replying("Suitable for CRL measurement.");
        let mut session = session(&classifier, Some(&provider));

        let outcome = session.analyze(&upload()).await.unwrap();
        match outcome.explanation {
            Explanation::Generated(text) => assert_eq!(text, "Suitable for CRL measurement."),
            other => panic!("expected explanation, got {other:?}"),
        }
        assert_eq!(provider.call_count(), 1);
        // The explanation is not part of the chat transcript.
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_explanation_failure_keeps_result() {
        let classifier = MockClassifier::returning("bad", 0.31);
        let provider = MockProvider::failing(|| CallFailure::Status {
            status: 401,
            body: "invalid api key".to_string(),
        });
        let mut session = session(&classifier, Some(&provider));

        let outcome = session.analyze(&upload()).await.unwrap();
        assert_eq!(outcome.result.prediction, "bad");
        assert!(matches!(outcome.explanation, Explanation::Failed(_)));
        assert_eq!(session.last_result().unwrap().prediction, "bad");
    }

    #[tokio::test]
    async fn test_classification_failure_leaves_conversation_untouched() {
        let classifier = MockClassifier::server_error();
        let provider = MockProvider::replying("Answer.");
        let mut session = session(&classifier, Some(&provider));
        session.ask("What is CRL?").await.unwrap();
        let before = session.transcript().to_vec();

        let err = session.analyze(&upload()).await.unwrap_err();
        assert!(matches!(
            err,
            ClassificationError::Call(CallFailure::Status { status: 500, .. })
        ));
        assert_eq!(session.transcript(), before.as_slice());
        assert!(session.last_result().is_none());
        // Only the chat call reached the language model.
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_session_accepts_uploads_after_failure() {
        let failing = MockClassifier::server_error();
        let mut session = session(&failing, None);
        assert!(session.analyze(&upload()).await.is_err());
        assert!(session.analyze(&upload()).await.is_err());
        assert_eq!(failing.call_count(), 2);
    }

    #[tokio::test]
    async fn test_ask_without_credential_is_refused() {
        let classifier = MockClassifier::returning("good", 0.87);
        let mut session = session(&classifier, None);

        let err = session.ask("What is CRL?").await.unwrap_err();
        assert!(matches!(err, ChatError::MissingCredential));
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_ask_round_trip() {
        let classifier = MockClassifier::returning("good", 0.87);
        let provider = MockProvider::replying("CRL is measured from crown to rump.");
        let mut session = session(&classifier, Some(&provider));

        let reply = session.ask("What is CRL?").await.unwrap().clone();
        assert_eq!(reply, ChatTurn::assistant("CRL is measured from crown to rump."));
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.conversation().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_ask_leaves_unanswered_turn() {
        let classifier = MockClassifier::returning("good", 0.87);
        let provider = MockProvider::failing(|| CallFailure::Timeout);
        let mut session = session(&classifier, Some(&provider));

        let err = session.ask("What is CRL?").await.unwrap_err();
        assert!(matches!(err, ChatError::Call(CallFailure::Timeout)));
        assert!(session.conversation().has_unanswered_turn());
        assert_eq!(session.transcript(), &[ChatTurn::user("What is CRL?")]);
    }

    #[tokio::test]
    async fn test_last_result_tracks_latest_success() {
        let classifier = MockClassifier::returning("good", 0.87);
        let mut session = session(&classifier, None);
        assert!(session.last_result().is_none());

        session.analyze(&upload()).await.unwrap();
        assert_eq!(session.last_result().unwrap().probability, 0.87);
    }

    #[test]
    fn test_set_credential_enables_llm() {
        let classifier = MockClassifier::returning("good", 0.87);
        let mut session = session(&classifier, None);
        assert!(!session.has_credential());

        session.set_credential(Credential::new("sk-test").unwrap());
        assert!(session.has_credential());
    }
}
