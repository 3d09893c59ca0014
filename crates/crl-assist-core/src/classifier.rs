//! Client for the remote ultrasound classification service.
//!
//! The service takes a multipart upload with a single `file` field and answers
//! with `{"prediction": <label>, "probability": <number>}`.

use crate::config::ClassifierConfig;
use crate::error::{CallFailure, ClassificationError};
use crate::http;
use crate::types::ClassificationResult;
use crate::upload::ImageUpload;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

/// Anything that can turn an upload into a label and probability.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, upload: &ImageUpload)
        -> Result<ClassificationResult, ClassificationError>;
}

/// Classifier backed by the HTTP `/predict/` endpoint.
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    timeout_ms: Option<u64>,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            client: http::client(),
            endpoint: config.endpoint.clone(),
            timeout_ms: config.timeout_ms,
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(
        &self,
        upload: &ImageUpload,
    ) -> Result<ClassificationResult, ClassificationError> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(upload.format.mime_type())
            .map_err(CallFailure::from)?;
        let form = Form::new().part("file", part);

        tracing::debug!(
            endpoint = %self.endpoint,
            file = %upload.file_name,
            bytes = upload.bytes.len(),
            "Submitting image for classification"
        );

        let request = http::with_timeout(self.client.post(&self.endpoint), self.timeout_ms)
            .multipart(form);
        let resp = http::send_checked(request).await?;
        let result: ClassificationResult = http::read_json(resp).await?;

        if !result.probability.is_finite() || !(0.0..=1.0).contains(&result.probability) {
            return Err(CallFailure::MalformedBody(format!(
                "probability {} is outside [0, 1]",
                result.probability
            ))
            .into());
        }

        tracing::info!(
            prediction = %result.prediction,
            probability = result.probability,
            "Classification received"
        );
        Ok(result)
    }
}
