//! crl-assist core - ultrasound classification, AI interpretation, and CRL chat.
//!
//! The library is glue between two remote services: an ultrasound image
//! classifier reached over HTTP, and the OpenAI Chat Completions API used both
//! to explain classification results and to answer free-form questions about
//! Crown-Rump Length.
//!
//! # Architecture
//!
//! ```text
//! Image → Validate → POST /predict/ → label + probability ─┬→ display
//!                                                          └→ (API key?) explain → display
//! Question → append to transcript → Chat Completions(full transcript) → append reply
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use crl_assist_core::{Config, Credential, ImageUpload, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let mut session = Session::new(&config);
//!     if let Some(key) = Credential::from_env(&config.llm.api_key_env) {
//!         session.set_credential(key);
//!     }
//!
//!     let upload = ImageUpload::from_path("scan.png".as_ref(), &config.upload)?;
//!     let outcome = session.analyze(&upload).await?;
//!     println!("Prediction: {}", outcome.result.display_label());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod classifier;
pub mod config;
pub mod conversation;
pub mod error;
pub mod explanation;
pub(crate) mod http;
pub mod llm;
pub mod session;
pub mod types;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenient access
pub use classifier::{Classifier, HttpClassifier};
pub use config::Config;
pub use conversation::Conversation;
pub use error::{CallFailure, ChatError, ClassificationError, ConfigError, ExplanationError};
pub use llm::{ChatProvider, OpenAiProvider};
pub use session::{Explanation, InferenceOutcome, Session};
pub use types::{ChatTurn, ClassificationResult, Credential, Role};
pub use upload::{ImageUpload, UploadFormat};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
