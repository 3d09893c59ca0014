//! Error types for the classification, interpretation, and chat flows.
//!
//! Every outbound HTTP call fails with a [`CallFailure`]. Each flow wraps it in
//! its own error kind so the caller can decide how loudly to report it: a
//! classification failure is an error, an explanation failure only a warning.

use std::path::PathBuf;
use thiserror::Error;

/// Normalized failure of a single outbound HTTP call.
#[derive(Error, Debug)]
pub enum CallFailure {
    /// The request exceeded its configured timeout
    #[error("request timed out")]
    Timeout,

    /// The remote host could not be reached
    #[error("could not connect: {0}")]
    Connect(String),

    /// Any other transport-level failure (TLS, request building, body streaming)
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The server answered 2xx but the body was not what we expected
    #[error("malformed response: {0}")]
    MalformedBody(String),
}

impl CallFailure {
    /// HTTP status code, when the failure came from a non-2xx response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CallFailure::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CallFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CallFailure::Timeout
        } else if e.is_connect() {
            CallFailure::Connect(e.to_string())
        } else if e.is_decode() {
            CallFailure::MalformedBody(e.to_string())
        } else {
            CallFailure::Transport(e.to_string())
        }
    }
}

/// Failure while submitting an image to the classification service.
#[derive(Error, Debug)]
pub enum ClassificationError {
    /// The classification endpoint could not be used
    #[error("Error contacting model API: {0}")]
    Call(#[from] CallFailure),

    /// Upload path does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Upload could not be read from disk
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Upload exceeds the configured size limit
    #[error("File too large: {name} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        name: String,
        size_mb: u64,
        max_mb: u64,
    },

    /// Upload is not a JPEG or PNG image
    #[error("Unsupported image format for {name}: {detail}")]
    UnsupportedFormat { name: String, detail: String },
}

/// Failure while generating the optional AI interpretation.
#[derive(Error, Debug)]
pub enum ExplanationError {
    #[error("Could not generate AI interpretation: {0}")]
    Call(#[from] CallFailure),
}

/// Failure during a chat round trip.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The language model call failed; the user turn stays unanswered
    #[error("Error calling language model: {0}")]
    Call(#[from] CallFailure),

    /// No API key has been entered for this session
    #[error("Enter your OpenAI API key to use the CRL chatbot")]
    MissingCredential,

    /// Blank input is ignored rather than sent
    #[error("Message is empty")]
    EmptyMessage,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}
