//! Sub-configuration structs with defaults.

use serde::{Deserialize, Serialize};

/// Classification web service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Full URL of the `/predict/` endpoint
    pub endpoint: String,

    /// Request timeout in milliseconds. Unset means the HTTP client default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://ultrasound-classification-webservice.onrender.com/predict/"
                .to_string(),
            timeout_ms: None,
        }
    }
}

/// Upload restrictions applied before anything is sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Accepted file extensions (lowercase, no dot)
    pub supported_formats: Vec<String>,

    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            max_file_size_mb: 20,
        }
    }
}

/// Language model (OpenAI Chat Completions) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat Completions endpoint
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Environment variable the API key is read from
    pub api_key_env: String,

    /// Request timeout in milliseconds. Unset means the HTTP client default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_ms: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
