//! Generation service configuration.

use serde::{Deserialize, Serialize};

/// Which service to build and how to call it.
///
/// Deserialized from the `[service]` table of `troupe.toml`; every field has a
/// default so partial tables are fine.
///
/// ```toml
/// [service]
/// provider = "openai"
/// model = "gpt-4o-mini"
/// timeout_secs = 60
/// requests_per_minute = 20
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// `openai` or `offline`
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Chat completions endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Deadline for a single generation call, retries included
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional client-side throttle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_per_minute: Option<u32>,

    /// Override for transport retry count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<usize>,

    /// Override for the initial transport retry backoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_backoff_ms: Option<u64>,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.6
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            requests_per_minute: None,
            max_retries: None,
            retry_backoff_ms: None,
        }
    }
}

impl ServiceConfig {
    /// An offline configuration: every call fails and fallback repair does the work.
    pub fn offline() -> Self {
        Self {
            provider: "offline".to_string(),
            ..Self::default()
        }
    }

    /// Per-call deadline.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
