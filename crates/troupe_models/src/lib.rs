//! Generation service implementations for Troupe.
//!
//! - [`OpenAiCompatibleClient`] talks to any OpenAI-compatible chat completions endpoint.
//!   Enable with the `openai` feature (on by default).
//! - [`OfflineService`] always fails, which sends every rebalance through
//!   deterministic fallback repair.
//! - [`ThrottledService`] wraps either with a per-minute request quota.
//!
//! [`service_from_config`] picks one based on [`ServiceConfig::provider`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod offline;
mod throttle;

#[cfg(feature = "openai")]
mod openai;

pub use config::ServiceConfig;
pub use offline::OfflineService;
pub use throttle::ThrottledService;

#[cfg(feature = "openai")]
pub use openai::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, ChoiceMessage, OpenAiCompatibleClient,
    from_chat_response, to_chat_request,
};

use std::num::NonZeroU32;
use std::sync::Arc;
use troupe_error::{ConfigError, ConfigErrorKind, TroupeResult};
use troupe_interface::GenerationService;

/// Build the service named by `config.provider`, throttled if a quota is set.
///
/// # Errors
///
/// Returns a configuration error for unknown providers, and a generation
/// error if the provider needs an API key that is not set.
///
/// # Examples
///
/// ```
/// use troupe_models::{ServiceConfig, service_from_config};
///
/// let service = service_from_config(&ServiceConfig::offline()).unwrap();
/// assert_eq!(service.provider_name(), "offline");
/// ```
pub fn service_from_config(config: &ServiceConfig) -> TroupeResult<Arc<dyn GenerationService>> {
    let service: Arc<dyn GenerationService> = match config.provider.as_str() {
        "offline" => throttled(OfflineService::new(), config.requests_per_minute),
        #[cfg(feature = "openai")]
        "openai" => throttled(OpenAiCompatibleClient::from_config(config)?, config.requests_per_minute),
        other => {
            return Err(ConfigError::new(ConfigErrorKind::UnknownProvider(other.to_string())).into());
        }
    };
    tracing::debug!(
        provider = service.provider_name(),
        model = service.model_name(),
        "Generation service ready"
    );
    Ok(service)
}

fn throttled<S: GenerationService + 'static>(
    service: S,
    requests_per_minute: Option<u32>,
) -> Arc<dyn GenerationService> {
    match requests_per_minute.and_then(NonZeroU32::new) {
        Some(rpm) => Arc::new(ThrottledService::new(service, rpm)),
        None => Arc::new(service),
    }
}
