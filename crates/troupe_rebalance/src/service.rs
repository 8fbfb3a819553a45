//! Bounded calls to the generation service.

use std::time::Duration;
use troupe_core::{GenerateRequest, Message};
use troupe_error::{GenerationError, GenerationErrorKind, TroupeResult};
use troupe_interface::GenerationService;
use tracing::{debug, warn};

/// Send `messages` once, within `deadline`.
///
/// Timeouts, service errors and blank answers are all errors.
pub(crate) async fn call(
    service: &dyn GenerationService,
    messages: Vec<Message>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    deadline: Duration,
) -> TroupeResult<String> {
    let request = GenerateRequest::builder()
        .messages(messages)
        .max_tokens(max_tokens)
        .temperature(temperature)
        .build()
        .map_err(|e| {
            GenerationError::new(GenerationErrorKind::Transport(format!(
                "Could not build request: {}",
                e
            )))
        })?;

    let response = tokio::time::timeout(deadline, service.generate(&request))
        .await
        .map_err(|_| {
            GenerationError::new(GenerationErrorKind::Timeout(deadline.as_millis() as u64))
        })??;

    let text = response.text();
    if text.trim().is_empty() {
        return Err(GenerationError::new(GenerationErrorKind::EmptyResponse).into());
    }
    debug!(chars = text.len(), "Generation call succeeded");
    Ok(text)
}

/// Ask the service once. Any failure (timeout, error, blank or refused answer)
/// is `None`; nothing propagates.
pub(crate) async fn ask(
    service: &dyn GenerationService,
    system: String,
    user: String,
    max_tokens: Option<u32>,
    deadline: Duration,
) -> Option<String> {
    let messages = vec![Message::system(system), Message::user(user)];
    match call(service, messages, max_tokens, None, deadline).await {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(provider = service.provider_name(), error = %e, "Generation call failed");
            None
        }
    }
}
