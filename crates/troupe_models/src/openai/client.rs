//! HTTP client for OpenAI-compatible chat completion endpoints.

use super::dto::{ChatRequest, ChatResponse, from_chat_response, to_chat_request};
use crate::ServiceConfig;
use async_trait::async_trait;
use reqwest::Client;
use troupe_core::{GenerateRequest, GenerateResponse};
use troupe_error::{GenerationError, GenerationErrorKind, TroupeResult};
use troupe_interface::GenerationService;
use tracing::{debug, error, info, instrument, warn};

/// Client for any endpoint that speaks the OpenAI chat completions protocol.
///
/// Transport failures that look transient (timeouts, 408, 429, 5xx) are
/// retried with exponential backoff and jitter. Everything else fails on the
/// first attempt.
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    temperature: f32,
    max_tokens: u32,
    timeout_ms: u64,
    no_retry: bool,
    max_retries: Option<usize>,
    retry_backoff_ms: Option<u64>,
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatibleClient {
    /// Create a client with an explicit key.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            endpoint: endpoint.into(),
            temperature: 0.6,
            max_tokens: 2000,
            timeout_ms: 60_000,
            no_retry: false,
            max_retries: None,
            retry_backoff_ms: None,
        }
    }

    /// Create a client from configuration, reading the key from the
    /// configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationErrorKind::MissingApiKey`] if the variable is unset
    /// or empty.
    #[instrument(skip_all, fields(model = %config.model, endpoint = %config.endpoint))]
    pub fn from_config(config: &ServiceConfig) -> TroupeResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::new(GenerationErrorKind::MissingApiKey(
                    config.api_key_env.clone(),
                ))
            })?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::ClientCreation(e.to_string()))
            })?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_ms: config.timeout_secs.saturating_mul(1000),
            no_retry: config.max_retries == Some(0),
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    /// Disable transport retries.
    pub fn without_retry(mut self) -> Self {
        self.no_retry = true;
        self
    }

    async fn send_once(&self, body: &ChatRequest) -> Result<ChatResponse, GenerationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::new(GenerationErrorKind::Timeout(self.timeout_ms))
                } else {
                    GenerationError::new(GenerationErrorKind::Transport(e.to_string()))
                }
            })?;

        let status = response.status();
        debug!(status = %status, "Received response");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, error = %message, "Chat completion request failed");
            return Err(GenerationError::new(GenerationErrorKind::HttpStatus {
                status_code: status.as_u16(),
                message,
            }));
        }

        response.json::<ChatResponse>().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::MalformedResponse(e.to_string()))
        })
    }

    async fn send_with_retry(&self, body: &ChatRequest) -> Result<ChatResponse, GenerationError> {
        use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};

        let first = self.send_once(body).await;
        let e = match first {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };

        if self.no_retry || !e.kind.is_retryable() {
            warn!(error = %e, "Permanent generation error, failing immediately");
            return Err(e);
        }

        let (mut initial_ms, mut max_retries, max_delay_secs) = e.kind.retry_strategy_params();
        if let Some(backoff) = self.retry_backoff_ms {
            initial_ms = backoff;
        }
        if let Some(retries) = self.max_retries {
            max_retries = retries;
        }

        info!(
            error = %e,
            initial_backoff_ms = initial_ms,
            max_retries,
            max_delay_secs,
            "Generation request failed, will retry"
        );

        let retry_strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(std::time::Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(max_retries);

        Retry::spawn(retry_strategy, || async {
            match self.send_once(body).await {
                Ok(response) => Ok(response),
                Err(e) if e.kind.is_retryable() => {
                    warn!(error = %e, "Generation request failed, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(error = %e, "Permanent generation error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        })
        .await
    }
}

#[async_trait]
impl GenerationService for OpenAiCompatibleClient {
    #[instrument(skip(self, req), fields(provider = "openai", model = %self.model))]
    async fn generate(&self, req: &GenerateRequest) -> TroupeResult<GenerateResponse> {
        let body = to_chat_request(req, &self.model, self.temperature, self.max_tokens)?;
        debug!(messages = body.messages().len(), "Sending chat completion request");

        let response = self.send_with_retry(&body).await?;
        let generated = from_chat_response(response)?;
        debug!(outputs = generated.outputs().len(), "Chat completion succeeded");
        Ok(generated)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
