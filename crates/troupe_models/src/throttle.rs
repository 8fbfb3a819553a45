//! Client-side request throttling.

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use troupe_core::{GenerateRequest, GenerateResponse};
use troupe_error::TroupeResult;
use troupe_interface::GenerationService;
use tracing::{debug, instrument};

/// Wraps a service and holds each call until the per-minute quota allows it.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroU32;
/// use troupe_models::{OfflineService, ThrottledService};
/// use troupe_interface::GenerationService;
///
/// let service = ThrottledService::new(OfflineService::new(), NonZeroU32::new(30).unwrap());
/// assert_eq!(service.provider_name(), "offline");
/// assert_eq!(service.requests_per_minute(), 30);
/// ```
pub struct ThrottledService<S> {
    inner: S,
    limiter: Arc<DefaultDirectRateLimiter>,
    requests_per_minute: NonZeroU32,
}

impl<S> ThrottledService<S> {
    /// Throttle `inner` to `requests_per_minute`.
    pub fn new(inner: S, requests_per_minute: NonZeroU32) -> Self {
        Self {
            inner,
            limiter: Arc::new(RateLimiter::direct(Quota::per_minute(requests_per_minute))),
            requests_per_minute,
        }
    }

    /// The configured quota.
    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute.get()
    }

    /// The wrapped service.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for ThrottledService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThrottledService")
            .field("inner", &self.inner)
            .field("requests_per_minute", &self.requests_per_minute)
            .finish()
    }
}

#[async_trait]
impl<S: GenerationService> GenerationService for ThrottledService<S> {
    #[instrument(skip(self, req), fields(rpm = self.requests_per_minute.get()))]
    async fn generate(&self, req: &GenerateRequest) -> TroupeResult<GenerateResponse> {
        self.limiter.until_ready().await;
        debug!("Throttle cleared");
        self.inner.generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
