//! A service that never answers.

use async_trait::async_trait;
use troupe_core::{GenerateRequest, GenerateResponse};
use troupe_error::{GenerationError, GenerationErrorKind, TroupeResult};
use troupe_interface::GenerationService;
use tracing::debug;

/// Generation service used when no provider is available.
///
/// Every call fails with [`GenerationErrorKind::Unavailable`], so a rebalance
/// driven by this service falls straight through to fallback repair.
///
/// # Examples
///
/// ```
/// use troupe_models::OfflineService;
/// use troupe_interface::GenerationService;
///
/// let service = OfflineService::new();
/// assert_eq!(service.provider_name(), "offline");
/// ```
#[derive(Debug, Clone, Default)]
pub struct OfflineService;

impl OfflineService {
    /// Create an offline service.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GenerationService for OfflineService {
    async fn generate(&self, req: &GenerateRequest) -> TroupeResult<GenerateResponse> {
        debug!(messages = req.messages().len(), "Offline service refusing request");
        Err(GenerationError::new(GenerationErrorKind::Unavailable("offline mode".to_string())).into())
    }

    fn provider_name(&self) -> &'static str {
        "offline"
    }

    fn model_name(&self) -> &str {
        "none"
    }
}
