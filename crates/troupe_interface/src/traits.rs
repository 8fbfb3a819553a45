//! The generation service seam.

use async_trait::async_trait;
use std::sync::Arc;
use troupe_core::{GenerateRequest, GenerateResponse};
use troupe_error::TroupeResult;

/// Core trait every text generation backend implements.
///
/// The rebalancer treats implementations as unreliable: it applies its own
/// timeout to every call, and errors or unusable text only cost an attempt.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate text for a request.
    async fn generate(&self, req: &GenerateRequest) -> TroupeResult<GenerateResponse>;

    /// Provider name (e.g., "openai", "offline").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-4o-mini").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<S: GenerationService + ?Sized> GenerationService for Arc<S> {
    async fn generate(&self, req: &GenerateRequest) -> TroupeResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<S: GenerationService + ?Sized> GenerationService for Box<S> {
    async fn generate(&self, req: &GenerateRequest) -> TroupeResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
