//! Latency wrapper for exercising request deadlines.

use std::time::Duration;

use async_trait::async_trait;
use completion_core::{
    Completion, CompletionProvider, CompletionRequest, ModelLimits, ProviderError,
};
use tokio::time::sleep;

/// Adds a fixed latency to every call of the wrapped provider.
///
/// Each attempt pays the latency again, so wrapping a [`ScriptedProvider`]
/// that answers empty twice costs three latencies before the text arrives.
///
/// [`ScriptedProvider`]: crate::ScriptedProvider
pub struct DelayedProvider<P> {
    inner: P,
    latency: Duration,
}

impl<P: CompletionProvider> DelayedProvider<P> {
    pub fn new(inner: P, latency: Duration) -> Self {
        Self { inner, latency }
    }

    pub fn with_millis(inner: P, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// The wrapped provider, for inspecting its call log.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl<P: CompletionProvider> CompletionProvider for DelayedProvider<P> {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
        sleep(self.latency).await;
        self.inner.complete(request).await
    }

    fn limits(&self, model: &str) -> ModelLimits {
        self.inner.limits(model)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
