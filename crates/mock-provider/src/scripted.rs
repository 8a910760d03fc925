//! Scripted provider implementation - replays a fixed sequence of outcomes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use completion_core::{
    Completion, CompletionProvider, CompletionRequest, ModelLimits, ProviderError,
};

/// A provider that answers from a queue of scripted outcomes.
///
/// Each call pops the next outcome. Once the script is exhausted every call
/// returns the fallback completion (empty unless set with [`otherwise`]).
/// All requests are recorded so tests can assert on call counts and on what
/// the caller actually sent.
///
/// [`otherwise`]: ScriptedProvider::otherwise
#[derive(Debug)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<Completion, ProviderError>>>,
    fallback: Completion,
    limits: ModelLimits,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProvider {
    /// Create a provider with an empty script.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Completion::empty(),
            limits: ModelLimits::default(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a completion with the given text.
    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.then(Ok(Completion::text(text)))
    }

    /// Queue an empty completion.
    pub fn then_empty(self) -> Self {
        self.then(Ok(Completion::empty()))
    }

    /// Queue an error.
    pub fn then_error(self, error: ProviderError) -> Self {
        self.then(Err(error))
    }

    /// Queue an arbitrary outcome.
    pub fn then(self, outcome: Result<Completion, ProviderError>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(outcome);
        }
        self
    }

    /// Completion returned once the script runs out.
    pub fn otherwise(mut self, completion: Completion) -> Self {
        self.fallback = completion;
        self
    }

    /// Limits reported for every model.
    pub fn with_limits(mut self, limits: ModelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Number of `complete` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Copies of every request received, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());

        match next {
            Some(outcome) => outcome,
            None => Ok(self.fallback.clone()),
        }
    }

    fn limits(&self, _model: &str) -> ModelLimits {
        self.limits
    }

    fn name(&self) -> &str {
        "ScriptedProvider"
    }
}
