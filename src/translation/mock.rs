//! Mock provider for testing
//!
//! A deterministic, network-free tier that can stand in for any position of
//! the chain. Every mock counts its calls so tests can assert that a tier was
//! (or was not) reached.
//!
//! # Example
//!
//! ```ignore
//! use dutch_conquerors::translation::{MockMode, MockProvider};
//!
//! let primary = MockProvider::new(MockMode::Fail(TranslationError::Transport("down".into())));
//! let secondary = MockProvider::with_mappings([("ship", "schip")]);
//! ```

use crate::translation::error::TranslationError;
use crate::translation::language::TranslationRequest;
use crate::translation::provider::{ProviderOutcome, TranslationProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock behaviours for testing different tier outcomes
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Look up the trimmed, lower-cased text; unknown words are unavailable
    Mappings(HashMap<String, String>),

    /// Always fail with the given reason
    Fail(TranslationError),

    /// Return the input unchanged (the word is the same in both languages)
    Echo,

    /// Append the target language: "ship" → "ship_nl"
    Suffix,
}

/// Mock tier with a shared call counter
#[derive(Debug, Clone)]
pub struct MockProvider {
    mode: MockMode,
    name: String,
    calls: Arc<AtomicUsize>,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
}

impl MockProvider {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            name: "Mock Provider".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            delay_ms: 0,
        }
    }

    pub fn with_mappings<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v.to_string()))
            .collect();
        Self::new(MockMode::Mappings(map))
    }

    /// A tier that always fails with a plain transport error
    pub fn failing() -> Self {
        Self::new(MockMode::Fail(TranslationError::Transport(
            "mock transport failure".to_string(),
        )))
    }

    /// A tier that always fails with an origin restriction
    pub fn cross_origin() -> Self {
        Self::new(MockMode::Fail(TranslationError::CrossOrigin(
            "NetworkError when attempting to fetch resource.".to_string(),
        )))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Number of `attempt` calls so far, shared across clones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn apply(&self, request: &TranslationRequest) -> ProviderOutcome {
        match &self.mode {
            MockMode::Mappings(map) => match map.get(&request.lookup_key()) {
                Some(text) => ProviderOutcome::Success(text.clone()),
                None => ProviderOutcome::Unavailable(TranslationError::Protocol(format!(
                    "no mock mapping for \"{}\"",
                    request.text
                ))),
            },
            MockMode::Fail(err) => ProviderOutcome::Unavailable(err.clone()),
            MockMode::Echo => ProviderOutcome::Success(request.text.clone()),
            MockMode::Suffix => ProviderOutcome::Success(format!(
                "{}_{}",
                request.text,
                request.target.as_lower()
            )),
        }
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn attempt(&self, request: &TranslationRequest) -> ProviderOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.apply(request)
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}
