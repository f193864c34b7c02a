/// Translation Module
///
/// This module turns vocabulary words into translations for the Dutch
/// Conquerors game. A single word goes through an ordered fallback chain of
/// providers; a failure at any tier only moves the request to the next one,
/// and total failure is reported as `TranslationResult::NotFound`.
///
/// # Overview
///
/// 1. **Primary** - DeepLX behind the local `/api/translate` proxy
/// 2. **Secondary** - Google Translate with the default client identifier
/// 3. **Secondary (gtx)** - the same engine with the `gtx` client identifier
/// 4. **CORS relays** - Google re-issued through public relays, for origin restrictions
/// 5. **Local dictionary** - a fixed English → Dutch table, Dutch targets only
///
/// `BatchTranslator` runs many words through the chain concurrently and keeps
/// only the pairs that differ between the two languages.
///
/// # Example
///
/// ```ignore
/// use dutch_conquerors::translation::{BatchTranslator, Language, ResolverConfig, TranslationResolver};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let resolver = Arc::new(TranslationResolver::from_config(&ResolverConfig::from_env()?)?);
///     let batch = BatchTranslator::new(resolver);
///
///     let words = vec!["ship".to_string(), "taxi".to_string()];
///     let pairs = batch.translate_all(&words, &Language::english(), &Language::dutch()).await;
///
///     println!("{:?}", pairs); // [WordPair { english: "ship", dutch: "schip" }]
///     Ok(())
/// }
/// ```
pub mod batch;
pub mod config;
pub mod deepl;
pub mod dictionary;
pub mod error;
pub mod google;
pub mod language;
pub mod mock;
pub mod provider;
pub mod relay;
pub mod resolver;

#[cfg(test)]
mod test_support;

pub use batch::{BatchTranslator, WordPair};
pub use config::{RelayKind, RelayTrigger, ResolverConfig};
pub use deepl::DeepLProvider;
pub use dictionary::{DictionaryProvider, LocalFallbackDictionary};
pub use error::{TrResult, TranslationError};
pub use google::{ClientMode, GoogleProvider, is_cross_origin_failure, looks_like_cross_origin};
pub use language::{Language, TranslationRequest, TranslationResult};
pub use mock::{MockMode, MockProvider};
pub use provider::{ProviderOutcome, TranslationProvider};
pub use relay::{AllOriginsRelay, CorsProxyIoRelay, RelayAdapter, RelayProvider};
pub use resolver::{
    AttemptStatus, ChainProviders, Resolution, Tier, TierAttempt, TierGate, TierStage,
    TranslationResolver,
};
