//! Translation provider trait
//!
//! Every tier of the fallback chain implements `TranslationProvider`. The
//! resolver only sees `ProviderOutcome`, so a provider's own failure modes
//! (HTTP status, payload shape, origin restrictions) never leak to callers.
//!
//! # Example
//!
//! ```ignore
//! use dutch_conquerors::translation::{
//!     DeepLProvider, Language, ProviderOutcome, TranslationProvider, TranslationRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = DeepLProvider::new("http://127.0.0.1:8080/api/translate".to_string(), reqwest::Client::new())?;
//!     let request = TranslationRequest::new("ship", Language::english(), Language::dutch());
//!     match provider.attempt(&request).await {
//!         ProviderOutcome::Success(text) => println!("{}", text),
//!         ProviderOutcome::Unavailable(reason) => eprintln!("{}", reason),
//!     }
//!     Ok(())
//! }
//! ```

use crate::translation::error::{TrResult, TranslationError};
use crate::translation::language::TranslationRequest;
use async_trait::async_trait;

/// Result of one tier attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// Non-empty translated text
    Success(String),
    /// The tier could not produce a translation
    Unavailable(TranslationError),
}

impl ProviderOutcome {
    /// Collapse a provider's internal result into an outcome.
    ///
    /// Blank translations count as failures.
    pub fn from_result(result: TrResult<String>) -> Self {
        match result {
            Ok(text) if !text.trim().is_empty() => ProviderOutcome::Success(text.trim().to_string()),
            Ok(_) => ProviderOutcome::Unavailable(TranslationError::Protocol(
                "Provider returned an empty translation".to_string(),
            )),
            Err(err) => ProviderOutcome::Unavailable(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProviderOutcome::Success(_))
    }
}

/// Generic trait for one tier of the translation chain
///
/// All methods are async to support I/O-bound operations like network requests.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Try to translate the request
    ///
    /// Implementations must not panic and must not return blank text as a
    /// success. Use `ProviderOutcome::from_result` to enforce the latter.
    async fn attempt(&self, request: &TranslationRequest) -> ProviderOutcome;

    /// Name used in diagnostic traces (e.g., "DeepLX", "Google Translate (gtx)")
    fn provider_name(&self) -> &str;
}
