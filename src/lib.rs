pub mod translation;
pub mod words;

// Re-export the consumer-facing types for convenient access
pub use translation::{
    BatchTranslator, Language, RelayTrigger, ResolverConfig, TranslationError, TranslationRequest,
    TranslationResolver, TranslationResult, WordPair,
};
pub use words::{WordSource, WordSupply};
