//! Local fallback dictionary: the last tier
//!
//! A small, fixed English → Dutch table bundled with the game. It is only
//! consulted for Dutch targets and is read-only for the lifetime of the process.

use crate::translation::error::TranslationError;
use crate::translation::language::TranslationRequest;
use crate::translation::provider::{ProviderOutcome, TranslationProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::LazyLock;

const ENTRIES: &[(&str, &str)] = &[
    // Maritime and historical terms
    ("ship", "schip"),
    ("sail", "zeilen"),
    ("sea", "zee"),
    ("ocean", "oceaan"),
    ("captain", "kapitein"),
    ("crew", "bemanning"),
    ("treasure", "schat"),
    ("gold", "goud"),
    ("island", "eiland"),
    ("coast", "kust"),
    ("harbor", "haven"),
    ("port", "poort"),
    ("wind", "wind"),
    ("storm", "storm"),
    ("anchor", "anker"),
    ("compass", "kompas"),
    ("map", "kaart"),
    ("voyage", "reis"),
    ("explorer", "ontdekkingsreiziger"),
    ("trade", "handel"),
    ("merchant", "koopman"),
    ("colony", "kolonie"),
    ("spice", "specerij"),
    ("cannon", "kanon"),
    ("fleet", "vloot"),
    ("admiral", "admiraal"),
    ("battle", "slag"),
    ("victory", "overwinning"),
    ("conquest", "verovering"),
    ("empire", "rijk"),
    // Common words
    ("hello", "hallo"),
    ("goodbye", "tot ziens"),
    ("yes", "ja"),
    ("no", "nee"),
    ("thank", "dank"),
    ("please", "alsjeblieft"),
    ("water", "water"),
    ("fire", "vuur"),
    ("earth", "aarde"),
    ("air", "lucht"),
    ("house", "huis"),
    ("cat", "kat"),
    ("dog", "hond"),
    ("bird", "vogel"),
    ("fish", "vis"),
    ("tree", "boom"),
    ("flower", "bloem"),
    ("sun", "zon"),
    ("moon", "maan"),
    ("star", "ster"),
    ("book", "boek"),
    ("food", "eten"),
    ("drink", "drinken"),
    ("love", "liefde"),
    ("friend", "vriend"),
    ("family", "familie"),
    ("time", "tijd"),
    ("day", "dag"),
    ("night", "nacht"),
    ("morning", "ochtend"),
    ("evening", "avond"),
];

static TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ENTRIES.iter().copied().collect());

/// Read-only English → Dutch lookup table
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFallbackDictionary;

impl LocalFallbackDictionary {
    pub fn new() -> Self {
        Self
    }

    /// Exact match after trimming and lower-casing
    pub fn lookup(&self, text: &str) -> Option<&'static str> {
        TABLE.get(text.trim().to_lowercase().as_str()).copied()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.lookup(text).is_some()
    }

    pub fn len(&self) -> usize {
        TABLE.len()
    }

    pub fn is_empty(&self) -> bool {
        TABLE.is_empty()
    }
}

/// Dictionary tier. Only answers Dutch targets.
#[derive(Debug, Clone, Default)]
pub struct DictionaryProvider {
    dictionary: LocalFallbackDictionary,
}

impl DictionaryProvider {
    pub fn new(dictionary: LocalFallbackDictionary) -> Self {
        Self { dictionary }
    }
}

#[async_trait]
impl TranslationProvider for DictionaryProvider {
    async fn attempt(&self, request: &TranslationRequest) -> ProviderOutcome {
        if !request.target.is_dutch() {
            return ProviderOutcome::Unavailable(TranslationError::Config(format!(
                "Local dictionary only covers NL, not {}",
                request.target
            )));
        }

        match self.dictionary.lookup(&request.text) {
            Some(dutch) => ProviderOutcome::Success(dutch.to_string()),
            None => ProviderOutcome::Unavailable(TranslationError::Protocol(format!(
                "\"{}\" is not in the local dictionary",
                request.lookup_key()
            ))),
        }
    }

    fn provider_name(&self) -> &str {
        "Local dictionary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::language::Language;

    #[test]
    fn test_table_size_and_no_duplicate_keys() {
        let dictionary = LocalFallbackDictionary::new();
        assert_eq!(dictionary.len(), ENTRIES.len());
        assert!(dictionary.len() >= 40);
    }

    #[test]
    fn test_lookup_is_case_and_whitespace_insensitive() {
        let dictionary = LocalFallbackDictionary::new();
        assert_eq!(dictionary.lookup("ship"), Some("schip"));
        assert_eq!(dictionary.lookup("  Ship "), Some("schip"));
        assert_eq!(dictionary.lookup("CAPTAIN"), Some("kapitein"));
    }

    #[test]
    fn test_lookup_miss() {
        let dictionary = LocalFallbackDictionary::new();
        assert_eq!(dictionary.lookup("etalage"), None);
        assert_eq!(dictionary.lookup(""), None);
        assert!(!dictionary.contains("spaceship"));
    }

    #[tokio::test]
    async fn test_provider_answers_dutch_targets() {
        let provider = DictionaryProvider::default();
        let request = TranslationRequest::new(" Anchor", Language::english(), Language::dutch());
        assert_eq!(
            provider.attempt(&request).await,
            ProviderOutcome::Success("anker".to_string())
        );
    }

    #[tokio::test]
    async fn test_provider_ignores_other_targets() {
        let provider = DictionaryProvider::default();
        let german = Language::new("de").unwrap();
        let request = TranslationRequest::new("ship", Language::english(), german);
        assert!(!provider.attempt(&request).await.is_success());
    }
}
