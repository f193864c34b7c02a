//! Batch translation into validated word pairs
//!
//! Every word gets its own resolver pipeline; the pipelines run concurrently
//! and the batch waits for all of them. Words that cannot be translated, or
//! whose translation is the same word, are dropped.
//!
//! Output order follows input order: `join_all` yields results positionally.

use crate::translation::language::{Language, TranslationRequest, TranslationResult};
use crate::translation::resolver::TranslationResolver;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A validated English/Dutch pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordPair {
    pub english: String,
    pub dutch: String,
}

impl WordPair {
    /// Build a pair, rejecting translations identical to the source
    ///
    /// Comparison is on trimmed, lower-cased text.
    pub fn validated(english: &str, dutch: &str) -> Option<Self> {
        if dutch.trim().is_empty() || same_word(english, dutch) {
            return None;
        }
        Some(Self {
            english: english.to_string(),
            dutch: dutch.to_string(),
        })
    }
}

fn same_word(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[derive(Debug, Clone)]
pub struct BatchTranslator {
    resolver: Arc<TranslationResolver>,
}

impl BatchTranslator {
    pub fn new(resolver: Arc<TranslationResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<TranslationResolver> {
        &self.resolver
    }

    /// Translate every word concurrently and keep the usable pairs
    pub async fn translate_all(
        &self,
        words: &[String],
        source: &Language,
        target: &Language,
    ) -> Vec<WordPair> {
        if words.is_empty() {
            return Vec::new();
        }

        let lookups = words.iter().map(|word| {
            let request = TranslationRequest::new(word.as_str(), source.clone(), target.clone());
            async move { (word, self.resolver.resolve(&request).await) }
        });

        let pairs: Vec<WordPair> = join_all(lookups)
            .await
            .into_iter()
            .filter_map(|(word, result)| match result {
                TranslationResult::Translated { text } => {
                    let pair = WordPair::validated(word, &text);
                    if pair.is_none() {
                        debug!("Dropping \"{}\": same in both languages", word);
                    }
                    pair
                }
                TranslationResult::NotFound => None,
            })
            .collect();

        debug!("Batch kept {} of {} words", pairs.len(), words.len());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::config::RelayTrigger;
    use crate::translation::mock::{MockMode, MockProvider};
    use crate::translation::resolver::{Tier, TierGate, TierStage};

    fn single_tier(provider: MockProvider) -> Arc<TranslationResolver> {
        Arc::new(TranslationResolver::new(vec![Tier::new(
            TierStage::Primary,
            TierGate::Always,
            Arc::new(provider),
        )]))
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_validated_rejects_identical_words() {
        assert_eq!(WordPair::validated("taxi", "taxi"), None);
        assert_eq!(WordPair::validated(" Taxi ", "TAXI"), None);
        assert_eq!(WordPair::validated("ship", "  "), None);
        assert_eq!(
            WordPair::validated("ship", "schip"),
            Some(WordPair {
                english: "ship".to_string(),
                dutch: "schip".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_not_found_words_are_dropped() {
        let batch = BatchTranslator::new(single_tier(MockProvider::with_mappings([(
            "ship", "schip",
        )])));

        let pairs = batch
            .translate_all(
                &words(&["ship", "etalage"]),
                &Language::english(),
                &Language::dutch(),
            )
            .await;

        assert_eq!(
            pairs,
            vec![WordPair {
                english: "ship".to_string(),
                dutch: "schip".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_identical_translations_are_dropped() {
        let batch = BatchTranslator::new(single_tier(MockProvider::new(MockMode::Echo)));
        let pairs = batch
            .translate_all(&words(&["taxi", "hotel"]), &Language::english(), &Language::dutch())
            .await;
        assert!(pairs.is_empty());
    }

    #[tokio::test]
    async fn test_output_keeps_input_order() {
        let batch = BatchTranslator::new(single_tier(MockProvider::new(MockMode::Suffix)));
        let pairs = batch
            .translate_all(
                &words(&["first", "second", "third"]),
                &Language::english(),
                &Language::dutch(),
            )
            .await;

        let english: Vec<&str> = pairs.iter().map(|p| p.english.as_str()).collect();
        assert_eq!(english, vec!["first", "second", "third"]);
        assert_eq!(pairs[1].dutch, "second_nl");
    }

    #[tokio::test]
    async fn test_words_run_concurrently() {
        let mock = MockProvider::new(MockMode::Suffix).with_delay(100);
        let batch = BatchTranslator::new(single_tier(mock.clone()));
        let input = words(&["a", "b", "c", "d", "e"]);

        let start = std::time::Instant::now();
        let pairs = batch
            .translate_all(&input, &Language::english(), &Language::dutch())
            .await;
        let elapsed = start.elapsed();

        assert_eq!(pairs.len(), 5);
        assert_eq!(mock.calls(), 5);
        // Sequential resolution would take at least 500ms
        assert!(elapsed.as_millis() < 400);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_batch() {
        let ok = MockProvider::with_mappings([("ship", "schip"), ("sea", "zee")]);
        let resolver = TranslationResolver::chain(
            crate::translation::resolver::ChainProviders {
                primary: Arc::new(MockProvider::failing()),
                secondary_default: Arc::new(ok),
                secondary_alt: Arc::new(MockProvider::failing()),
                relay: Arc::new(MockProvider::failing()),
                dictionary: Arc::new(MockProvider::failing()),
            },
            RelayTrigger::CrossOriginOnly,
        );
        let batch = BatchTranslator::new(Arc::new(resolver));

        let pairs = batch
            .translate_all(
                &words(&["ship", "", "etalage", "sea"]),
                &Language::english(),
                &Language::dutch(),
            )
            .await;

        let dutch: Vec<&str> = pairs.iter().map(|p| p.dutch.as_str()).collect();
        assert_eq!(dutch, vec!["schip", "zee"]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let mock = MockProvider::new(MockMode::Suffix);
        let batch = BatchTranslator::new(single_tier(mock.clone()));
        let pairs = batch
            .translate_all(&[], &Language::english(), &Language::dutch())
            .await;
        assert!(pairs.is_empty());
        assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn test_word_pair_json_shape() {
        let pair = WordPair::validated("ship", "schip").unwrap();
        assert_eq!(
            serde_json::to_value(&pair).unwrap(),
            serde_json::json!({ "english": "ship", "dutch": "schip" })
        );
    }
}
