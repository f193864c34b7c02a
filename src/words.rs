//! Word supply for the learn and game modes
//!
//! `WordSource` draws random English words from the bundled vocabulary.
//! `WordSupply` keeps a queue of translated pairs topped up through a
//! `BatchTranslator`, so a round never waits on the network when the queue is
//! healthy and never fails when it is not.

use crate::translation::batch::{BatchTranslator, WordPair};
use crate::translation::error::{TrResult, TranslationError};
use crate::translation::language::Language;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, warn};

const BUNDLED_WORDS: &str = include_str!("../data/words.json");

/// English vocabulary to draw game words from
#[derive(Debug, Clone)]
pub struct WordSource {
    words: Vec<String>,
}

impl WordSource {
    /// The vocabulary shipped with the game (`data/words.json`)
    pub fn bundled() -> TrResult<Self> {
        let words: Vec<String> = serde_json::from_str(BUNDLED_WORDS)
            .map_err(|e| TranslationError::Config(format!("Invalid bundled word list: {}", e)))?;
        Ok(Self::from_words(words))
    }

    /// A source over a custom list; blanks and case-insensitive duplicates are dropped
    pub fn from_words(words: impl IntoIterator<Item = String>) -> Self {
        let mut seen = HashSet::new();
        let words = words
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty() && seen.insert(w.to_lowercase()))
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Up to `count` distinct words, uniformly shuffled
    pub fn random_words(&self, count: usize) -> Vec<String> {
        self.random_words_with(count, &mut rand::thread_rng())
    }

    pub fn random_words_with<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        let mut words = self.words.clone();
        words.shuffle(rng);
        words.truncate(count);
        words
    }

    /// Up to `count` random words other than `correct` (case-insensitive)
    pub fn distractors(&self, correct: &str, count: usize) -> Vec<String> {
        let correct = correct.trim().to_lowercase();
        let mut words: Vec<String> = self
            .words
            .iter()
            .filter(|w| w.to_lowercase() != correct)
            .cloned()
            .collect();
        words.shuffle(&mut rand::thread_rng());
        words.truncate(count);
        words
    }
}

/// Queue of ready-to-play word pairs
#[derive(Debug)]
pub struct WordSupply {
    batch: BatchTranslator,
    source: WordSource,
    source_lang: Language,
    target_lang: Language,
    queue: VecDeque<WordPair>,
}

impl WordSupply {
    /// Refill rounds per `refill` call
    const REFILL_ATTEMPTS: usize = 3;
    /// Words sampled per refill round; oversized to absorb filtered words
    const REFILL_SAMPLE: usize = 20;
    /// `refill` stops once this many pairs were added
    const REFILL_TARGET: usize = 5;
    /// `next_pair` refills first when the queue is this short
    const LOW_WATER: usize = 2;
    /// Rounds `next_pair` tries when the queue is still empty after a refill
    const RESCUE_ATTEMPTS: usize = 3;
    const RESCUE_SAMPLE: usize = 10;

    /// English → Dutch supply
    pub fn new(batch: BatchTranslator, source: WordSource) -> Self {
        Self::with_languages(batch, source, Language::english(), Language::dutch())
    }

    pub fn with_languages(
        batch: BatchTranslator,
        source: WordSource,
        source_lang: Language,
        target_lang: Language,
    ) -> Self {
        Self {
            batch,
            source,
            source_lang,
            target_lang,
            queue: VecDeque::new(),
        }
    }

    /// Pair served when nothing else can be found
    pub fn fallback_pair() -> WordPair {
        WordPair {
            english: "sleep".to_string(),
            dutch: "slaap".to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn source(&self) -> &WordSource {
        &self.source
    }

    async fn sample_pairs(&self, count: usize) -> Vec<WordPair> {
        let words = self.source.random_words(count);
        self.batch
            .translate_all(&words, &self.source_lang, &self.target_lang)
            .await
    }

    /// Top up the queue; returns how many pairs were added
    pub async fn refill(&mut self) -> usize {
        let mut added = 0;

        for attempt in 1..=Self::REFILL_ATTEMPTS {
            if added >= Self::REFILL_TARGET {
                break;
            }
            let pairs = self.sample_pairs(Self::REFILL_SAMPLE).await;
            debug!("Refill round {} produced {} pairs", attempt, pairs.len());
            added += pairs.len();
            self.queue.extend(pairs);
        }

        if added < Self::REFILL_TARGET {
            warn!(
                "Refill added only {} pairs after {} rounds",
                added,
                Self::REFILL_ATTEMPTS
            );
        } else {
            info!("Refill added {} pairs ({} queued)", added, self.queue.len());
        }
        added
    }

    /// Next pair to play. Never fails: falls back to `sleep`/`slaap`.
    pub async fn next_pair(&mut self) -> WordPair {
        if self.queue.len() <= Self::LOW_WATER {
            self.refill().await;
        }

        if let Some(pair) = self.queue.pop_front() {
            return pair;
        }

        for _ in 0..Self::RESCUE_ATTEMPTS {
            let mut pairs = self.sample_pairs(Self::RESCUE_SAMPLE).await.into_iter();
            if let Some(pair) = pairs.next() {
                self.queue.extend(pairs);
                return pair;
            }
        }

        warn!("No translatable words found, serving the fallback pair");
        Self::fallback_pair()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::config::RelayTrigger;
    use crate::translation::dictionary::DictionaryProvider;
    use crate::translation::mock::{MockMode, MockProvider};
    use crate::translation::resolver::{ChainProviders, Tier, TierGate, TierStage, TranslationResolver};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn batch_over(provider: MockProvider) -> BatchTranslator {
        BatchTranslator::new(Arc::new(TranslationResolver::new(vec![Tier::new(
            TierStage::Primary,
            TierGate::Always,
            Arc::new(provider),
        )])))
    }

    // ========== WordSource Tests ==========

    #[test]
    fn test_bundled_list_loads() {
        let source = WordSource::bundled().unwrap();
        assert!(source.len() > 100);
        assert!(source.words().iter().any(|w| w == "ship"));
    }

    #[test]
    fn test_from_words_drops_blanks_and_duplicates() {
        let source = WordSource::from_words(words(&["Ship", "ship ", "", "  ", "sea"]));
        assert_eq!(source.words(), &["Ship".to_string(), "sea".to_string()]);
    }

    #[test]
    fn test_random_words_are_distinct_and_capped() {
        let source = WordSource::from_words(words(&["a", "b", "c", "d"]));
        let picked = source.random_words(3);
        assert_eq!(picked.len(), 3);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 3);

        assert_eq!(source.random_words(10).len(), 4);
        assert!(source.random_words(0).is_empty());
    }

    #[test]
    fn test_random_words_with_seed_is_deterministic() {
        let source = WordSource::bundled().unwrap();
        let first = source.random_words_with(5, &mut StdRng::seed_from_u64(7));
        let second = source.random_words_with(5, &mut StdRng::seed_from_u64(7));
        assert_eq!(first, second);
    }

    #[test]
    fn test_distractors_exclude_correct_word() {
        let source = WordSource::from_words(words(&["ship", "sea", "sail", "crew", "gold"]));
        let wrong = source.distractors("SHIP", 4);
        assert_eq!(wrong.len(), 4);
        assert!(!wrong.iter().any(|w| w == "ship"));
    }

    // ========== WordSupply Tests ==========

    #[tokio::test]
    async fn test_refill_stops_after_target_reached() {
        let mock = MockProvider::new(MockMode::Suffix);
        let mut supply = WordSupply::new(batch_over(mock.clone()), WordSource::bundled().unwrap());

        let added = supply.refill().await;
        assert_eq!(added, 20);
        assert_eq!(supply.len(), 20);
        // One round of 20 words was enough
        assert_eq!(mock.calls(), 20);
    }

    #[tokio::test]
    async fn test_refill_gives_up_after_three_rounds() {
        let mock = MockProvider::with_mappings([("ship", "schip")]);
        let source = WordSource::from_words(words(&["ship", "etalage", "taxi"]));
        let mut supply = WordSupply::new(batch_over(mock.clone()), source);

        let added = supply.refill().await;
        assert_eq!(added, 3);
        assert_eq!(mock.calls(), 9);
    }

    #[tokio::test]
    async fn test_next_pair_serves_queue_in_order() {
        let mock = MockProvider::new(MockMode::Suffix);
        let source = WordSource::from_words(words(&["ship"]));
        let mut supply = WordSupply::new(batch_over(mock), source);

        let pair = supply.next_pair().await;
        assert_eq!(pair.english, "ship");
        assert_eq!(pair.dutch, "ship_nl");
        assert_eq!(supply.len(), 2);
    }

    #[tokio::test]
    async fn test_next_pair_falls_back_to_sleep() {
        let resolver = TranslationResolver::chain(
            ChainProviders {
                primary: Arc::new(MockProvider::failing()),
                secondary_default: Arc::new(MockProvider::failing()),
                secondary_alt: Arc::new(MockProvider::failing()),
                relay: Arc::new(MockProvider::failing()),
                dictionary: Arc::new(DictionaryProvider::default()),
            },
            RelayTrigger::CrossOriginOnly,
        );
        let source = WordSource::from_words(words(&["etalage", "gezellig"]));
        let mut supply = WordSupply::new(BatchTranslator::new(Arc::new(resolver)), source);

        assert_eq!(supply.next_pair().await, WordSupply::fallback_pair());
        assert!(supply.is_empty());
    }

    #[tokio::test]
    async fn test_next_pair_uses_dictionary_offline() {
        let resolver = TranslationResolver::chain(
            ChainProviders {
                primary: Arc::new(MockProvider::failing()),
                secondary_default: Arc::new(MockProvider::cross_origin()),
                secondary_alt: Arc::new(MockProvider::cross_origin()),
                relay: Arc::new(MockProvider::failing()),
                dictionary: Arc::new(DictionaryProvider::default()),
            },
            RelayTrigger::CrossOriginOnly,
        );
        let source = WordSource::from_words(words(&["captain"]));
        let mut supply = WordSupply::new(BatchTranslator::new(Arc::new(resolver)), source);

        let pair = supply.next_pair().await;
        assert_eq!(pair.english, "captain");
        assert_eq!(pair.dutch, "kapitein");
    }
}
