//! Translation resolver: the ordered fallback chain
//!
//! A resolver is a list of tiers. Each tier pairs a provider with a gate that
//! decides whether the tier may run for the current request. Tiers run strictly
//! one after another; the first success wins and nothing after it is touched.
//!
//! ```text
//! Start → Primary → SecondaryDefault → SecondaryAlt → SecondaryRelay → Dictionary → Resolved | NotFound
//! ```
//!
//! Build one resolver at startup and share it (`Arc<TranslationResolver>`);
//! it holds no per-request state.
//!
//! # Example
//!
//! ```ignore
//! use dutch_conquerors::translation::{Language, ResolverConfig, TranslationResolver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = TranslationResolver::from_config(&ResolverConfig::from_env()?)?;
//!     let dutch = resolver
//!         .translate_word("ship", &Language::english(), &Language::dutch())
//!         .await;
//!     println!("{:?}", dutch); // Some("schip")
//!     Ok(())
//! }
//! ```

use crate::translation::config::{RelayTrigger, ResolverConfig};
use crate::translation::deepl::DeepLProvider;
use crate::translation::dictionary::DictionaryProvider;
use crate::translation::error::{TrResult, TranslationError};
use crate::translation::google::{ClientMode, GoogleProvider};
use crate::translation::language::{Language, TranslationRequest, TranslationResult};
use crate::translation::provider::{ProviderOutcome, TranslationProvider};
use crate::translation::relay::RelayProvider;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Position of a tier in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierStage {
    Primary,
    SecondaryDefault,
    SecondaryAlt,
    SecondaryRelay,
    Dictionary,
}

impl TierStage {
    /// Whether an origin restriction at this stage opens the relay tier
    pub fn opens_relay(&self) -> bool {
        matches!(self, TierStage::SecondaryDefault | TierStage::SecondaryAlt)
    }
}

impl fmt::Display for TierStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TierStage::Primary => "primary",
            TierStage::SecondaryDefault => "secondary-default",
            TierStage::SecondaryAlt => "secondary-alt",
            TierStage::SecondaryRelay => "secondary-relay",
            TierStage::Dictionary => "dictionary",
        };
        write!(f, "{}", name)
    }
}

/// Condition under which a tier is attempted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierGate {
    Always,
    /// Only after a relay-opening stage failed with an origin restriction
    OnCrossOrigin,
    /// Only for requests into this language
    TargetLanguage(Language),
}

#[derive(Clone)]
pub struct Tier {
    pub stage: TierStage,
    pub gate: TierGate,
    pub provider: Arc<dyn TranslationProvider>,
}

impl Tier {
    pub fn new(stage: TierStage, gate: TierGate, provider: Arc<dyn TranslationProvider>) -> Self {
        Self {
            stage,
            gate,
            provider,
        }
    }
}

impl fmt::Debug for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tier")
            .field("stage", &self.stage)
            .field("gate", &self.gate)
            .field("provider", &self.provider.provider_name())
            .finish()
    }
}

/// One provider per stage of the standard chain
#[derive(Clone)]
pub struct ChainProviders {
    pub primary: Arc<dyn TranslationProvider>,
    pub secondary_default: Arc<dyn TranslationProvider>,
    pub secondary_alt: Arc<dyn TranslationProvider>,
    pub relay: Arc<dyn TranslationProvider>,
    pub dictionary: Arc<dyn TranslationProvider>,
}

/// What happened at one tier during a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    Succeeded,
    Failed(TranslationError),
    /// The gate kept the tier from running
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierAttempt {
    pub stage: TierStage,
    pub provider: String,
    pub status: AttemptStatus,
}

/// A result together with the trace of tiers that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub result: TranslationResult,
    pub attempts: Vec<TierAttempt>,
}

impl Resolution {
    /// Stages whose provider actually ran
    pub fn attempted_stages(&self) -> Vec<TierStage> {
        self.attempts
            .iter()
            .filter(|a| a.status != AttemptStatus::Skipped)
            .map(|a| a.stage)
            .collect()
    }
}

pub struct TranslationResolver {
    tiers: Vec<Tier>,
}

impl TranslationResolver {
    /// A resolver over an explicit tier list, tried in the given order
    pub fn new(tiers: Vec<Tier>) -> Self {
        Self { tiers }
    }

    /// The standard five-stage chain over the given providers
    ///
    /// The relay tier's gate follows `trigger`; with `RelayTrigger::Never` the
    /// tier is left out entirely. The dictionary tier only runs for Dutch.
    pub fn chain(providers: ChainProviders, trigger: RelayTrigger) -> Self {
        let mut tiers = vec![
            Tier::new(TierStage::Primary, TierGate::Always, providers.primary),
            Tier::new(
                TierStage::SecondaryDefault,
                TierGate::Always,
                providers.secondary_default,
            ),
            Tier::new(
                TierStage::SecondaryAlt,
                TierGate::Always,
                providers.secondary_alt,
            ),
        ];

        match trigger {
            RelayTrigger::CrossOriginOnly => tiers.push(Tier::new(
                TierStage::SecondaryRelay,
                TierGate::OnCrossOrigin,
                providers.relay,
            )),
            RelayTrigger::AnyFailure => tiers.push(Tier::new(
                TierStage::SecondaryRelay,
                TierGate::Always,
                providers.relay,
            )),
            RelayTrigger::Never => {}
        }

        tiers.push(Tier::new(
            TierStage::Dictionary,
            TierGate::TargetLanguage(Language::dutch()),
            providers.dictionary,
        ));

        Self::new(tiers)
    }

    /// The production chain: DeepLX, Google (default, gtx), relays, dictionary
    pub fn from_config(config: &ResolverConfig) -> TrResult<Self> {
        config.validate()?;
        let client = config.http_client()?;

        let primary = DeepLProvider::new(config.primary_endpoint.clone(), client.clone())?;
        let secondary_default = GoogleProvider::new(
            ClientMode::Default,
            config.secondary_endpoint.clone(),
            client.clone(),
        )?;
        let secondary_alt =
            GoogleProvider::new(ClientMode::Gtx, config.secondary_endpoint.clone(), client.clone())?;
        let dictionary = DictionaryProvider::default();

        let providers = if config.relay_trigger == RelayTrigger::Never {
            // The relay tier is dropped by `chain`; any provider fills the slot.
            ChainProviders {
                primary: Arc::new(primary),
                secondary_default: Arc::new(secondary_default),
                secondary_alt: Arc::new(secondary_alt.clone()),
                relay: Arc::new(secondary_alt),
                dictionary: Arc::new(dictionary),
            }
        } else {
            let relay = RelayProvider::new(
                config.relay_adapters(),
                config.secondary_endpoint.clone(),
                client,
            )?;
            ChainProviders {
                primary: Arc::new(primary),
                secondary_default: Arc::new(secondary_default),
                secondary_alt: Arc::new(secondary_alt),
                relay: Arc::new(relay),
                dictionary: Arc::new(dictionary),
            }
        };

        Ok(Self::chain(providers, config.relay_trigger))
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn stages(&self) -> Vec<TierStage> {
        self.tiers.iter().map(|t| t.stage).collect()
    }

    /// Resolve one request to a translation or `NotFound`. Never fails.
    pub async fn resolve(&self, request: &TranslationRequest) -> TranslationResult {
        self.resolve_detailed(request).await.result
    }

    /// Like `resolve`, but also reports what each tier did
    pub async fn resolve_detailed(&self, request: &TranslationRequest) -> Resolution {
        let mut attempts = Vec::with_capacity(self.tiers.len());

        if request.is_blank() {
            debug!(
                "{}",
                TranslationError::MalformedInput("empty source text".to_string())
            );
            return Resolution {
                result: TranslationResult::NotFound,
                attempts,
            };
        }

        let mut saw_cross_origin = false;

        for tier in &self.tiers {
            let provider = tier.provider.provider_name().to_string();

            let open = match &tier.gate {
                TierGate::Always => true,
                TierGate::OnCrossOrigin => saw_cross_origin,
                TierGate::TargetLanguage(language) => &request.target == language,
            };
            if !open {
                debug!(stage = %tier.stage, "Skipping {} for \"{}\"", provider, request.text);
                attempts.push(TierAttempt {
                    stage: tier.stage,
                    provider,
                    status: AttemptStatus::Skipped,
                });
                continue;
            }

            match tier.provider.attempt(request).await {
                ProviderOutcome::Success(text) => {
                    info!(
                        stage = %tier.stage,
                        "{} translation: \"{}\" → \"{}\"", provider, request.text, text
                    );
                    attempts.push(TierAttempt {
                        stage: tier.stage,
                        provider,
                        status: AttemptStatus::Succeeded,
                    });
                    return Resolution {
                        result: TranslationResult::Translated { text },
                        attempts,
                    };
                }
                ProviderOutcome::Unavailable(reason) => {
                    warn!(stage = %tier.stage, "{} failed: {}", provider, reason);
                    if tier.stage.opens_relay() && reason.is_cross_origin() {
                        saw_cross_origin = true;
                    }
                    attempts.push(TierAttempt {
                        stage: tier.stage,
                        provider,
                        status: AttemptStatus::Failed(reason),
                    });
                }
            }
        }

        error!(
            "{} for \"{}\" ({} → {})",
            TranslationError::AllProvidersExhausted,
            request.text,
            request.source,
            request.target
        );
        Resolution {
            result: TranslationResult::NotFound,
            attempts,
        }
    }

    /// Translate a single word; `None` when no tier could
    pub async fn translate_word(
        &self,
        word: &str,
        source: &Language,
        target: &Language,
    ) -> Option<String> {
        let request = TranslationRequest::new(word, source.clone(), target.clone());
        self.resolve(&request).await.into_option()
    }
}

impl fmt::Debug for TranslationResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationResolver")
            .field("tiers", &self.tiers)
            .finish()
    }
}
