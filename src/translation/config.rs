//! Resolver configuration
//!
//! Defaults reproduce the game's production chain. Every field can be
//! overridden from the environment with `ResolverConfig::from_env`:
//!
//! | Variable                           | Default                                               |
//! |------------------------------------|-------------------------------------------------------|
//! | `DUTCH_CONQUERORS_PRIMARY_URL`     | `http://127.0.0.1:8080/api/translate`                 |
//! | `DUTCH_CONQUERORS_SECONDARY_URL`   | `https://translate.googleapis.com/translate_a/single` |
//! | `DUTCH_CONQUERORS_RELAYS`          | `allorigins,corsproxy.io`                             |
//! | `DUTCH_CONQUERORS_RELAY_TRIGGER`   | `cross-origin` (`any`, `never`)                       |
//! | `DUTCH_CONQUERORS_TIMEOUT_SECS`    | `30`                                                  |

use crate::translation::error::{TrResult, TranslationError};
use crate::translation::google::GOOGLE_SINGLE_ENDPOINT;
use crate::translation::relay::{AllOriginsRelay, CorsProxyIoRelay, RelayAdapter};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_PRIMARY_ENDPOINT: &str = "http://127.0.0.1:8080/api/translate";

/// When the CORS-relay tier is allowed to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayTrigger {
    /// Only after a secondary tier failed with an origin restriction
    #[default]
    CrossOriginOnly,
    /// After the secondary tiers failed for any reason
    AnyFailure,
    /// Never; the relay tier is left out of the chain
    Never,
}

impl FromStr for RelayTrigger {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cross-origin" | "cors" => Ok(RelayTrigger::CrossOriginOnly),
            "any" | "always" => Ok(RelayTrigger::AnyFailure),
            "never" | "off" => Ok(RelayTrigger::Never),
            other => Err(TranslationError::Config(format!(
                "Unknown relay trigger: {}",
                other
            ))),
        }
    }
}

/// Identity of a public CORS relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayKind {
    AllOrigins,
    CorsProxyIo,
}

impl RelayKind {
    pub fn adapter(&self) -> Arc<dyn RelayAdapter> {
        match self {
            RelayKind::AllOrigins => Arc::new(AllOriginsRelay::new()),
            RelayKind::CorsProxyIo => Arc::new(CorsProxyIoRelay::new()),
        }
    }
}

impl FromStr for RelayKind {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allorigins" | "allorigins.win" => Ok(RelayKind::AllOrigins),
            "corsproxy" | "corsproxy.io" => Ok(RelayKind::CorsProxyIo),
            other => Err(TranslationError::Config(format!("Unknown CORS relay: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// DeepLX proxy endpoint (tier 1)
    pub primary_endpoint: String,
    /// Google `translate_a/single` endpoint (tiers 2-4)
    pub secondary_endpoint: String,
    /// Relays tried in order by tier 4
    pub relays: Vec<RelayKind>,
    pub relay_trigger: RelayTrigger,
    /// Transport timeout for every HTTP tier
    pub timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            primary_endpoint: DEFAULT_PRIMARY_ENDPOINT.to_string(),
            secondary_endpoint: GOOGLE_SINGLE_ENDPOINT.to_string(),
            relays: vec![RelayKind::AllOrigins, RelayKind::CorsProxyIo],
            relay_trigger: RelayTrigger::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ResolverConfig {
    const PRIMARY_VAR: &'static str = "DUTCH_CONQUERORS_PRIMARY_URL";
    const SECONDARY_VAR: &'static str = "DUTCH_CONQUERORS_SECONDARY_URL";
    const RELAYS_VAR: &'static str = "DUTCH_CONQUERORS_RELAYS";
    const TRIGGER_VAR: &'static str = "DUTCH_CONQUERORS_RELAY_TRIGGER";
    const TIMEOUT_VAR: &'static str = "DUTCH_CONQUERORS_TIMEOUT_SECS";

    /// Defaults overridden by any `DUTCH_CONQUERORS_*` variables that are set
    pub fn from_env() -> TrResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TrResult<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(Self::PRIMARY_VAR) {
            config.primary_endpoint = url;
        }
        if let Some(url) = lookup(Self::SECONDARY_VAR) {
            config.secondary_endpoint = url;
        }
        if let Some(relays) = lookup(Self::RELAYS_VAR) {
            config.relays = relays
                .split(',')
                .filter(|r| !r.trim().is_empty())
                .map(RelayKind::from_str)
                .collect::<TrResult<Vec<_>>>()?;
        }
        if let Some(trigger) = lookup(Self::TRIGGER_VAR) {
            config.relay_trigger = trigger.parse()?;
        }
        if let Some(secs) = lookup(Self::TIMEOUT_VAR) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                TranslationError::Config(format!("{} must be a number: {}", Self::TIMEOUT_VAR, secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TrResult<()> {
        if self.primary_endpoint.trim().is_empty() {
            return Err(TranslationError::Config(
                "Primary endpoint cannot be empty".to_string(),
            ));
        }
        if self.secondary_endpoint.trim().is_empty() {
            return Err(TranslationError::Config(
                "Secondary endpoint cannot be empty".to_string(),
            ));
        }
        if self.relays.is_empty() && self.relay_trigger != RelayTrigger::Never {
            return Err(TranslationError::Config(
                "No CORS relays configured; set the relay trigger to 'never' to disable them"
                    .to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(TranslationError::Config("Timeout must be positive".to_string()));
        }
        Ok(())
    }

    pub fn relay_adapters(&self) -> Vec<Arc<dyn RelayAdapter>> {
        self.relays.iter().map(RelayKind::adapter).collect()
    }

    /// Shared HTTP client for every network tier
    pub fn http_client(&self) -> TrResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| TranslationError::Config(format!("Failed to create HTTP client: {}", e)))
    }
}
