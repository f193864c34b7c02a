//! CORS-relay tier
//!
//! When the secondary engine cannot be reached directly, the same
//! `translate_a/single?client=gtx` request is re-issued through public relays,
//! one after another, until one of them yields a parseable payload.
//!
//! Relays wrap the upstream response differently, so each relay gets its own
//! `RelayAdapter` chosen when the chain is configured:
//!
//! - `AllOriginsRelay` returns `{"contents": "<upstream body as a string>"}`,
//!   which needs a second JSON parse;
//! - `CorsProxyIoRelay` returns the upstream body unchanged.

use crate::translation::error::{TrResult, TranslationError};
use crate::translation::google::{ClientMode, single_url};
use crate::translation::language::TranslationRequest;
use crate::translation::provider::{ProviderOutcome, TranslationProvider};
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::sync::Arc;
use tracing::{debug, warn};

/// Characters left alone by `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// One public relay and the shape of its responses
pub trait RelayAdapter: Send + Sync {
    /// Name used in diagnostic traces
    fn name(&self) -> &str;

    /// URL prefix; the percent-encoded target URL is appended to it
    fn prefix(&self) -> &str;

    /// Extract the translated text from a raw relay response body
    fn parse(&self, raw: &str) -> Option<String>;

    fn relay_url(&self, target: &str) -> String {
        format!("{}{}", self.prefix(), utf8_percent_encode(target, URI_COMPONENT))
    }
}

/// `data[0][0][0]` of a `translate_a/single` payload
fn first_segment(data: &serde_json::Value) -> Option<String> {
    data.get(0)?
        .get(0)?
        .get(0)?
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// api.allorigins.win: JSON envelope with the body in `contents`
#[derive(Debug, Clone)]
pub struct AllOriginsRelay {
    prefix: String,
}

impl AllOriginsRelay {
    pub const DEFAULT_PREFIX: &'static str = "https://api.allorigins.win/get?url=";

    pub fn new() -> Self {
        Self::with_prefix(Self::DEFAULT_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for AllOriginsRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayAdapter for AllOriginsRelay {
    fn name(&self) -> &str {
        "allorigins"
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn parse(&self, raw: &str) -> Option<String> {
        let envelope: serde_json::Value = serde_json::from_str(raw).ok()?;
        let contents = envelope.get("contents")?.as_str()?;
        let data: serde_json::Value = serde_json::from_str(contents).ok()?;
        first_segment(&data)
    }
}

/// corsproxy.io: upstream body passed through unchanged
#[derive(Debug, Clone)]
pub struct CorsProxyIoRelay {
    prefix: String,
}

impl CorsProxyIoRelay {
    pub const DEFAULT_PREFIX: &'static str = "https://corsproxy.io/?";

    pub fn new() -> Self {
        Self::with_prefix(Self::DEFAULT_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for CorsProxyIoRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayAdapter for CorsProxyIoRelay {
    fn name(&self) -> &str {
        "corsproxy.io"
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn parse(&self, raw: &str) -> Option<String> {
        let data: serde_json::Value = serde_json::from_str(raw).ok()?;
        first_segment(&data)
    }
}

/// The default relay sequence: allorigins first, then corsproxy.io
pub fn default_relays() -> Vec<Arc<dyn RelayAdapter>> {
    vec![
        Arc::new(AllOriginsRelay::new()),
        Arc::new(CorsProxyIoRelay::new()),
    ]
}

/// Google Translate re-issued through CORS relays
#[derive(Clone)]
pub struct RelayProvider {
    relays: Vec<Arc<dyn RelayAdapter>>,
    /// Google endpoint the relays are asked to fetch
    target_base: String,
    client: reqwest::Client,
}

impl RelayProvider {
    pub fn new(
        relays: Vec<Arc<dyn RelayAdapter>>,
        target_base: String,
        client: reqwest::Client,
    ) -> TrResult<Self> {
        if relays.is_empty() {
            return Err(TranslationError::Config(
                "At least one CORS relay is required".to_string(),
            ));
        }

        Ok(Self {
            relays,
            target_base,
            client,
        })
    }

    pub fn relay_names(&self) -> Vec<&str> {
        self.relays.iter().map(|r| r.name()).collect()
    }

    async fn fetch_through(&self, relay: &dyn RelayAdapter, target: &str) -> TrResult<String> {
        let response = self.client.get(relay.relay_url(target)).send().await?;

        if !response.status().is_success() {
            return Err(TranslationError::Protocol(format!(
                "Relay returned HTTP {}",
                response.status()
            )));
        }

        let raw = response.text().await?;
        relay.parse(&raw).ok_or_else(|| {
            TranslationError::Protocol("Relay payload had no translation".to_string())
        })
    }

    async fn translate_once(&self, request: &TranslationRequest) -> TrResult<String> {
        let target = single_url(&self.target_base, ClientMode::Gtx.client_id(), request)?;

        for relay in &self.relays {
            match self.fetch_through(relay.as_ref(), target.as_str()).await {
                Ok(text) => {
                    debug!("CORS relay {} answered for \"{}\"", relay.name(), request.text);
                    return Ok(text);
                }
                Err(e) => warn!("CORS relay {} failed: {}", relay.name(), e),
            }
        }

        Err(TranslationError::Transport("All CORS relays failed".to_string()))
    }
}

impl std::fmt::Debug for RelayProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayProvider")
            .field("relays", &self.relay_names())
            .field("target_base", &self.target_base)
            .finish()
    }
}

#[async_trait]
impl TranslationProvider for RelayProvider {
    async fn attempt(&self, request: &TranslationRequest) -> ProviderOutcome {
        ProviderOutcome::from_result(self.translate_once(request).await)
    }

    fn provider_name(&self) -> &str {
        "Google Translate (CORS relay)"
    }
}
