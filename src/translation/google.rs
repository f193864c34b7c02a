//! Google Translate provider: the secondary tiers
//!
//! Uses the public `translate_a/single` endpoint. The same engine is wired into
//! the chain twice, once per `ClientMode`: the default client identifier is
//! sometimes rejected (HTTP 403) and the `gtx` identifier routes around that.
//!
//! The response is a nested array; sentence segments live at `data[0][i][0]`:
//!
//! ```text
//! [[["schip","ship",null,null,10]],null,"en",...]
//! ```
//!
//! This module also owns the cross-origin predicates. Whether a failure counts
//! as an origin restriction decides if the relay tier runs, so the heuristic is
//! kept in one place where it can be swapped per platform.

use crate::translation::error::{TrResult, TranslationError};
use crate::translation::language::TranslationRequest;
use crate::translation::provider::{ProviderOutcome, TranslationProvider};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{StatusCode, Url};
use std::sync::LazyLock;

/// Public endpoint used by both client modes and by the relays
pub const GOOGLE_SINGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

static CROSS_ORIGIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcors\b|networkerror|cross-origin").expect("valid cross-origin pattern")
});

/// Client identifier declared to the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMode {
    /// Default identifier (`t`)
    Default,
    /// Alternate identifier (`gtx`), used when the default one is rejected
    Gtx,
}

impl ClientMode {
    pub fn client_id(&self) -> &'static str {
        match self {
            ClientMode::Default => "t",
            ClientMode::Gtx => "gtx",
        }
    }
}

/// Build a `translate_a/single` URL for the given client identifier
pub fn single_url(base: &str, client_id: &str, request: &TranslationRequest) -> TrResult<Url> {
    Url::parse_with_params(
        base,
        &[
            ("client", client_id),
            ("sl", request.source.as_lower()),
            ("tl", request.target.as_lower()),
            ("dt", "t"),
            ("q", request.text.as_str()),
        ],
    )
    .map_err(|e| TranslationError::Config(format!("Invalid Google endpoint '{}': {}", base, e)))
}

/// Join the sentence segments of a `translate_a/single` response
///
/// Returns `None` when the payload does not have the nested-array shape or
/// carries no text.
pub fn parse_single_response(data: &serde_json::Value) -> Option<String> {
    let segments = data.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|s| s.as_str()))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Whether an error message describes an origin restriction
///
/// Browser runtimes only expose this as text ("CORS", "NetworkError"), so this
/// is a string heuristic.
pub fn looks_like_cross_origin(message: &str) -> bool {
    CROSS_ORIGIN_PATTERN.is_match(message)
}

/// Whether a transport error should be treated as an origin restriction
///
/// Native clients have no CORS; an origin that refuses the connection is the
/// closest equivalent of a browser `NetworkError`. The request URL is left out
/// of the matched text, since it carries the query word and the endpoint host.
pub fn is_cross_origin_failure(err: &reqwest::Error) -> bool {
    if err.is_connect() {
        return true;
    }

    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    if let Some(url) = err.url() {
        message = message.replace(url.as_str(), "");
    }
    looks_like_cross_origin(&message)
}

/// Google Translate provider for one client mode
#[derive(Clone)]
pub struct GoogleProvider {
    mode: ClientMode,
    base_url: String,
    client: reqwest::Client,
    name: String,
}

impl GoogleProvider {
    pub fn new(mode: ClientMode, base_url: String, client: reqwest::Client) -> TrResult<Self> {
        if base_url.trim().is_empty() {
            return Err(TranslationError::Config(
                "Google endpoint cannot be empty".to_string(),
            ));
        }

        let name = match mode {
            ClientMode::Default => "Google Translate (default)".to_string(),
            ClientMode::Gtx => "Google Translate (gtx)".to_string(),
        };

        Ok(Self {
            mode,
            base_url,
            client,
            name,
        })
    }

    pub fn mode(&self) -> ClientMode {
        self.mode
    }

    async fn translate_once(&self, request: &TranslationRequest) -> TrResult<String> {
        let url = single_url(&self.base_url, self.mode.client_id(), request)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(TranslationError::Protocol(format!(
                "Client '{}' rejected (HTTP 403)",
                self.mode.client_id()
            )));
        }
        if !status.is_success() {
            return Err(TranslationError::Protocol(format!(
                "Google Translate returned HTTP {}",
                status
            )));
        }

        let data: serde_json::Value = response.json().await?;
        parse_single_response(&data).ok_or_else(|| {
            TranslationError::Protocol("Google Translate returned invalid response".to_string())
        })
    }
}

impl std::fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("mode", &self.mode)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl TranslationProvider for GoogleProvider {
    async fn attempt(&self, request: &TranslationRequest) -> ProviderOutcome {
        ProviderOutcome::from_result(self.translate_once(request).await)
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}
