//! DeepLX provider: the primary tier
//!
//! Requests go to a local `/api/translate` proxy (see the `dutch-conquerors-web`
//! crate) which forwards them to the upstream DeepLX host. The endpoint replies
//! with `{ "code": 200, "data": "<translation>" }` on success; any other code or
//! a missing `data` field counts as a failure of this tier.

use crate::translation::error::{TrResult, TranslationError};
use crate::translation::language::TranslationRequest;
use crate::translation::provider::{ProviderOutcome, TranslationProvider};
use async_trait::async_trait;
use serde_json::json;

/// DeepLX provider reached through the translate proxy
#[derive(Clone)]
pub struct DeepLProvider {
    /// Full URL of the proxy endpoint
    endpoint: String,
    /// Shared HTTP client
    client: reqwest::Client,
}

impl DeepLProvider {
    /// Status code the endpoint reports inside the body on success
    const SUCCESS_CODE: i64 = 200;

    pub fn new(endpoint: String, client: reqwest::Client) -> TrResult<Self> {
        if endpoint.trim().is_empty() {
            return Err(TranslationError::Config(
                "DeepLX endpoint cannot be empty".to_string(),
            ));
        }

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn translate_once(&self, request: &TranslationRequest) -> TrResult<String> {
        let body = json!({
            "text": request.text,
            "source_lang": request.source.as_upper(),
            "target_lang": request.target.as_upper(),
        });

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(TranslationError::Protocol(format!(
                "DeepLX returned HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response.json().await?;
        parse_deepl_response(&json)
    }
}

/// Extract the translation from a `{code, data}` envelope
pub fn parse_deepl_response(json: &serde_json::Value) -> TrResult<String> {
    let code = json["code"].as_i64();
    match (code, json["data"].as_str()) {
        (Some(DeepLProvider::SUCCESS_CODE), Some(data)) if !data.trim().is_empty() => {
            Ok(data.to_string())
        }
        (Some(DeepLProvider::SUCCESS_CODE), _) => Err(TranslationError::Protocol(
            "DeepLX response is missing 'data'".to_string(),
        )),
        (Some(other), _) => Err(TranslationError::Protocol(format!(
            "DeepLX reported code {}",
            other
        ))),
        (None, _) => Err(TranslationError::Protocol(
            "DeepLX returned invalid response format".to_string(),
        )),
    }
}

impl std::fmt::Debug for DeepLProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepLProvider")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl TranslationProvider for DeepLProvider {
    async fn attempt(&self, request: &TranslationRequest) -> ProviderOutcome {
        ProviderOutcome::from_result(self.translate_once(request).await)
    }

    fn provider_name(&self) -> &str {
        "DeepLX"
    }
}
