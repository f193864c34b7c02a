use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use dutch_conquerors::{
    BatchTranslator, Language, ResolverConfig, TranslationResolver, WordPair, WordSource,
    WordSupply,
};

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_UPSTREAM: &str = "https://deeplx.vercel.app/translate";
/// Wrong-answer options served with each game round
const DISTRACTOR_COUNT: usize = 4;

#[derive(Serialize, Deserialize)]
pub struct WordPairsRequest {
    pub words: Vec<String>,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

fn default_source_lang() -> String {
    "EN".to_string()
}

fn default_target_lang() -> String {
    "NL".to_string()
}

#[derive(Serialize, Deserialize)]
pub struct WordPairsResponse {
    pub pairs: Vec<WordPair>,
}

/// A game round: the pair to play plus English words that are not its answer
#[derive(Serialize, Deserialize)]
pub struct NextWordResponse {
    #[serde(flatten)]
    pub pair: WordPair,
    pub distractors: Vec<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: String) -> ApiError {
    (status, Json(ErrorResponse { error }))
}

#[derive(Clone)]
pub struct AppState {
    /// DeepLX endpoint that `/api/translate` forwards to
    pub upstream_url: Arc<String>,
    pub client: reqwest::Client,
    pub batch: BatchTranslator,
    pub supply: Arc<Mutex<WordSupply>>,
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/translate", post(proxy_translate))
        .route("/api/word-pairs", post(word_pairs))
        .route("/api/words/next", get(next_word))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("DUTCH_CONQUERORS_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let upstream_url = std::env::var("DUTCH_CONQUERORS_UPSTREAM_URL")
        .unwrap_or_else(|_| DEFAULT_UPSTREAM.to_string());

    // The service's own resolver talks to the upstream directly, not to itself
    let mut config = ResolverConfig::from_env()
        .map_err(|e| format!("Invalid resolver configuration: {}", e))?;
    config.primary_endpoint = upstream_url.clone();

    let client = config.http_client()?;
    let resolver = Arc::new(TranslationResolver::from_config(&config)?);
    let batch = BatchTranslator::new(resolver);
    let supply = WordSupply::new(batch.clone(), WordSource::bundled()?);

    let state = AppState {
        upstream_url: Arc::new(upstream_url),
        client,
        batch,
        supply: Arc::new(Mutex::new(supply)),
    };

    info!("⚓ Starting Dutch Conquerors translation proxy");
    info!("Forwarding /api/translate to {}", state.upstream_url);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("🚀 Server running at http://{}", bind);

    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Forward a DeepLX request body upstream and relay the answer unchanged
async fn proxy_translate(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let response = state
        .client
        .post(state.upstream_url.as_str())
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            warn!("Upstream request failed: {}", e);
            api_error(
                StatusCode::BAD_GATEWAY,
                format!("Translation upstream unreachable: {}", e),
            )
        })?;

    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let payload: serde_json::Value = response.json().await.map_err(|e| {
        api_error(
            StatusCode::BAD_GATEWAY,
            format!("Translation upstream returned invalid JSON: {}", e),
        )
    })?;

    Ok((status, Json(payload)))
}

async fn word_pairs(
    State(state): State<AppState>,
    Json(request): Json<WordPairsRequest>,
) -> Result<Json<WordPairsResponse>, ApiError> {
    let source = Language::new(&request.source_lang)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    let target = Language::new(&request.target_lang)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    info!(
        "Translating {} words ({} → {})",
        request.words.len(),
        source,
        target
    );

    let pairs = state
        .batch
        .translate_all(&request.words, &source, &target)
        .await;

    Ok(Json(WordPairsResponse { pairs }))
}

/// Hand out the next queued pair with its distractors
///
/// The supply lock is held across `next_pair`, including any network refill,
/// so concurrent callers are served one at a time.
async fn next_word(State(state): State<AppState>) -> Json<NextWordResponse> {
    let mut supply = state.supply.lock().await;
    let pair = supply.next_pair().await;
    let distractors = supply.source().distractors(&pair.english, DISTRACTOR_COUNT);
    Json(NextWordResponse { pair, distractors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use dutch_conquerors::translation::{MockProvider, Tier, TierGate, TierStage};
    use serde_json::json;
    use tower::ServiceExt;

    fn test_state(upstream_url: String, provider: MockProvider) -> AppState {
        let resolver = Arc::new(TranslationResolver::new(vec![Tier::new(
            TierStage::Primary,
            TierGate::Always,
            Arc::new(provider),
        )]));
        let batch = BatchTranslator::new(resolver);
        let source = WordSource::from_words(
            ["ship", "anchor", "sail", "harbor", "captain", "island"]
                .iter()
                .map(|w| w.to_string()),
        );
        AppState {
            upstream_url: Arc::new(upstream_url),
            client: reqwest::Client::new(),
            supply: Arc::new(Mutex::new(WordSupply::new(batch.clone(), source))),
            batch,
        }
    }

    async fn spawn_upstream(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn post_json(router: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_word_pairs_filters_results() {
        let state = test_state(
            "http://unused".to_string(),
            MockProvider::with_mappings([("ship", "schip"), ("taxi", "taxi")]),
        );
        let (status, body) = post_json(
            app(state),
            "/api/word-pairs",
            json!({ "words": ["ship", "taxi", "etalage"] }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "pairs": [{ "english": "ship", "dutch": "schip" }] }));
    }

    #[tokio::test]
    async fn test_word_pairs_rejects_bad_language() {
        let state = test_state("http://unused".to_string(), MockProvider::failing());
        let (status, body) = post_json(
            app(state),
            "/api/word-pairs",
            json!({ "words": ["ship"], "target_lang": "n1" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid language"));
    }

    #[tokio::test]
    async fn test_proxy_forwards_body_and_status() {
        let upstream = Router::new().route(
            "/translate",
            post(|Json(body): Json<serde_json::Value>| async move {
                Json(json!({ "code": 200, "data": format!("{}!", body["text"].as_str().unwrap_or("")) }))
            }),
        );
        let base = spawn_upstream(upstream).await;
        let state = test_state(format!("{}/translate", base), MockProvider::failing());

        let (status, body) = post_json(
            app(state),
            "/api/translate",
            json!({ "text": "ship", "source_lang": "EN", "target_lang": "NL" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "code": 200, "data": "ship!" }));
    }

    #[tokio::test]
    async fn test_proxy_unreachable_upstream_is_bad_gateway() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let state = test_state(format!("http://{}/translate", addr), MockProvider::failing());

        let (status, body) = post_json(app(state), "/api/translate", json!({ "text": "ship" })).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("unreachable"));
    }

    #[tokio::test]
    async fn test_next_word_serves_supply() {
        let state = test_state(
            "http://unused".to_string(),
            MockProvider::with_mappings([("ship", "schip")]),
        );
        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/words/next")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let round: NextWordResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(round.pair.english, "ship");
        assert_eq!(round.pair.dutch, "schip");
        assert_eq!(round.distractors.len(), DISTRACTOR_COUNT);
        assert!(!round.distractors.iter().any(|w| w == "ship"));
    }
}
