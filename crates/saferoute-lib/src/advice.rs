//! Safety advice collaborator.
//!
//! Advice text is produced outside the routing engine. The engine only knows
//! the contract: origin label, destination label and average safety score in,
//! a summary and an ordered list of tips out. Providers may be slow or fail;
//! [`advise_or_fallback`] always yields advice so callers never have to treat
//! a provider failure as a routing failure.

use std::env;
use std::thread;
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{Error, Result};

const API_KEY_ENV: &str = "SAFEROUTE_ADVICE_API_KEY";
const ENDPOINT_ENV: &str = "SAFEROUTE_ADVICE_ENDPOINT";
const MODEL_ENV: &str = "SAFEROUTE_ADVICE_MODEL";
const TIMEOUT_ENV: &str = "SAFEROUTE_ADVICE_TIMEOUT_SECS";
const RETRIES_ENV: &str = "SAFEROUTE_ADVICE_RETRIES";

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_RETRIES: u32 = 2;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(250);
const MAX_BACKOFF: Duration = Duration::from_secs(4);

/// Advice returned when no provider is configured or the provider fails.
pub static FALLBACK_ADVICE: Lazy<Advice> = Lazy::new(|| Advice {
    summary: "Route calculated with caution.".to_string(),
    tips: vec![
        "Keep your belongings out of sight.".to_string(),
        "Walk along well-lit streets.".to_string(),
        "Avoid using your phone openly on empty corners.".to_string(),
    ],
});

/// Input of the advice contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceRequest {
    pub origin: String,
    pub destination: String,
    /// Average safety score of the route (1 is very safe, 10 very dangerous).
    pub safety_score: f64,
}

/// Output of the advice contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub summary: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Source of safety advice for a computed route.
pub trait AdviceProvider: Send + Sync {
    fn advise(&self, request: &AdviceRequest) -> Result<Advice>;
}

/// Provider that always answers with the same advice.
#[derive(Debug, Clone)]
pub struct StaticAdvice {
    advice: Advice,
}

impl StaticAdvice {
    pub fn new(advice: Advice) -> Self {
        Self { advice }
    }
}

impl Default for StaticAdvice {
    fn default() -> Self {
        Self::new(FALLBACK_ADVICE.clone())
    }
}

impl AdviceProvider for StaticAdvice {
    fn advise(&self, _request: &AdviceRequest) -> Result<Advice> {
        Ok(self.advice.clone())
    }
}

/// Ask `provider` for advice, substituting [`FALLBACK_ADVICE`] on any failure.
pub fn advise_or_fallback(provider: &dyn AdviceProvider, request: &AdviceRequest) -> Advice {
    match provider.advise(request) {
        Ok(advice) => advice,
        Err(err) => {
            warn!(error = %err, "advice provider failed; using fallback advice");
            FALLBACK_ADVICE.clone()
        }
    }
}

/// Connection settings for [`GenerativeAdviceClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_RETRIES,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl AdviceConfig {
    /// Read the configuration from `SAFEROUTE_ADVICE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Blank or
    /// unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            api_key: value(API_KEY_ENV),
            endpoint: value(ENDPOINT_ENV).unwrap_or(defaults.endpoint),
            model: value(MODEL_ENV).unwrap_or(defaults.model),
            timeout: value(TIMEOUT_ENV)
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_retries: value(RETRIES_ENV)
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.max_retries),
            backoff: defaults.backoff,
        }
    }
}

/// Choose a provider for the given configuration.
///
/// Without an API key, or when the HTTP client cannot be built, the static
/// fallback provider is returned.
pub fn provider_from_config(config: AdviceConfig) -> Box<dyn AdviceProvider> {
    if config.api_key.is_none() {
        warn!("advice API key missing; using static advice");
        return Box::new(StaticAdvice::default());
    }
    match GenerativeAdviceClient::new(config) {
        Ok(client) => Box::new(client),
        Err(err) => {
            warn!(error = %err, "failed to build advice client; using static advice");
            Box::new(StaticAdvice::default())
        }
    }
}

/// Blocking client for a Gemini-style `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GenerativeAdviceClient {
    client: Client,
    config: AdviceConfig,
}

impl GenerativeAdviceClient {
    pub fn new(config: AdviceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .build()
            .map_err(Error::Http)?;
        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn send_once(&self, request: &AdviceRequest) -> Result<Advice> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::AdviceUnavailable {
                message: "no API key configured".to_string(),
            })?;

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&generate_body(request))
            .send()?
            .error_for_status()?;

        parse_generate_response(response.json::<GenerateResponse>()?)
    }
}

impl AdviceProvider for GenerativeAdviceClient {
    fn advise(&self, request: &AdviceRequest) -> Result<Advice> {
        let mut attempt = 0u32;
        loop {
            match self.send_once(request) {
                Ok(advice) => return Ok(advice),
                Err(err) if attempt < self.config.max_retries && is_retryable(&err) => {
                    let delay = retry_delay(self.config.backoff, attempt);
                    debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "advice request failed; retrying"
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn user_agent() -> String {
    format!("saferoute-lib/{}", env!("CARGO_PKG_VERSION"))
}

fn is_retryable(err: &Error) -> bool {
    match err {
        Error::Http(http) if http.is_timeout() || http.is_connect() => true,
        Error::Http(http) => http.status().is_some_and(is_retryable_status),
        _ => false,
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// Exponential backoff: `base * 2^attempt`, capped.
fn retry_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_BACKOFF)
}

/// Prompt sent to the generative model.
pub fn build_prompt(request: &AdviceRequest) -> String {
    format!(
        "Act as an urban safety expert advising university students.\n\
         A student is going to walk from {} to {}.\n\
         The computed risk level of the route is {:.1} (1 is very safe, 10 is very dangerous).\n\
         Provide a short summary and 3 specific safety tips.\n\
         Answer strictly in JSON.",
        request.origin, request.destination, request.safety_score
    )
}

fn generate_body(request: &AdviceRequest) -> serde_json::Value {
    json!({
        "contents": [{ "parts": [{ "text": build_prompt(request) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "summary": { "type": "STRING" },
                    "tips": { "type": "ARRAY", "items": { "type": "STRING" } }
                }
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

fn parse_generate_response(response: GenerateResponse) -> Result<Advice> {
    let text = response
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .find_map(|part| part.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| Error::AdviceUnavailable {
            message: "response contained no text".to_string(),
        })?;
    Ok(serde_json::from_str::<Advice>(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    impl AdviceProvider for FailingProvider {
        fn advise(&self, _request: &AdviceRequest) -> Result<Advice> {
            Err(Error::AdviceUnavailable {
                message: "offline".to_string(),
            })
        }
    }

    fn request() -> AdviceRequest {
        AdviceRequest {
            origin: "Parque Caldas".to_string(),
            destination: "Hospital San José".to_string(),
            safety_score: 2.34,
        }
    }

    #[test]
    fn failing_provider_falls_back() {
        let advice = advise_or_fallback(&FailingProvider, &request());
        assert_eq!(advice, *FALLBACK_ADVICE);
        assert_eq!(advice.tips.len(), 3);
    }

    #[test]
    fn static_provider_returns_its_advice() {
        let custom = Advice {
            summary: "Stay alert".to_string(),
            tips: vec!["Walk in groups".to_string()],
        };
        let provider = StaticAdvice::new(custom.clone());
        assert_eq!(advise_or_fallback(&provider, &request()), custom);
    }

    #[test]
    fn prompt_mentions_endpoints_and_score() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("from Parque Caldas to Hospital San José"));
        assert!(prompt.contains("risk level of the route is 2.3 (1 is very safe"));
    }

    #[test]
    fn parses_candidate_text_as_advice() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "{\"summary\":\"Mostly safe\",\"tips\":[\"a\",\"b\"]}" }] }
            }]
        }"#;
        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        let advice = parse_generate_response(response).unwrap();
        assert_eq!(advice.summary, "Mostly safe");
        assert_eq!(advice.tips, vec!["a", "b"]);
    }

    #[test]
    fn empty_response_is_unavailable() {
        let response: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            parse_generate_response(response),
            Err(Error::AdviceUnavailable { .. })
        ));
    }

    #[test]
    fn config_reads_lookup_and_defaults() {
        let config = AdviceConfig::from_lookup(|key| match key {
            "SAFEROUTE_ADVICE_API_KEY" => Some("secret".to_string()),
            "SAFEROUTE_ADVICE_TIMEOUT_SECS" => Some("3".to_string()),
            "SAFEROUTE_ADVICE_RETRIES" => Some("not-a-number".to_string()),
            "SAFEROUTE_ADVICE_MODEL" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.max_retries, DEFAULT_RETRIES);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn missing_key_selects_static_provider() {
        let provider = provider_from_config(AdviceConfig::default());
        assert_eq!(provider.advise(&request()).unwrap(), *FALLBACK_ADVICE);
    }

    #[test]
    fn retry_delay_doubles_and_caps() {
        let base = Duration::from_millis(250);
        assert_eq!(retry_delay(base, 0), Duration::from_millis(250));
        assert_eq!(retry_delay(base, 1), Duration::from_millis(500));
        assert_eq!(retry_delay(base, 2), Duration::from_secs(1));
        assert_eq!(retry_delay(base, 10), MAX_BACKOFF);
    }

    #[test]
    fn client_url_joins_endpoint_and_model() {
        let client = GenerativeAdviceClient::new(AdviceConfig {
            endpoint: "http://localhost:9/v1beta/".to_string(),
            ..AdviceConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.url(),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
