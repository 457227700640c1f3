//! Health recommendation gateway
//!
//! This module wraps the external text-generation service (Gemini's
//! `generateContent` endpoint). The gateway never fails: a missing API key
//! yields a placeholder and any service fault or timeout yields a fixed
//! fallback message, so the dashboard always has something to show.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::RecommendationsConfig;
use crate::models::AqiLevel;
use crate::{AqiError, Result};

/// Returned when no API key is configured
pub const MISSING_KEY_MESSAGE: &str = "API Key not configured. Please set up your API key.";

/// Returned when the service call fails for any reason
pub const FALLBACK_MESSAGE: &str =
    "Could not fetch health recommendations at this time. Please try again later.";

/// Prompt asking for one explanation paragraph and three `- ` bullets
#[must_use]
pub fn build_prompt(aqi: u32, level: AqiLevel) -> String {
    format!(
        "The current Air Quality Index (AQI) is {aqi}, which is considered \"{level}\". \
Provide a concise, user-friendly explanation of what this means and three practical health \
recommendations for the general public. Format the response as a single paragraph of \
explanation followed by a bulleted list of recommendations using markdown. For example:
Explanation text here.
- Recommendation 1
- Recommendation 2
- Recommendation 3"
    )
}

/// Anything that can turn a prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Client for the Gemini `generateContent` REST endpoint
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &RecommendationsConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("aqi_predictor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AqiError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(name = "gemini_generate", skip_all)]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Requesting recommendations from {}", self.model);
        let request = gemini::GenerateContentRequest::from_prompt(prompt);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AqiError::api(format!(
                "Gemini returned {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let body: gemini::GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AqiError::api(format!("Malformed Gemini response: {e}")))?;

        let text = body.into_text()?;
        info!(
            "Generated {} characters in {:.3}s",
            text.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(text)
    }
}

/// Gemini wire types
mod gemini {
    use super::{AqiError, Deserialize, Result, Serialize};

    #[derive(Debug, Serialize)]
    pub struct GenerateContentRequest {
        pub contents: Vec<Content>,
    }

    impl GenerateContentRequest {
        pub fn from_prompt(prompt: &str) -> Self {
            Self {
                contents: vec![Content {
                    parts: vec![Part {
                        text: Some(prompt.to_string()),
                    }],
                }],
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Content {
        #[serde(default)]
        pub parts: Vec<Part>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Part {
        pub text: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Candidate {
        pub content: Option<Content>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GenerateContentResponse {
        #[serde(default)]
        pub candidates: Vec<Candidate>,
    }

    impl GenerateContentResponse {
        /// Concatenated text of the first candidate
        pub fn into_text(self) -> Result<String> {
            let content = self
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.content)
                .ok_or_else(|| AqiError::api("Gemini response contained no candidates"))?;

            let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
            if text.trim().is_empty() {
                return Err(AqiError::api("Gemini response contained no text"));
            }
            Ok(text)
        }
    }
}

/// Async boundary to the text-generation service
#[derive(Clone)]
pub struct RecommendationGateway {
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
}

impl RecommendationGateway {
    #[must_use]
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Build a gateway backed by Gemini, or an unconfigured one when no key is set
    pub fn from_config(config: &RecommendationsConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());
        let generator: Option<Arc<dyn TextGenerator>> = match &config.api_key {
            Some(key) => Some(Arc::new(GeminiClient::new(config, key.clone())?)),
            None => {
                debug!("No recommendations API key configured");
                None
            }
        };
        Ok(Self::new(generator, timeout))
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Fetch recommendation text for a reading. Never fails; see module docs.
    #[instrument(skip(self))]
    pub async fn get_recommendations(&self, aqi: u32, level: AqiLevel) -> String {
        let Some(generator) = &self.generator else {
            return MISSING_KEY_MESSAGE.to_string();
        };

        let prompt = build_prompt(aqi, level);
        match tokio::time::timeout(self.timeout, generator.generate(&prompt)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Error fetching health recommendations from the AI service: {}", e);
                FALLBACK_MESSAGE.to_string()
            }
            Err(_) => {
                warn!(
                    "Health recommendation request timed out after {:?}",
                    self.timeout
                );
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FixedGenerator {
        reply: Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedGenerator {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(AqiError::api("quota exceeded")),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(AqiError::api(e.to_string())),
            }
        }
    }

    struct HangingGenerator;

    #[async_trait]
    impl TextGenerator for HangingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            std::future::pending().await
        }
    }

    #[test]
    fn test_prompt_embeds_reading() {
        let prompt = build_prompt(162, AqiLevel::Unhealthy);
        assert!(prompt.contains("(AQI) is 162"));
        assert!(prompt.contains("\"Unhealthy\""));
        assert!(prompt.contains("- Recommendation 3"));
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_returns_placeholder() {
        let gateway = RecommendationGateway::new(None, Duration::from_secs(1));
        assert!(!gateway.is_configured());
        for level in AqiLevel::ALL {
            assert_eq!(
                gateway.get_recommendations(42, level).await,
                MISSING_KEY_MESSAGE
            );
        }
    }

    #[tokio::test]
    async fn test_success_returns_text_verbatim() {
        let text = "Air is poor.\n- Stay inside\n- Wear a mask\n- Use a purifier";
        let generator = Arc::new(FixedGenerator::ok(text));
        let shared: Arc<dyn TextGenerator> = generator.clone();
        let gateway = RecommendationGateway::new(Some(shared), Duration::from_secs(1));

        assert_eq!(
            gateway.get_recommendations(185, AqiLevel::Unhealthy).await,
            text
        );
        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("185"));
    }

    #[tokio::test]
    async fn test_fault_returns_fallback() {
        let gateway = RecommendationGateway::new(
            Some(Arc::new(FixedGenerator::failing())),
            Duration::from_secs(1),
        );
        assert_eq!(
            gateway.get_recommendations(88, AqiLevel::Moderate).await,
            FALLBACK_MESSAGE
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_service_times_out() {
        let gateway =
            RecommendationGateway::new(Some(Arc::new(HangingGenerator)), Duration::from_secs(5));
        assert_eq!(
            gateway.get_recommendations(310, AqiLevel::Hazardous).await,
            FALLBACK_MESSAGE
        );
    }

    #[test]
    fn test_from_config_without_key() {
        let gateway = RecommendationGateway::from_config(&RecommendationsConfig::default()).unwrap();
        assert!(!gateway.is_configured());
    }

    #[test]
    fn test_gemini_response_text_is_extracted() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}],"role":"model"}}]}"#;
        let response: gemini::GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().unwrap(), "Hello world");
    }

    #[test]
    fn test_gemini_response_shape_mismatch_is_an_error() {
        let response: gemini::GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(matches!(response.into_text(), Err(AqiError::Api { .. })));

        let response: gemini::GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(response.into_text().is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let request = gemini::GenerateContentRequest::from_prompt("hi");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }
}
