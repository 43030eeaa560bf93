//! Rationale generation port.
//!
//! Per-candidate rationales come from an external text generator when one
//! is configured, with a deterministic template as the always-available
//! fallback. Generator failure or timeout can never fail an allocation:
//! [`RationaleGenerator::generate`] is infallible and degrades locally.

use std::time::Duration;

use castmatch_core::{Brief, Influencer};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_TIMEOUT_MS: u64 = 4_000;

#[derive(Debug, Error)]
pub enum RationaleError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generator API error: {0}")]
    Api(String),

    #[error("generator returned no content")]
    EmptyCompletion,

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
}

/// Env-driven configuration for the external generator.
#[derive(Debug, Clone)]
pub struct RationaleConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl RationaleConfig {
    /// Build config from environment variables. Returns `None` when the
    /// generator is not configured; the engine then runs template-only.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_url = std::env::var("CASTMATCH_RATIONALE_URL").ok()?;
        let api_key = std::env::var("CASTMATCH_RATIONALE_API_KEY").ok()?;
        let model = std::env::var("CASTMATCH_RATIONALE_MODEL")
            .unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let timeout_ms = std::env::var("CASTMATCH_RATIONALE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        Some(Self {
            api_url,
            api_key,
            model,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

/// The injected rationale capability: an LLM-backed best-effort generator,
/// or the deterministic template alone.
#[derive(Debug)]
pub enum RationaleGenerator {
    Llm(LlmRationaleClient),
    Template,
}

impl RationaleGenerator {
    /// Build from the environment: LLM-backed when configured, template
    /// otherwise.
    #[must_use]
    pub fn from_env() -> Self {
        match RationaleConfig::from_env() {
            Some(config) => match LlmRationaleClient::new(config) {
                Ok(client) => RationaleGenerator::Llm(client),
                Err(e) => {
                    tracing::warn!(error = %e, "rationale client unavailable, using template");
                    RationaleGenerator::Template
                }
            },
            None => RationaleGenerator::Template,
        }
    }

    /// Produce a rationale for one selected creator. Infallible: any
    /// generator failure or timeout falls back to the template.
    pub async fn generate(&self, inf: &Influencer, brief: &Brief) -> String {
        match self {
            RationaleGenerator::Template => template_rationale(inf, brief),
            RationaleGenerator::Llm(client) => match client.generate(inf, brief).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(
                        influencer = %inf.id,
                        error = %e,
                        "rationale generation failed, falling back to template"
                    );
                    template_rationale(inf, brief)
                }
            },
        }
    }
}

/// Deterministic fallback rationale: name, audience size, engagement, and
/// the creator's leading categories.
#[must_use]
pub fn template_rationale(inf: &Influencer, brief: &Brief) -> String {
    let categories = if inf.content_categories.is_empty() {
        "general content".to_string()
    } else {
        inf.content_categories
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "{} brings {} followers on {} at {:.1}% engagement, with strengths in {categories}: a strong fit for {}'s campaign.",
        inf.handle, inf.followers, inf.platform, inf.engagement_rate, brief.client_name
    )
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Thin client for an OpenAI-compatible chat-completions endpoint.
///
/// Use [`LlmRationaleClient::new`] in production or
/// [`LlmRationaleClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug)]
pub struct LlmRationaleClient {
    client: reqwest::Client,
    config: RationaleConfig,
}

impl LlmRationaleClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RationaleError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: RationaleConfig) -> Result<Self, RationaleError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("castmatch/0.1 (campaign-proposals)")
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client against a custom base URL (for wiremock tests).
    ///
    /// # Errors
    ///
    /// Same conditions as [`LlmRationaleClient::new`].
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, RationaleError> {
        Self::new(RationaleConfig {
            api_url: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            timeout,
        })
    }

    /// One best-effort completion for one creator.
    ///
    /// # Errors
    ///
    /// - [`RationaleError::Timeout`] when the wall-clock budget expires.
    /// - [`RationaleError::Http`] on network failure or non-2xx status.
    /// - [`RationaleError::EmptyCompletion`] when the response carries no
    ///   usable text.
    pub async fn generate(&self, inf: &Influencer, brief: &Brief) -> Result<String, RationaleError> {
        let prompt = format!(
            "In two sentences, explain why creator {} ({} followers, {:.1}% engagement, \
             categories: {}) suits a campaign for {} with goals: {}.",
            inf.handle,
            inf.followers,
            inf.engagement_rate,
            inf.content_categories.join(", "),
            brief.client_name,
            brief.campaign_goals.join("; "),
        );

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": 120,
        });

        let request = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send();

        let response = tokio::time::timeout(self.config.timeout, request)
            .await
            .map_err(|_| RationaleError::Timeout(self.config.timeout))??;

        if !response.status().is_success() {
            return Err(RationaleError::Api(format!(
                "generator returned HTTP {}",
                response.status()
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(RationaleError::EmptyCompletion)?;
        Ok(content)
    }
}
