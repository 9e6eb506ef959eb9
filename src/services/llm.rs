//! Language-model service for subjective assessments
//!
//! Provides integration with Claude Haiku behind a narrow capability
//! interface: given a prompt and a JSON schema, return a conforming
//! object or an error. Callers must branch on the error case and supply
//! their documented fallback value; this service never panics the
//! pipeline on provider failure.

use crate::config::LlmConfig;
use crate::error::{EthosError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Structured-generation capability
///
/// Implementations return an object conforming to `schema` or an error.
/// The engine treats every error identically (fallback value), so
/// implementations are free to map provider-specific failures onto
/// `EthosError::LlmApi`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a JSON object conforming to `schema` from `prompt`
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Value>;
}

/// LLM client against the Anthropic messages API
pub struct AnthropicClient {
    config: LlmConfig,
    client: reqwest::Client,
}

/// Anthropic API message format
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: usize,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Anthropic API response format
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    text: String,
}

impl AnthropicClient {
    /// Create a new client with custom config
    pub fn new(config: LlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(EthosError::Config("ANTHROPIC_API_KEY not set".to_string()));
        }

        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Create with default config
    pub fn with_default() -> Result<Self> {
        Self::new(LlmConfig::default())
    }

    /// Make an API call and return the raw completion text
    async fn call_api(&self, prompt: &str) -> Result<String> {
        debug!("Calling Anthropic API");

        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(EthosError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EthosError::LlmApi(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| EthosError::LlmApi(format!("Failed to parse response: {}", e)))?;

        api_response
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| EthosError::LlmApi("Empty response from API".to_string()))
    }
}

#[async_trait]
impl LanguageModel for AnthropicClient {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Value> {
        let full_prompt = format!(
            "{prompt}\n\nRespond with ONLY a JSON object conforming to this schema, no prose:\n{}",
            serde_json::to_string_pretty(schema)?
        );

        let raw = self.call_api(&full_prompt).await?;
        let object = parse_json_payload(&raw)?;
        validate_against_schema(&object, schema)?;
        Ok(object)
    }
}

/// Extract a JSON object from completion text, tolerating code fences
fn parse_json_payload(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|s| s.trim_end_matches("```").trim())
        .unwrap_or(trimmed);

    serde_json::from_str(stripped)
        .map_err(|e| EthosError::LlmApi(format!("Model returned non-JSON output: {}", e)))
}

/// Shallow schema validation: the result must be an object carrying every
/// property the schema marks required
fn validate_against_schema(object: &Value, schema: &Value) -> Result<()> {
    let map = object
        .as_object()
        .ok_or_else(|| EthosError::LlmApi("Model output is not a JSON object".to_string()))?;

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if !map.contains_key(field) {
                return Err(EthosError::LlmApi(format!(
                    "Model output missing required field: {}",
                    field
                )));
            }
        }
    }

    Ok(())
}
