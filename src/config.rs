//! Configuration for the Ethos profiling engine
//!
//! Defines tunables for the analysis pipeline (fetch windows, thresholds,
//! batch pacing) and for the LLM client used by the subjective assessment
//! stage.

use crate::error::{EthosError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Tunables for the analysis pipeline and batch scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Runs observing fewer messages than this are complete no-ops
    pub min_message_threshold: usize,

    /// Maximum number of the user's own messages to fetch per run
    pub max_messages_to_fetch: usize,

    /// How many of the user's most active channels to sample for context
    pub context_channels: usize,

    /// Maximum channel-context messages fetched per channel
    pub channel_context_limit: usize,

    /// How many conversation lines the subjective prompt embeds
    pub recent_lines: usize,

    /// Fixed delay between users in a batch run (in seconds)
    #[serde(with = "serde_duration")]
    pub pacing_delay: Duration,

    /// Bound on a single LLM call before it is treated as failed (in seconds)
    #[serde(with = "serde_duration")]
    pub llm_timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_message_threshold: 10,
            max_messages_to_fetch: 200,
            context_channels: 3,
            channel_context_limit: 30,
            recent_lines: 10,
            pacing_delay: Duration::from_secs(2),
            llm_timeout: Duration::from_secs(30),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.min_message_threshold == 0 {
            return Err(EthosError::Config(
                "min_message_threshold must be at least 1".to_string(),
            ));
        }

        if self.max_messages_to_fetch == 0 || self.max_messages_to_fetch > 10_000 {
            return Err(EthosError::Config(
                "max_messages_to_fetch must be between 1 and 10000".to_string(),
            ));
        }

        if self.max_messages_to_fetch < self.min_message_threshold {
            return Err(EthosError::Config(
                "max_messages_to_fetch must not be below min_message_threshold".to_string(),
            ));
        }

        // A pacing delay above a minute starves the batch loop
        if self.pacing_delay > Duration::from_secs(60) {
            return Err(EthosError::Config(
                "pacing_delay must be at most 60 seconds".to_string(),
            ));
        }

        if self.llm_timeout < Duration::from_secs(1) || self.llm_timeout > Duration::from_secs(300)
        {
            return Err(EthosError::Config(
                "llm_timeout must be between 1 and 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration for the LLM client
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Anthropic API key
    pub api_key: String,

    /// Model to use
    pub model: String,

    /// Max tokens for responses
    pub max_tokens: usize,

    /// Temperature for sampling
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            model: "claude-3-5-haiku-20241022".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

// Custom serde module for Duration (serialize/deserialize as seconds)
mod serde_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_message_threshold, 10);
    }

    #[test]
    fn test_validate_zero_threshold() {
        let config = AnalysisConfig {
            min_message_threshold: 0,
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("min_message_threshold"));
    }

    #[test]
    fn test_validate_fetch_below_threshold() {
        let config = AnalysisConfig {
            min_message_threshold: 50,
            max_messages_to_fetch: 20,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_pacing_delay_too_long() {
        let config = AnalysisConfig {
            pacing_delay: Duration::from_secs(120),
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("pacing_delay"));
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
            min_message_threshold = 25
            max_messages_to_fetch = 500
            context_channels = 2
            channel_context_limit = 20
            recent_lines = 8
            pacing_delay = 5
            llm_timeout = 45
        "#;

        let config = AnalysisConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.min_message_threshold, 25);
        assert_eq!(config.pacing_delay, Duration::from_secs(5));
        assert_eq!(config.llm_timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = AnalysisConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized = AnalysisConfig::from_toml(&toml_str).unwrap();
        assert_eq!(
            config.min_message_threshold,
            deserialized.min_message_threshold
        );
        assert_eq!(config.pacing_delay, deserialized.pacing_delay);
    }
}
