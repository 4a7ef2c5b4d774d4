//! Engine configuration.
//!
//! Provides configuration options for plan generation: model endpoint and
//! credentials, the overall wall-clock budget for one plan, the per-call
//! timeout, sampling parameters, and selection counts.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Credentials are required unless the caller explicitly opts into
    /// offline generation. Silently downgrading would hide misconfiguration.
    #[error("Missing API key: set PREP_API_KEY or construct the engine with PrepEngine::offline")]
    MissingApiKey,

    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration for the preparation-plan engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // Model settings
    /// Base URL of the OpenAI-compatible chat-completions API.
    pub api_base: String,
    /// API key for authentication. Required unless the engine is offline.
    pub api_key: Option<String>,
    /// Model identifier to use for generation.
    pub model: String,
    /// Sampling temperature for generation.
    pub temperature: f64,
    /// Maximum tokens per model response.
    pub max_tokens: u32,

    // Timing settings
    /// Overall wall-clock budget for building one plan.
    pub plan_budget: Duration,
    /// Timeout applied to each individual model call. The effective window
    /// is the smaller of this and the remaining plan budget.
    pub call_timeout: Duration,

    // Selection settings
    /// Number of primary coding challenges to select.
    pub primary_count: usize,
    /// Number of additional suggested challenges to select.
    pub suggested_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 3000,
            plan_budget: Duration::from_secs(90),
            call_timeout: Duration::from_secs(30),
            primary_count: 5,
            suggested_count: 3,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PREP_API_BASE`: Chat-completions base URL (default: OpenAI)
    /// - `PREP_API_KEY`: API key (optional here; required to go online)
    /// - `PREP_MODEL`: Model identifier (default: gpt-4o-mini)
    /// - `PREP_TEMPERATURE`: Sampling temperature (default: 0.7)
    /// - `PREP_MAX_TOKENS`: Max tokens per response (default: 3000)
    /// - `PREP_PLAN_BUDGET_SECS`: Whole-plan budget in seconds (default: 90)
    /// - `PREP_CALL_TIMEOUT_SECS`: Per-call timeout in seconds (default: 30)
    /// - `PREP_PRIMARY_COUNT`: Primary challenge count (default: 5)
    /// - `PREP_SUGGESTED_COUNT`: Suggested challenge count (default: 3)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable has an invalid value or the
    /// resulting configuration fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("PREP_API_BASE") {
            config.api_base = val;
        }
        if let Ok(val) = std::env::var("PREP_API_KEY") {
            if !val.is_empty() {
                config.api_key = Some(val);
            }
        }
        if let Ok(val) = std::env::var("PREP_MODEL") {
            config.model = val;
        }
        if let Ok(val) = std::env::var("PREP_TEMPERATURE") {
            config.temperature = parse_env_value(&val, "PREP_TEMPERATURE")?;
        }
        if let Ok(val) = std::env::var("PREP_MAX_TOKENS") {
            config.max_tokens = parse_env_value(&val, "PREP_MAX_TOKENS")?;
        }
        if let Ok(val) = std::env::var("PREP_PLAN_BUDGET_SECS") {
            let secs: u64 = parse_env_value(&val, "PREP_PLAN_BUDGET_SECS")?;
            config.plan_budget = Duration::from_secs(secs);
        }
        if let Ok(val) = std::env::var("PREP_CALL_TIMEOUT_SECS") {
            let secs: u64 = parse_env_value(&val, "PREP_CALL_TIMEOUT_SECS")?;
            config.call_timeout = Duration::from_secs(secs);
        }
        if let Ok(val) = std::env::var("PREP_PRIMARY_COUNT") {
            config.primary_count = parse_env_value(&val, "PREP_PRIMARY_COUNT")?;
        }
        if let Ok(val) = std::env::var("PREP_SUGGESTED_COUNT") {
            config.suggested_count = parse_env_value(&val, "PREP_SUGGESTED_COUNT")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "api_base cannot be empty".to_string(),
            ));
        }
        if self.model.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "model cannot be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        if self.call_timeout.as_millis() == 0 {
            return Err(ConfigError::ValidationFailed(
                "call_timeout must be greater than 0".to_string(),
            ));
        }
        if self.primary_count == 0 {
            return Err(ConfigError::ValidationFailed(
                "primary_count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder method to set the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Builder method to set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Builder method to set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder method to set the temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Builder method to set the max tokens per response.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Builder method to set the whole-plan budget.
    pub fn with_plan_budget(mut self, budget: Duration) -> Self {
        self.plan_budget = budget;
        self
    }

    /// Builder method to set the per-call timeout.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Builder method to set the primary challenge count.
    pub fn with_primary_count(mut self, count: usize) -> Self {
        self.primary_count = count;
        self
    }

    /// Builder method to set the suggested challenge count.
    pub fn with_suggested_count(mut self, count: usize) -> Self {
        self.suggested_count = count;
        self
    }
}

/// Parse an environment variable value into a type.
fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("could not parse '{}'", value),
    })
}
