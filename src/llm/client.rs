//! Chat-completions client.
//!
//! A thin reqwest-based client for OpenAI-compatible APIs, plus the
//! process-wide shared handle. The engine enforces its own per-call
//! timeouts; the client carries only a generous transport-level safety net.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{GenerationRequest, GenerationResponse, LlmProvider};
use crate::config::{ConfigError, EngineConfig};
use crate::error::LlmError;

/// Transport-level ceiling; effective timeouts are enforced by the caller.
const HTTP_SAFETY_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for OpenAI-compatible chat-completions APIs.
pub struct ChatClient {
    api_base: String,
    api_key: String,
    http_client: Client,
}

impl ChatClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] when no credentials are
    /// configured. Callers that want a credential-free engine must ask for
    /// offline mode explicitly instead of being silently downgraded.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            http_client: Client::builder()
                .timeout(HTTP_SAFETY_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
        })
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

/// Error response from the API.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl LlmProvider for ChatClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        let url = format!("{}/chat/completions", self.api_base);

        let http_response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = http_response.status();
        if !status.is_success() {
            let code = status.as_u16();
            let error_text = http_response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());

            if let Ok(parsed) = serde_json::from_str::<ApiErrorResponse>(&error_text) {
                if code == 429 {
                    return Err(LlmError::RateLimited(parsed.error.message));
                }
                return Err(LlmError::ApiError {
                    code,
                    message: parsed.error.message,
                });
            }
            return Err(LlmError::ApiError {
                code,
                message: error_text,
            });
        }

        http_response
            .json::<GenerationResponse>()
            .await
            .map_err(|e| LlmError::ResponseDecode(e.to_string()))
    }
}

/// Returns the process-wide client handle, building it on first use.
///
/// The handle is constructed exactly once; configuration passed by later
/// callers is ignored. Use [`ChatClient::new`] directly when separate
/// clients are needed (tests, multi-tenant gateways).
pub fn shared_client(config: &EngineConfig) -> Result<Arc<ChatClient>, ConfigError> {
    static SHARED: OnceLock<Arc<ChatClient>> = OnceLock::new();

    if let Some(client) = SHARED.get() {
        return Ok(Arc::clone(client));
    }
    let client = Arc::new(ChatClient::new(config)?);
    Ok(Arc::clone(SHARED.get_or_init(|| client)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        let config = EngineConfig::default();
        assert!(matches!(
            ChatClient::new(&config),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_client_normalizes_api_base() {
        let config = EngineConfig::default()
            .with_api_base("http://localhost:4000/v1/")
            .with_api_key("sk-test");
        let client = ChatClient::new(&config).unwrap();
        assert_eq!(client.api_base(), "http://localhost:4000/v1");
    }

    #[test]
    fn test_shared_client_is_reused() {
        let config = EngineConfig::default().with_api_key("sk-test");
        let a = shared_client(&config).unwrap();
        let b = shared_client(&config).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
