//! Error types for prep-engine operations.
//!
//! Defines error types for the major subsystems:
//! - Model transport and generation (`LlmError`)
//! - Engine configuration (`ConfigError`, defined next to the config)
//! - Request-level failures surfaced to the caller (`EngineError`)
//!
//! Malformed-output errors live next to the parser in [`crate::parser`].

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while talking to the generative model.
///
/// Every variant is recoverable at the section boundary: the generator logs
/// it and substitutes the deterministic fallback payload.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    #[error("Failed to decode API response: {0}")]
    ResponseDecode(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Call abandoned after {0} ms deadline")]
    DeadlineElapsed(u64),

    #[error("Plan budget exhausted before the call could start")]
    BudgetExhausted,

    #[error("No model client configured")]
    Unavailable,
}

/// Fatal, request-level errors returned by [`crate::engine::PrepEngine`].
///
/// Transient model failures and unparsable output never surface here; they
/// degrade the affected section to its fallback payload instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal bug class: a structural guarantee failed its last-resort
    /// repair. The request is aborted rather than returning an invalid plan.
    #[error("Plan invariant violated: {0}")]
    InvariantViolation(String),
}
