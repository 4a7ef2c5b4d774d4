//! Section generation machinery.
//!
//! Each plan section (summary, coding, advanced) makes exactly one model
//! attempt through a [`ModelGate`], which races the call on a spawned
//! worker against the smaller of the per-call timeout and the remaining
//! plan budget. A worker that outlives its window is abandoned: the remote
//! call may complete, but its result is discarded. Failures of any kind
//! degrade the section to its deterministic fallback payload and are
//! tagged in the [`SectionOutcome`] so degradation is never silent.

pub(crate) mod advanced;
pub(crate) mod coding;
pub(crate) mod summary;

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::time::Instant;

use crate::config::EngineConfig;
use crate::error::LlmError;
use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::parser::ExtractError;

/// Shared wall-clock deadline for one generation request, fixed when the
/// request starts.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    ends_at: Instant,
}

impl Deadline {
    pub fn starting_now(budget: Duration) -> Self {
        Self {
            ends_at: Instant::now() + budget,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.ends_at.saturating_duration_since(Instant::now())
    }

    /// Effective window for the next call, or `None` when the budget is
    /// already exhausted and the call must be skipped without touching the
    /// network.
    pub fn call_window(&self, per_call: Duration) -> Option<Duration> {
        let remaining = self.remaining();
        if remaining.is_zero() {
            None
        } else {
            Some(remaining.min(per_call))
        }
    }
}

/// How a section's payload was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionOutcome {
    /// The model call succeeded and its output validated.
    Model,
    /// The deterministic fallback payload was substituted.
    Fallback,
}

impl SectionOutcome {
    pub fn used_model(&self) -> bool {
        matches!(self, SectionOutcome::Model)
    }
}

/// Why a section degraded. Logged at the generator boundary, never
/// propagated to the caller.
#[derive(Debug, Error)]
pub(crate) enum SectionFailure {
    #[error(transparent)]
    Model(#[from] LlmError),

    #[error(transparent)]
    Output(#[from] ExtractError),

    #[error("Unexpected payload shape: {0}")]
    Shape(String),
}

/// One model attempt under the shared deadline discipline.
pub(crate) struct ModelGate<'a> {
    pub provider: Option<&'a Arc<dyn LlmProvider>>,
    pub config: &'a EngineConfig,
    pub deadline: &'a Deadline,
}

impl ModelGate<'_> {
    /// Issues exactly one chat completion and returns its text content.
    ///
    /// The request runs on its own worker task raced against the deadline
    /// window. On timeout the worker is abandoned (cancellation of the
    /// remote call is best effort only) and the elapsed window reported.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let provider = self.provider.ok_or(LlmError::Unavailable)?;
        let window = self
            .deadline
            .call_window(self.config.call_timeout)
            .ok_or(LlmError::BudgetExhausted)?;

        let request = GenerationRequest::new(
            &self.config.model,
            vec![Message::system(system), Message::user(user)],
        )
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens);

        let worker = tokio::spawn({
            let provider = Arc::clone(provider);
            async move { provider.generate(request).await }
        });

        match tokio::time::timeout(window, worker).await {
            Ok(Ok(Ok(response))) => {
                let content = response.first_content().unwrap_or_default().trim();
                if content.is_empty() {
                    Err(LlmError::EmptyResponse)
                } else {
                    Ok(content.to_string())
                }
            }
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(join_error)) => {
                Err(LlmError::RequestFailed(format!("model worker died: {join_error}")))
            }
            Err(_elapsed) => Err(LlmError::DeadlineElapsed(window.as_millis() as u64)),
        }
    }
}

/// Requires the decoded payload to be a JSON object.
pub(crate) fn require_object(value: Value) -> Result<Map<String, Value>, SectionFailure> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(SectionFailure::Shape(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Forces each expected key to exist as a list, coercing missing or
/// non-list values to empty lists rather than failing the section.
pub(crate) fn coerce_list_fields(map: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        let ok = matches!(map.get(*key), Some(Value::Array(_)));
        if !ok {
            map.insert((*key).to_string(), Value::Array(Vec::new()));
        }
    }
}

/// Forces the key to exist as an object, coercing anything else to an
/// empty object.
pub(crate) fn coerce_object_field(map: &mut Map<String, Value>, key: &str) {
    let ok = matches!(map.get(key), Some(Value::Object(_)));
    if !ok {
        map.insert(key.to_string(), Value::Object(Map::new()));
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_window_clamps_to_remaining() {
        let deadline = Deadline::starting_now(Duration::from_millis(10));
        let window = deadline.call_window(Duration::from_secs(30)).unwrap();
        assert!(window <= Duration::from_millis(10));
    }

    #[test]
    fn test_call_window_none_when_exhausted() {
        let deadline = Deadline::starting_now(Duration::ZERO);
        assert!(deadline.call_window(Duration::from_secs(30)).is_none());
    }

    #[test]
    fn test_coerce_list_fields() {
        let mut map = require_object(json!({
            "present": [1, 2],
            "wrong_type": "not a list",
        }))
        .unwrap();
        coerce_list_fields(&mut map, &["present", "wrong_type", "missing"]);
        assert_eq!(map["present"], json!([1, 2]));
        assert_eq!(map["wrong_type"], json!([]));
        assert_eq!(map["missing"], json!([]));
    }

    #[test]
    fn test_coerce_object_field() {
        let mut map = require_object(json!({"practice": 7})).unwrap();
        coerce_object_field(&mut map, "practice");
        assert_eq!(map["practice"], json!({}));
    }

    #[test]
    fn test_require_object_rejects_arrays() {
        assert!(require_object(json!([1, 2, 3])).is_err());
    }
}
