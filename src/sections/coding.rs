//! Coding section: the practice challenges themselves.
//!
//! On top of the shared call/parse/fallback flow, this section runs the
//! coverage pass so every selected problem is present in the output no
//! matter what the model returned.

use serde_json::{Map, Value};
use tracing::warn;

use super::{coerce_list_fields, require_object, ModelGate, SectionFailure, SectionOutcome};
use crate::context::JobContext;
use crate::coverage;
use crate::error::EngineError;
use crate::role::RoleContext;
use crate::selector::SelectionResult;
use crate::{fallback, parser, prompts};

const EXPECTED_LIST_KEYS: &[&str] = &["coding_challenges", "suggested_challenges"];

pub(crate) async fn generate(
    gate: &ModelGate<'_>,
    job: &JobContext,
    role: &RoleContext,
    selection: &SelectionResult,
) -> Result<(Value, SectionOutcome), EngineError> {
    let (mut map, outcome) = match try_model(gate, job, role, selection).await {
        Ok(map) => (map, SectionOutcome::Model),
        Err(failure) => {
            warn!(section = "coding", %failure, "model generation failed, using fallback");
            let map = match fallback::coding_payload(selection, job) {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            (map, SectionOutcome::Fallback)
        }
    };

    let entries = match map.remove("coding_challenges") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    let ensured = coverage::ensure(&selection.primary, entries, job, gate).await?;
    map.insert("coding_challenges".to_string(), Value::Array(ensured));

    let suggested = match map.remove("suggested_challenges") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    map.insert(
        "suggested_challenges".to_string(),
        Value::Array(coverage::normalize_entries(suggested)),
    );

    Ok((Value::Object(map), outcome))
}

async fn try_model(
    gate: &ModelGate<'_>,
    job: &JobContext,
    role: &RoleContext,
    selection: &SelectionResult,
) -> Result<Map<String, Value>, SectionFailure> {
    let (system, user) = prompts::coding_prompt(job, role, selection);
    let text = gate.complete(&system, &user).await?;
    let mut map = require_object(parser::parse_model_json(&text)?)?;
    coerce_list_fields(&mut map, EXPECTED_LIST_KEYS);
    Ok(map)
}
