//! Summary section: tech stack and focus areas.

use serde_json::Value;
use tracing::warn;

use super::{coerce_list_fields, require_object, ModelGate, SectionFailure, SectionOutcome};
use crate::context::{CandidateContext, JobContext};
use crate::role::RoleContext;
use crate::{fallback, parser, prompts};

const EXPECTED_LIST_KEYS: &[&str] = &["tech_stack", "focus_areas"];

pub(crate) async fn generate(
    gate: &ModelGate<'_>,
    job: &JobContext,
    candidate: &CandidateContext,
    role: &RoleContext,
) -> (Value, SectionOutcome) {
    match try_model(gate, job, candidate, role).await {
        Ok(payload) => (payload, SectionOutcome::Model),
        Err(failure) => {
            warn!(section = "summary", %failure, "model generation failed, using fallback");
            (
                fallback::summary_payload(job, candidate, role),
                SectionOutcome::Fallback,
            )
        }
    }
}

async fn try_model(
    gate: &ModelGate<'_>,
    job: &JobContext,
    candidate: &CandidateContext,
    role: &RoleContext,
) -> Result<Value, SectionFailure> {
    let (system, user) = prompts::summary_prompt(job, candidate, role);
    let text = gate.complete(&system, &user).await?;
    let mut map = require_object(parser::parse_model_json(&text)?)?;
    coerce_list_fields(&mut map, EXPECTED_LIST_KEYS);
    Ok(Value::Object(map))
}
