//! Advanced section: design scenarios, case studies, questions, frameworks
//! and whiteboarding guidance.

use serde_json::Value;
use tracing::warn;

use super::{
    coerce_list_fields, coerce_object_field, require_object, ModelGate, SectionFailure,
    SectionOutcome,
};
use crate::context::JobContext;
use crate::role::RoleContext;
use crate::{fallback, parser, prompts};

const EXPECTED_LIST_KEYS: &[&str] = &[
    "system_design_scenarios",
    "case_studies",
    "technical_questions",
    "solution_frameworks",
    "real_world_alignment",
];

const EXPECTED_OBJECT_KEY: &str = "whiteboarding_practice";

pub(crate) async fn generate(
    gate: &ModelGate<'_>,
    job: &JobContext,
    role: &RoleContext,
) -> (Value, SectionOutcome) {
    match try_model(gate, job, role).await {
        Ok(payload) => (payload, SectionOutcome::Model),
        Err(failure) => {
            warn!(section = "advanced", %failure, "model generation failed, using fallback");
            (fallback::advanced_payload(job, role), SectionOutcome::Fallback)
        }
    }
}

async fn try_model(
    gate: &ModelGate<'_>,
    job: &JobContext,
    role: &RoleContext,
) -> Result<Value, SectionFailure> {
    let (system, user) = prompts::advanced_prompt(job, role);
    let text = gate.complete(&system, &user).await?;
    let mut map = require_object(parser::parse_model_json(&text)?)?;
    coerce_list_fields(&mut map, EXPECTED_LIST_KEYS);
    coerce_object_field(&mut map, EXPECTED_OBJECT_KEY);
    Ok(Value::Object(map))
}
