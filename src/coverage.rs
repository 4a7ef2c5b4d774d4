//! Coverage enforcement for the coding section.
//!
//! Guarantees every selected catalog problem appears in the generated
//! entries exactly once. Missing problems get one small single-problem
//! model request under the same timeout discipline as the sections; if the
//! model still omits the slug, a deterministic template entry is
//! synthesized. A selected problem is never silently dropped.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::catalog::{slugify, CatalogProblem};
use crate::context::JobContext;
use crate::error::EngineError;
use crate::sections::ModelGate;
use crate::{fallback, parser, prompts};

/// Normalizes entry slugs (lowercase, slugified title when absent) and
/// drops duplicates, preserving the first occurrence. Non-object entries
/// and entries with no identity at all are discarded.
pub(crate) fn normalize_entries(entries: Vec<Value>) -> Vec<Value> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for entry in entries {
        let Value::Object(mut map) = entry else {
            continue;
        };
        let Some(slug) = canonical_slug(&map) else {
            continue;
        };
        if !seen.insert(slug.clone()) {
            continue;
        }
        map.insert("slug".to_string(), Value::String(slug));
        out.push(Value::Object(map));
    }
    out
}

fn canonical_slug(map: &Map<String, Value>) -> Option<String> {
    if let Some(Value::String(slug)) = map.get("slug") {
        let slug = slug.trim().to_lowercase();
        if !slug.is_empty() {
            return Some(slug);
        }
    }
    if let Some(Value::String(title)) = map.get("title") {
        let slug = slugify(title);
        if !slug.is_empty() {
            return Some(slug);
        }
    }
    None
}

fn slug_of(entry: &Value) -> Option<String> {
    entry
        .get("slug")
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

/// Ensures every expected problem's slug appears exactly once in the
/// returned entries.
///
/// # Errors
///
/// Returns [`EngineError::InvariantViolation`] if a slug is still missing
/// after template synthesis. That cannot happen short of an internal bug,
/// and aborting beats returning a structurally invalid plan.
pub(crate) async fn ensure(
    expected: &[CatalogProblem],
    entries: Vec<Value>,
    job: &JobContext,
    gate: &ModelGate<'_>,
) -> Result<Vec<Value>, EngineError> {
    let mut entries = normalize_entries(entries);
    let mut present: BTreeSet<String> = entries.iter().filter_map(|e| slug_of(e)).collect();

    for problem in expected {
        if present.contains(&problem.slug) {
            continue;
        }
        let entry = match rescue_entry(gate, job, problem).await {
            Some(entry) => {
                debug!(slug = %problem.slug, "rescued missing challenge via model");
                entry
            }
            None => {
                warn!(slug = %problem.slug, "synthesizing template entry for missing challenge");
                fallback::coding_entry(problem, &job.company)
            }
        };
        present.insert(problem.slug.clone());
        entries.push(entry);
    }

    let final_slugs: BTreeSet<String> = entries.iter().filter_map(|e| slug_of(e)).collect();
    for problem in expected {
        if !final_slugs.contains(&problem.slug) {
            return Err(EngineError::InvariantViolation(format!(
                "challenge '{}' still missing after synthesis",
                problem.slug
            )));
        }
    }

    Ok(entries)
}

/// One single-problem model attempt. Returns `None` unless the response
/// decodes to an entry carrying the expected slug.
async fn rescue_entry(
    gate: &ModelGate<'_>,
    job: &JobContext,
    problem: &CatalogProblem,
) -> Option<Value> {
    let (system, user) = prompts::single_challenge_prompt(job, problem);
    let text = gate.complete(&system, &user).await.ok()?;
    let value = parser::parse_model_json(&text).ok()?;

    let map = match value {
        Value::Object(map) => map,
        Value::Array(items) => items.into_iter().find_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })?,
        _ => return None,
    };

    let slug = canonical_slug(&map)?;
    if slug != problem.slug {
        return None;
    }
    let mut map = map;
    map.insert("slug".to_string(), Value::String(slug));
    Some(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::EngineConfig;
    use crate::sections::Deadline;
    use serde_json::json;
    use std::time::Duration;

    fn offline_gate<'a>(config: &'a EngineConfig, deadline: &'a Deadline) -> ModelGate<'a> {
        ModelGate {
            provider: None,
            config,
            deadline,
        }
    }

    #[test]
    fn test_normalize_dedups_preserving_first() {
        let entries = vec![
            json!({"slug": "Two-Sum", "summary": "first"}),
            json!({"slug": "two-sum", "summary": "second"}),
            json!({"title": "LRU Cache"}),
            json!("not an object"),
        ];
        let normalized = normalize_entries(entries);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0]["slug"], "two-sum");
        assert_eq!(normalized[0]["summary"], "first");
        assert_eq!(normalized[1]["slug"], "lru-cache");
    }

    #[tokio::test]
    async fn test_ensure_synthesizes_missing_entries_offline() {
        let catalog = Catalog::builtin();
        let expected = vec![
            catalog.find("two-sum").unwrap().clone(),
            catalog.find("lru-cache").unwrap().clone(),
        ];
        let config = EngineConfig::default();
        let deadline = Deadline::starting_now(Duration::from_secs(5));
        let gate = offline_gate(&config, &deadline);
        let job = JobContext::new("Engineer", "Acme", "code");

        let entries = vec![json!({"slug": "two-sum", "summary": "kept"})];
        let ensured = ensure(&expected, entries, &job, &gate).await.unwrap();

        assert_eq!(ensured.len(), 2);
        assert_eq!(ensured[0]["slug"], "two-sum");
        assert_eq!(ensured[0]["summary"], "kept");
        assert_eq!(ensured[1]["slug"], "lru-cache");
        assert!(ensured[1]["summary"].as_str().unwrap().contains("Acme"));
    }

    #[tokio::test]
    async fn test_ensure_keeps_unexpected_entries() {
        let catalog = Catalog::builtin();
        let expected = vec![catalog.find("two-sum").unwrap().clone()];
        let config = EngineConfig::default();
        let deadline = Deadline::starting_now(Duration::from_secs(5));
        let gate = offline_gate(&config, &deadline);
        let job = JobContext::new("Engineer", "Acme", "code");

        let entries = vec![json!({"slug": "word-break"})];
        let ensured = ensure(&expected, entries, &job, &gate).await.unwrap();

        let slugs: Vec<_> = ensured.iter().map(|e| e["slug"].clone()).collect();
        assert_eq!(slugs, vec![json!("word-break"), json!("two-sum")]);
    }
}
