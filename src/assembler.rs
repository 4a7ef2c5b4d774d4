//! Plan assembly.
//!
//! Merges the three section payloads into a typed [`PrepPlan`]. Missing or
//! malformed list fields become empty lists and missing object fields
//! empty objects; assembly itself never fails. Every list item gets a
//! stable identifier derived from its content, so regenerating identical
//! content regenerates identical IDs. Coding and suggested entries leave
//! here with at least one judge reference link each.

use chrono::Utc;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::catalog::{infer_topics, slugify, Catalog, Difficulty};
use crate::plan::{
    CaseStudy, CodingChallenge, DesignScenario, PlanSource, PrepPlan, RoleProfile,
    SolutionFramework, TechnicalQuestion, WhiteboardingPractice,
};
use crate::role::RoleContext;

/// The three section payloads in merge order.
pub(crate) struct SectionPayloads {
    pub summary: Value,
    pub coding: Value,
    pub advanced: Value,
}

/// Stable identifier: first 12 hex characters of SHA-256 over the item's
/// identifying fields.
fn short_id(kind: &str, title: &str, index: usize) -> String {
    let digest = Sha256::digest(format!("{kind}:{title}:{index}").as_bytes());
    digest
        .iter()
        .take(6)
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn text_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn list_field(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn minutes_field(map: &Map<String, Value>, key: &str, default: u32) -> u32 {
    map.get(key)
        .and_then(Value::as_u64)
        .map(|m| m.min(u32::MAX as u64) as u32)
        .unwrap_or(default)
}

fn top_string_list(payload: &Value, key: &str) -> Vec<String> {
    payload
        .as_object()
        .map(|map| list_field(map, key))
        .unwrap_or_default()
}

fn top_entry_maps(payload: &Value, key: &str) -> Vec<Map<String, Value>> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect()
        })
        .unwrap_or_default()
}

/// Default solve time per difficulty bucket, mirroring the fallback
/// builder's estimates.
fn default_minutes(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 20,
        Difficulty::Medium => 35,
        Difficulty::Hard => 50,
    }
}

/// Attaches the judge link for a recognized slug, or a deterministic
/// difficulty-matched substitute (index modulo bucket size) so the entry
/// never leaves without a reference.
fn reference_links(slug: &str, difficulty: Difficulty, index: usize, catalog: &Catalog) -> Vec<String> {
    if catalog.find(slug).is_some() {
        return vec![Catalog::reference_link(slug)];
    }
    let bucket = catalog.by_difficulty(difficulty);
    if bucket.is_empty() {
        // Unreachable with the built-in catalog; guard for custom tables.
        return vec![Catalog::reference_link(slug)];
    }
    let substitute = bucket[index % bucket.len()];
    vec![Catalog::reference_link(&substitute.slug)]
}

fn coding_challenge(
    map: &Map<String, Value>,
    kind: &str,
    index: usize,
    catalog: &Catalog,
) -> CodingChallenge {
    let mut title = text_field(map, "title");
    let mut slug = text_field(map, "slug").to_lowercase();
    if slug.is_empty() {
        slug = slugify(&title);
    }
    if title.is_empty() {
        title = slug.replace('-', " ");
    }

    let difficulty = Difficulty::parse_lenient(&text_field(map, "difficulty"));
    let mut topics = list_field(map, "topics");
    if topics.is_empty() {
        topics = infer_topics(&slug).into_iter().collect();
    }

    CodingChallenge {
        id: short_id(kind, &title, index),
        reference_links: reference_links(&slug, difficulty, index, catalog),
        slug,
        title,
        difficulty: difficulty.as_str().to_string(),
        summary: text_field(map, "summary"),
        topics,
        estimated_minutes: minutes_field(map, "estimated_minutes", default_minutes(difficulty)),
        company_context: text_field(map, "company_context"),
    }
}

fn design_scenario(map: &Map<String, Value>, index: usize) -> DesignScenario {
    let title = text_field(map, "title");
    DesignScenario {
        id: short_id("design", &title, index),
        prompt: text_field(map, "prompt"),
        focus_points: list_field(map, "focus_points"),
        estimated_minutes: minutes_field(map, "estimated_minutes", 30),
        title,
    }
}

fn case_study(map: &Map<String, Value>, index: usize) -> CaseStudy {
    let title = text_field(map, "title");
    CaseStudy {
        id: short_id("case", &title, index),
        scenario: text_field(map, "scenario"),
        discussion_points: list_field(map, "discussion_points"),
        title,
    }
}

fn technical_question(map: &Map<String, Value>, index: usize) -> TechnicalQuestion {
    let question = text_field(map, "question");
    TechnicalQuestion {
        id: short_id("question", &question, index),
        answer_outline: text_field(map, "answer_outline"),
        topic: text_field(map, "topic"),
        question,
    }
}

fn solution_framework(map: &Map<String, Value>, index: usize) -> SolutionFramework {
    let name = text_field(map, "name");
    SolutionFramework {
        id: short_id("framework", &name, index),
        steps: list_field(map, "steps"),
        applies_to: text_field(map, "applies_to"),
        name,
    }
}

fn whiteboarding(payload: &Value) -> WhiteboardingPractice {
    let map = payload
        .get("whiteboarding_practice")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    WhiteboardingPractice {
        warmup: text_field(&map, "warmup"),
        core_exercise: text_field(&map, "core_exercise"),
        tips: list_field(&map, "tips"),
    }
}

/// Merges the section payloads into the final plan.
pub(crate) fn assemble(
    payloads: SectionPayloads,
    role: &RoleContext,
    source: PlanSource,
    catalog: &Catalog,
) -> PrepPlan {
    let coding_challenges: Vec<CodingChallenge> = top_entry_maps(&payloads.coding, "coding_challenges")
        .iter()
        .enumerate()
        .map(|(i, map)| coding_challenge(map, "coding", i, catalog))
        .collect();

    let suggested_challenges: Vec<CodingChallenge> =
        top_entry_maps(&payloads.coding, "suggested_challenges")
            .iter()
            .enumerate()
            .map(|(i, map)| coding_challenge(map, "suggested", i, catalog))
            .collect();

    PrepPlan {
        tech_stack: top_string_list(&payloads.summary, "tech_stack"),
        focus_areas: top_string_list(&payloads.summary, "focus_areas"),
        coding_challenges,
        suggested_challenges,
        system_design_scenarios: top_entry_maps(&payloads.advanced, "system_design_scenarios")
            .iter()
            .enumerate()
            .map(|(i, map)| design_scenario(map, i))
            .collect(),
        case_studies: top_entry_maps(&payloads.advanced, "case_studies")
            .iter()
            .enumerate()
            .map(|(i, map)| case_study(map, i))
            .collect(),
        technical_questions: top_entry_maps(&payloads.advanced, "technical_questions")
            .iter()
            .enumerate()
            .map(|(i, map)| technical_question(map, i))
            .collect(),
        solution_frameworks: top_entry_maps(&payloads.advanced, "solution_frameworks")
            .iter()
            .enumerate()
            .map(|(i, map)| solution_framework(map, i))
            .collect(),
        whiteboarding_practice: whiteboarding(&payloads.advanced),
        real_world_alignment: top_string_list(&payloads.advanced, "real_world_alignment"),
        role_profile: RoleProfile::from(role),
        source,
        generated_at: Utc::now(),
        catalog_version: catalog.version().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::classify;
    use crate::context::JobContext;
    use serde_json::json;

    fn payloads() -> SectionPayloads {
        SectionPayloads {
            summary: json!({"tech_stack": ["Rust"], "focus_areas": ["APIs", 42]}),
            coding: json!({
                "coding_challenges": [
                    {"slug": "two-sum", "title": "Two Sum", "difficulty": "easy"},
                    {"slug": "not-a-real-problem", "title": "Mystery", "difficulty": "hard"},
                ],
                "suggested_challenges": [
                    {"slug": "lru-cache", "title": "LRU Cache", "difficulty": "medium"},
                ],
            }),
            advanced: json!({
                "system_design_scenarios": [{"title": "Feed", "prompt": "Design it"}],
                "case_studies": [],
                "technical_questions": [{"question": "Why queues?", "topic": "design"}],
                "solution_frameworks": [],
                "whiteboarding_practice": {"warmup": "w", "core_exercise": "c", "tips": []},
                "real_world_alignment": ["Practice matches the job"],
            }),
        }
    }

    fn role() -> RoleContext {
        classify(&JobContext::new("Backend Engineer", "Acme", "Build APIs"))
    }

    #[test]
    fn test_assemble_known_slug_links_to_itself() {
        let plan = assemble(payloads(), &role(), PlanSource::Ai, Catalog::builtin());
        assert_eq!(
            plan.coding_challenges[0].reference_links,
            vec!["https://leetcode.com/problems/two-sum/".to_string()]
        );
    }

    #[test]
    fn test_assemble_unknown_slug_gets_substitute_link() {
        let plan = assemble(payloads(), &role(), PlanSource::Ai, Catalog::builtin());
        let mystery = &plan.coding_challenges[1];
        assert_eq!(mystery.slug, "not-a-real-problem");
        assert_eq!(mystery.reference_links.len(), 1);
        assert!(!mystery.reference_links[0].contains("not-a-real-problem"));

        let hard_bucket = Catalog::builtin().by_difficulty(Difficulty::Hard);
        let expected = Catalog::reference_link(&hard_bucket[1 % hard_bucket.len()].slug);
        assert_eq!(mystery.reference_links[0], expected);
    }

    #[test]
    fn test_ids_are_stable_across_assemblies() {
        let a = assemble(payloads(), &role(), PlanSource::Ai, Catalog::builtin());
        let b = assemble(payloads(), &role(), PlanSource::Ai, Catalog::builtin());
        assert_eq!(a.coding_challenges[0].id, b.coding_challenges[0].id);
        assert_eq!(a.technical_questions[0].id, b.technical_questions[0].id);
        assert_eq!(a.coding_challenges[0].id.len(), 12);
    }

    #[test]
    fn test_non_string_list_items_are_dropped() {
        let plan = assemble(payloads(), &role(), PlanSource::Ai, Catalog::builtin());
        assert_eq!(plan.focus_areas, vec!["APIs".to_string()]);
    }

    #[test]
    fn test_empty_payloads_assemble_cleanly() {
        let empty = SectionPayloads {
            summary: json!({}),
            coding: json!({}),
            advanced: json!({}),
        };
        let plan = assemble(empty, &role(), PlanSource::Fallback, Catalog::builtin());
        assert!(plan.coding_challenges.is_empty());
        assert!(plan.tech_stack.is_empty());
        assert!(plan.whiteboarding_practice.warmup.is_empty());
    }

    #[test]
    fn test_topics_inferred_when_missing() {
        let plan = assemble(payloads(), &role(), PlanSource::Ai, Catalog::builtin());
        assert!(!plan.coding_challenges[0].topics.is_empty());
    }
}
