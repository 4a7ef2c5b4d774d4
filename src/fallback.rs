//! Deterministic fallback payloads.
//!
//! Template-based section content substituted when the model is
//! unavailable, over budget, or unusable. Everything here is a pure
//! function of the caller's inputs: no I/O, no randomness, so two runs on
//! the same job produce byte-identical payloads.

use serde_json::{json, Value};

use crate::catalog::{CatalogProblem, Difficulty};
use crate::context::{CandidateContext, JobContext};
use crate::role::{RoleContext, TargetLevel};
use crate::selector::SelectionResult;

/// Languages recognized when mining the job description for a tech stack.
const STACK_LANGUAGES: &[&str] = &[
    "Python",
    "Java",
    "TypeScript",
    "JavaScript",
    "Go",
    "Rust",
    "C++",
    "C#",
    "Ruby",
    "Kotlin",
    "Swift",
    "SQL",
];

const MAX_TECH_STACK: usize = 8;

/// Focus areas keyed by functional tag.
const FOCUS_BY_TAG: &[(&str, &[&str])] = &[
    (
        "backend",
        &["API design", "Data modeling", "Caching strategies"],
    ),
    (
        "frontend",
        &["Component architecture", "State management", "Rendering performance"],
    ),
    ("data", &["Data pipeline design", "Query optimization"]),
    ("mobile", &["Offline-first design", "App lifecycle handling"]),
    ("devops", &["Deployment pipelines", "Incident response"]),
    ("security", &["Threat modeling", "Secure coding practices"]),
];

fn estimated_minutes(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 20,
        Difficulty::Medium => 35,
        Difficulty::Hard => 50,
    }
}

/// Overview payload: tech stack mined from the inputs plus focus areas
/// derived from the role classification.
pub(crate) fn summary_payload(
    job: &JobContext,
    candidate: &CandidateContext,
    role: &RoleContext,
) -> Value {
    let description = job.description.to_lowercase();
    let mut tech_stack: Vec<String> = Vec::new();
    let push_unique = |item: &str, stack: &mut Vec<String>| {
        if !item.is_empty() && !stack.iter().any(|s| s.eq_ignore_ascii_case(item)) {
            stack.push(item.to_string());
        }
    };

    for skill in &job.required_skills {
        push_unique(skill, &mut tech_stack);
    }
    for language in STACK_LANGUAGES {
        if description.contains(&language.to_lowercase()) {
            push_unique(language, &mut tech_stack);
        }
    }
    for skill in &candidate.known_skills {
        push_unique(skill, &mut tech_stack);
    }
    tech_stack.truncate(MAX_TECH_STACK);
    if tech_stack.is_empty() {
        tech_stack.push("Core programming fundamentals".to_string());
    }

    let mut focus_areas: Vec<String> = vec!["Algorithmic problem solving".to_string()];
    for (tag, areas) in FOCUS_BY_TAG {
        if role.functional_tags.contains(*tag) {
            focus_areas.extend(areas.iter().map(|a| (*a).to_string()));
        }
    }
    match role.target_level {
        TargetLevel::Senior => {
            focus_areas.push("System design depth and tradeoff narration".to_string())
        }
        TargetLevel::Entry => focus_areas.push("Clean, well-tested fundamentals".to_string()),
        TargetLevel::Mid => focus_areas.push("Pragmatic design discussions".to_string()),
    }
    if !role.is_technical {
        focus_areas = vec![
            "Structured problem walkthroughs".to_string(),
            "Stakeholder communication".to_string(),
            "Metrics-driven decision making".to_string(),
        ];
    }

    json!({
        "tech_stack": tech_stack,
        "focus_areas": focus_areas,
    })
}

/// One deterministic coding entry, parameterized only by the problem's
/// descriptor and the company name. Also used by the coverage pass as the
/// last-resort synthesis.
pub(crate) fn coding_entry(problem: &CatalogProblem, company: &str) -> Value {
    let topics: Vec<String> = problem.topics.iter().cloned().collect();
    let topic_phrase = topics.join(", ");
    let lead_topic = topics.first().cloned().unwrap_or_else(|| "general".to_string());

    json!({
        "slug": problem.slug,
        "title": problem.title,
        "difficulty": problem.difficulty.as_str(),
        "summary": format!(
            "Work through {}, a {} exercise covering {}. Solve it twice: once for correctness, once narrating your approach aloud as if guiding a {} interviewer through it.",
            problem.title, problem.difficulty.as_str(), topic_phrase, company
        ),
        "topics": topics,
        "estimated_minutes": estimated_minutes(problem.difficulty),
        "company_context": format!(
            "Expect {} to probe {} tradeoffs in follow-up questions.",
            company, lead_topic
        ),
    })
}

/// Coding payload covering every selected problem by construction. Slugs
/// are deduplicated because selection padding may cycle a small pool.
pub(crate) fn coding_payload(selection: &SelectionResult, job: &JobContext) -> Value {
    let mut seen = std::collections::BTreeSet::new();
    let primary: Vec<Value> = selection
        .primary
        .iter()
        .filter(|p| seen.insert(p.slug.clone()))
        .map(|p| coding_entry(p, &job.company))
        .collect();
    let mut seen_suggested = std::collections::BTreeSet::new();
    let suggested: Vec<Value> = selection
        .suggested
        .iter()
        .filter(|p| seen_suggested.insert(p.slug.clone()))
        .map(|p| coding_entry(p, &job.company))
        .collect();

    json!({
        "coding_challenges": primary,
        "suggested_challenges": suggested,
    })
}

/// Advanced payload: design scenarios, case studies, questions, frameworks
/// and whiteboarding guidance derived from the role classification.
pub(crate) fn advanced_payload(job: &JobContext, role: &RoleContext) -> Value {
    let company = &job.company;
    let level = role.target_level.as_str();

    let system_design_scenarios = if role.is_technical {
        json!([
            {
                "title": "Rate limiter for a public API",
                "prompt": format!(
                    "Design the rate-limiting layer for {}'s public API. Start from requirements, pick an algorithm, then walk through multi-node consistency.",
                    company
                ),
                "focus_points": ["Requirement scoping", "Algorithm choice", "Distributed state"],
                "estimated_minutes": 40,
            },
            {
                "title": "Activity feed read path",
                "prompt": format!(
                    "Design the read path of an activity feed serving {}'s users, covering fan-out strategy, caching tiers and pagination.",
                    company
                ),
                "focus_points": ["Fan-out tradeoffs", "Cache invalidation", "Pagination"],
                "estimated_minutes": 40,
            },
        ])
    } else {
        json!([
            {
                "title": "Process design walkthrough",
                "prompt": format!(
                    "Design an intake-to-delivery process for a cross-functional initiative at {}, including checkpoints and escalation paths.",
                    company
                ),
                "focus_points": ["Scoping", "Stakeholder alignment", "Risk checkpoints"],
                "estimated_minutes": 30,
            },
        ])
    };

    let case_studies = json!([
        {
            "title": format!("A launch at {} goes sideways", company),
            "scenario": "A high-visibility release degrades a core metric within the first hour. Walk through detection, mitigation and the retrospective.",
            "discussion_points": ["Detection signals", "Rollback criteria", "Blameless retrospective"],
        },
    ]);

    let mut technical_questions = vec![json!({
        "question": "How do you decide between optimizing an existing approach and rewriting it?",
        "answer_outline": "Quantify the current cost, bound the expected gain, and compare against the risk and opportunity cost of a rewrite.",
        "topic": "judgment",
    })];
    if role.functional_tags.contains("backend") {
        technical_questions.push(json!({
            "question": "When would you reach for an asynchronous queue between two services?",
            "answer_outline": "Bursty load absorption, failure isolation and retry semantics; weigh against added latency and operational surface.",
            "topic": "design",
        }));
        technical_questions.push(json!({
            "question": "How would you keep a cache and its source of truth consistent?",
            "answer_outline": "Discuss TTLs, write-through versus invalidation, and what staleness the product can tolerate.",
            "topic": "design",
        }));
    }
    if role.functional_tags.contains("data") {
        technical_questions.push(json!({
            "question": "How do you backfill a derived dataset without double-counting?",
            "answer_outline": "Idempotent transforms keyed by natural identifiers, watermarking, and reconciliation checks.",
            "topic": "math",
        }));
    }
    technical_questions.push(json!({
        "question": format!("What would you want to learn about {}'s architecture in your first month?", company),
        "answer_outline": "Map the critical request paths, the on-call surface, and where the team's biggest sources of toil live.",
        "topic": "general",
    }));

    let solution_frameworks = json!([
        {
            "name": "Constraint-first decomposition",
            "steps": [
                "Restate the problem and confirm inputs/outputs",
                "List hard constraints and scale assumptions",
                "Sketch the brute-force baseline",
                "Attack the dominant cost with a better structure",
                "Verify with an edge-case walkthrough",
            ],
            "applies_to": "coding rounds",
        },
        {
            "name": "Requirements-to-components",
            "steps": [
                "Separate functional from non-functional requirements",
                "Estimate load and data volume",
                "Draw the component diagram and data flow",
                "Deep-dive the riskiest component",
                "Close with failure modes and evolution",
            ],
            "applies_to": "system design rounds",
        },
    ]);

    let whiteboarding_practice = json!({
        "warmup": "Re-implement a small utility (string reversal, frequency count) on paper without running it.",
        "core_exercise": format!(
            "Pick one {} challenge from this plan and present it end-to-end in 25 minutes, thinking aloud the whole time.",
            level
        ),
        "tips": [
            "State your plan before writing code",
            "Name complexity bounds unprompted",
            "Test with a hostile input before declaring done",
        ],
    });

    let mut real_world_alignment: Vec<String> = job
        .required_skills
        .iter()
        .take(3)
        .map(|skill| {
            format!(
                "Practice sessions reinforce {}, which the posting calls out directly.",
                skill
            )
        })
        .collect();
    real_world_alignment.push(format!(
        "The design scenarios mirror the scale questions {} is likely to ask a {} candidate.",
        company, level
    ));

    json!({
        "system_design_scenarios": system_design_scenarios,
        "case_studies": case_studies,
        "technical_questions": technical_questions,
        "solution_frameworks": solution_frameworks,
        "whiteboarding_practice": whiteboarding_practice,
        "real_world_alignment": real_world_alignment,
    })
}
