//! Prompt templates for the section generators.
//!
//! Each builder returns a (system, user) pair. The user prompts spell out
//! the exact JSON contract the parser and assembler expect downstream;
//! models that drift from it are repaired or replaced by fallbacks, never
//! trusted blindly.

use crate::catalog::CatalogProblem;
use crate::context::{CandidateContext, JobContext};
use crate::role::RoleContext;
use crate::selector::SelectionResult;

const JSON_ONLY_SYSTEM_PROMPT: &str = "You are an interview-preparation coach. \
Respond with a single JSON object and nothing else: no markdown fences, no commentary.";

const SUMMARY_PROMPT: &str = r#"
Build the overview of a technical-interview preparation plan.

Job title: {title}
Company: {company}
Job description: {description}
Required skills: {required_skills}
Candidate background: {candidate_summary}
Candidate skills: {candidate_skills}
Role classification: {role_kind}, target level {target_level}

Return a JSON object with exactly these keys:
- "tech_stack": list of up to 8 technologies the candidate should be fluent in
- "focus_areas": list of 4-6 preparation themes ordered by impact
"#;

const CODING_PROMPT: &str = r#"
Build the coding-practice section of an interview preparation plan.

Job title: {title}
Company: {company}
Target level: {target_level}
Functional areas: {functional_tags}

Cover every one of these required challenges (keep the slugs verbatim):
{primary_challenges}

Also produce lighter entries for these optional suggestions:
{suggested_challenges}

Return a JSON object with exactly these keys:
- "coding_challenges": list, one entry per required challenge
- "suggested_challenges": list, one entry per optional suggestion

Each entry is an object with keys "slug", "title", "difficulty",
"summary" (2-3 sentences tailored to {company}), "topics",
"estimated_minutes" (integer), "company_context" (1 sentence).
"#;

const ADVANCED_PROMPT: &str = r#"
Build the advanced section of an interview preparation plan.

Job title: {title}
Company: {company}
Job description: {description}
Target level: {target_level}
Functional areas: {functional_tags}

Return a JSON object with exactly these keys:
- "system_design_scenarios": list of 2 objects with "title", "prompt",
  "focus_points" (list), "estimated_minutes" (integer)
- "case_studies": list of 1-2 objects with "title", "scenario",
  "discussion_points" (list)
- "technical_questions": list of 4-6 objects with "question",
  "answer_outline", "topic"
- "solution_frameworks": list of 2 objects with "name", "steps" (list),
  "applies_to"
- "whiteboarding_practice": object with "warmup", "core_exercise",
  "tips" (list)
- "real_world_alignment": list of 3-4 sentences mapping the plan to the
  job's day-to-day work
"#;

const SINGLE_CHALLENGE_PROMPT: &str = r#"
Write one coding-practice entry for an interview preparation plan.

Company: {company}
Challenge: {challenge_title} (slug: {challenge_slug}, difficulty: {difficulty})
Topics: {topics}

Return a JSON object with keys "slug" (must be exactly "{challenge_slug}"),
"title", "difficulty", "summary" (2-3 sentences), "topics",
"estimated_minutes" (integer), "company_context" (1 sentence).
"#;

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none listed".to_string()
    } else {
        items.join(", ")
    }
}

fn role_kind(role: &RoleContext) -> &'static str {
    if role.is_technical {
        "technical"
    } else {
        "non-technical"
    }
}

fn challenge_lines(problems: &[CatalogProblem]) -> String {
    if problems.is_empty() {
        return "(none)".to_string();
    }
    problems
        .iter()
        .map(|p| {
            format!(
                "- {} (slug: {}, difficulty: {}, topics: {})",
                p.title,
                p.slug,
                p.difficulty.as_str(),
                p.topics.iter().cloned().collect::<Vec<_>>().join("/")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt for the plan overview section.
pub(crate) fn summary_prompt(
    job: &JobContext,
    candidate: &CandidateContext,
    role: &RoleContext,
) -> (String, String) {
    let user = SUMMARY_PROMPT
        .replace("{title}", &job.title)
        .replace("{company}", &job.company)
        .replace("{description}", &job.description)
        .replace("{required_skills}", &join_or_none(&job.required_skills))
        .replace("{candidate_summary}", &candidate.summary)
        .replace("{candidate_skills}", &join_or_none(&candidate.known_skills))
        .replace("{role_kind}", role_kind(role))
        .replace("{target_level}", role.target_level.as_str());
    (JSON_ONLY_SYSTEM_PROMPT.to_string(), user)
}

/// Prompt for the coding-practice section.
pub(crate) fn coding_prompt(
    job: &JobContext,
    role: &RoleContext,
    selection: &SelectionResult,
) -> (String, String) {
    let tags: Vec<String> = role.functional_tags.iter().cloned().collect();
    let user = CODING_PROMPT
        .replace("{title}", &job.title)
        .replace("{company}", &job.company)
        .replace("{target_level}", role.target_level.as_str())
        .replace("{functional_tags}", &join_or_none(&tags))
        .replace("{primary_challenges}", &challenge_lines(&selection.primary))
        .replace(
            "{suggested_challenges}",
            &challenge_lines(&selection.suggested),
        );
    (JSON_ONLY_SYSTEM_PROMPT.to_string(), user)
}

/// Prompt for the advanced section.
pub(crate) fn advanced_prompt(job: &JobContext, role: &RoleContext) -> (String, String) {
    let tags: Vec<String> = role.functional_tags.iter().cloned().collect();
    let user = ADVANCED_PROMPT
        .replace("{title}", &job.title)
        .replace("{company}", &job.company)
        .replace("{description}", &job.description)
        .replace("{target_level}", role.target_level.as_str())
        .replace("{functional_tags}", &join_or_none(&tags));
    (JSON_ONLY_SYSTEM_PROMPT.to_string(), user)
}

/// Prompt for a single rescue entry issued by the coverage pass.
pub(crate) fn single_challenge_prompt(
    job: &JobContext,
    problem: &CatalogProblem,
) -> (String, String) {
    let topics: Vec<String> = problem.topics.iter().cloned().collect();
    let user = SINGLE_CHALLENGE_PROMPT
        .replace("{company}", &job.company)
        .replace("{challenge_title}", &problem.title)
        .replace("{challenge_slug}", &problem.slug)
        .replace("{difficulty}", problem.difficulty.as_str())
        .replace("{topics}", &join_or_none(&topics));
    (JSON_ONLY_SYSTEM_PROMPT.to_string(), user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::role::classify;
    use crate::selector::select;

    #[test]
    fn test_coding_prompt_names_every_primary_slug() {
        let job = JobContext::new("Backend Engineer", "Acme", "Build APIs");
        let role = classify(&job);
        let selection = select(&job, &role, Catalog::builtin(), 5, 3);

        let (_, user) = coding_prompt(&job, &role, &selection);
        for p in &selection.primary {
            assert!(user.contains(&p.slug), "prompt missing slug {}", p.slug);
        }
    }

    #[test]
    fn test_single_challenge_prompt_pins_slug() {
        let job = JobContext::new("Engineer", "Acme", "code");
        let catalog = Catalog::builtin();
        let problem = catalog.find("two-sum").unwrap();
        let (_, user) = single_challenge_prompt(&job, problem);
        assert!(user.contains(r#"exactly "two-sum""#));
    }

    #[test]
    fn test_summary_prompt_carries_candidate_background() {
        let job = JobContext::new("Engineer", "Acme", "code");
        let candidate =
            CandidateContext::new("Five years of services work", vec!["Go".to_string()]);
        let role = classify(&job);
        let (_, user) = summary_prompt(&job, &candidate, &role);
        assert!(user.contains("Five years of services work"));
        assert!(user.contains("Go"));
    }
}
