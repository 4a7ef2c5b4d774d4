//! Deterministic problem selection.
//!
//! Ranks catalog problems for a job and samples the top of the ranking.
//! Reproducibility contract: the jitter RNG is ChaCha8 seeded from a
//! SHA-256 hash of the job identity, so identical inputs always produce
//! identical orderings. The RNG choice is pinned; changing it would change
//! every historical selection.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use tracing::debug;

use crate::catalog::{Catalog, CatalogProblem};
use crate::context::JobContext;
use crate::role::RoleContext;

/// Ordered outcome of a selection run.
#[derive(Debug, Clone)]
pub struct SelectionResult {
    /// Problems the plan must cover.
    pub primary: Vec<CatalogProblem>,
    /// Additional practice suggestions, ranked below `primary`.
    pub suggested: Vec<CatalogProblem>,
}

/// Job-text fragments mapped to desired topics.
const TEXT_TOPIC_KEYWORDS: &[(&str, &str)] = &[
    ("api", "design"),
    ("scalab", "design"),
    ("distributed", "design"),
    ("architecture", "design"),
    ("caching", "design"),
    ("database", "design"),
    ("storage", "design"),
    ("graph", "graphs"),
    ("pipeline", "graphs"),
    ("workflow", "graphs"),
    ("dependency", "graphs"),
    ("algorithm", "dynamic-programming"),
    ("optimization", "dynamic-programming"),
    ("machine learning", "math"),
    ("statistic", "math"),
    ("pricing", "math"),
    ("financ", "math"),
    ("real-time", "heaps"),
    ("streaming", "heaps"),
    ("ranking", "heaps"),
    ("search", "searching"),
    ("text processing", "strings"),
    ("parsing", "strings"),
    ("scheduling", "intervals"),
    ("calendar", "intervals"),
];

/// Topic hints implied by each functional tag.
const FUNCTIONAL_TOPIC_HINTS: &[(&str, &[&str])] = &[
    ("backend", &["design", "graphs", "math"]),
    ("frontend", &["strings", "trees", "arrays"]),
    ("data", &["arrays", "math", "sorting", "heaps"]),
    ("mobile", &["arrays", "strings", "trees"]),
    ("devops", &["strings", "intervals", "greedy"]),
    ("security", &["strings", "math", "bit-manipulation"]),
];

/// Generic topic set used when the job text and tags imply nothing.
const DEFAULT_TOPICS: &[&str] = &["arrays", "strings", "dynamic-programming"];

const JITTER_RANGE: f64 = 0.75;
const FUNCTIONAL_BONUS_STEP: f64 = 0.5;
const FUNCTIONAL_BONUS_CAP: f64 = 1.5;
const KEYWORD_BONUS_STEP: f64 = 0.75;
const KEYWORD_BONUS_CAP: f64 = 1.5;

/// Derives the fixed selection seed from the job identity.
pub fn selection_seed(job: &JobContext) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(job.title.as_bytes());
    hasher.update([0x1f]);
    hasher.update(job.company.as_bytes());
    hasher.update([0x1f]);
    hasher.update(job.description.as_bytes());
    let digest = hasher.finalize();
    u64::from_be_bytes(digest[..8].try_into().expect("SHA-256 digest is 32 bytes"))
}

/// The topic set this job should practice: job-text keyword matches unioned
/// with hints from the functional tags, defaulting to a generic set.
pub(crate) fn desired_topics(blob: &str, role: &RoleContext) -> BTreeSet<String> {
    let mut topics: BTreeSet<String> = TEXT_TOPIC_KEYWORDS
        .iter()
        .filter(|(fragment, _)| blob.contains(fragment))
        .map(|(_, topic)| (*topic).to_string())
        .collect();

    for (tag, hints) in FUNCTIONAL_TOPIC_HINTS {
        if role.functional_tags.contains(*tag) {
            topics.extend(hints.iter().map(|h| (*h).to_string()));
        }
    }

    if topics.is_empty() {
        topics.extend(DEFAULT_TOPICS.iter().map(|t| (*t).to_string()));
    }
    topics
}

fn score_problem(
    problem: &CatalogProblem,
    desired: &BTreeSet<String>,
    role: &RoleContext,
    blob: &str,
) -> f64 {
    let overlap = problem
        .topics
        .iter()
        .filter(|t| desired.contains(*t))
        .count() as f64;
    let mut score = 2.0 * overlap;

    let tier_gap = (problem.difficulty.rank() - role.target_level.rank()).abs();
    score += match tier_gap {
        0 => 2.5,
        1 => 1.0,
        _ => 0.0,
    };

    let mut functional = 0.0;
    for (tag, hints) in FUNCTIONAL_TOPIC_HINTS {
        if role.functional_tags.contains(*tag)
            && hints.iter().any(|h| problem.topics.contains(*h))
        {
            functional += FUNCTIONAL_BONUS_STEP;
        }
    }
    score += functional.min(FUNCTIONAL_BONUS_CAP);

    let mut keyword = 0.0;
    for token in problem.slug.split('-').filter(|t| t.len() > 3) {
        if blob.contains(token) {
            keyword += KEYWORD_BONUS_STEP;
        }
    }
    score += keyword.min(KEYWORD_BONUS_CAP);

    score
}

/// Ranks the catalog for a job and returns exact-count selections.
///
/// Scores every problem, adds seeded jitter to break near-ties, sorts
/// descending (slug as the total-order tiebreaker), then takes
/// `primary_count` followed by `suggested_count`. A catalog smaller than
/// the requested counts is padded by cycling the ranked pool so exact
/// counts are always returned.
pub fn select(
    job: &JobContext,
    role: &RoleContext,
    catalog: &Catalog,
    primary_count: usize,
    suggested_count: usize,
) -> SelectionResult {
    let seed = selection_seed(job);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let blob = job.text_blob();
    let desired = desired_topics(&blob, role);

    debug!(seed, ?desired, "ranking catalog for job");

    let mut ranked: Vec<(f64, &CatalogProblem)> = catalog
        .problems()
        .iter()
        .map(|p| {
            let jitter: f64 = rng.random_range(0.0..JITTER_RANGE);
            (score_problem(p, &desired, role, &blob) + jitter, p)
        })
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.slug.cmp(&b.1.slug)));

    if ranked.is_empty() {
        return SelectionResult {
            primary: Vec::new(),
            suggested: Vec::new(),
        };
    }

    let pick = |offset: usize, count: usize| -> Vec<CatalogProblem> {
        (0..count)
            .map(|i| ranked[(offset + i) % ranked.len()].1.clone())
            .collect()
    };

    SelectionResult {
        primary: pick(0, primary_count),
        suggested: pick(primary_count, suggested_count),
    }
}
