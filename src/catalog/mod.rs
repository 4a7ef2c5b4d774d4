//! Curated coding-challenge catalog.
//!
//! A static, versioned pool of challenge descriptors. Engine logic is
//! independent of catalog size; the data lives in [`data`] and is loaded
//! once per process. Topics are not stored in the table but inferred from
//! each slug through a keyword lookup at load time, which doubles as the
//! inference cache.

mod data;

use std::collections::BTreeSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::role::TargetLevel;

/// Difficulty bucket of a catalog problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Ordinal rank aligned with [`TargetLevel::rank`] for adjacency checks.
    pub fn rank(&self) -> i8 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// The catalog bucket that matches a target tier exactly.
    pub fn for_target(level: TargetLevel) -> Self {
        match level {
            TargetLevel::Entry => Difficulty::Easy,
            TargetLevel::Mid => Difficulty::Medium,
            TargetLevel::Senior => Difficulty::Hard,
        }
    }

    /// Lenient parse used on model-produced entries; unrecognized text maps
    /// to Medium.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "easy" | "entry" | "beginner" => Difficulty::Easy,
            "hard" | "senior" | "advanced" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

/// One fixed coding-challenge descriptor from the curated pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProblem {
    pub slug: String,
    pub title: String,
    pub difficulty: Difficulty,
    /// Topic set inferred from the slug at catalog load.
    pub topics: BTreeSet<String>,
}

/// The loaded, versioned problem table.
#[derive(Debug)]
pub struct Catalog {
    version: &'static str,
    problems: Vec<CatalogProblem>,
}

impl Catalog {
    /// Returns the process-wide built-in catalog, constructed on first use.
    pub fn builtin() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            let problems = data::PROBLEM_ROWS
                .iter()
                .map(|(slug, title, difficulty)| CatalogProblem {
                    slug: (*slug).to_string(),
                    title: (*title).to_string(),
                    difficulty: *difficulty,
                    topics: infer_topics(slug),
                })
                .collect();
            Catalog {
                version: data::CATALOG_VERSION,
                problems,
            }
        })
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn problems(&self) -> &[CatalogProblem] {
        &self.problems
    }

    pub fn find(&self, slug: &str) -> Option<&CatalogProblem> {
        self.problems.iter().find(|p| p.slug == slug)
    }

    /// Problems in one difficulty bucket, in table order.
    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&CatalogProblem> {
        self.problems
            .iter()
            .filter(|p| p.difficulty == difficulty)
            .collect()
    }

    /// Canonical judge link for a problem slug.
    pub fn reference_link(slug: &str) -> String {
        format!("https://leetcode.com/problems/{}/", slug)
    }
}

/// Keyword fragments mapped to topics. A slug collects every topic whose
/// fragment it contains.
const SLUG_TOPIC_KEYWORDS: &[(&str, &str)] = &[
    ("array", "arrays"),
    ("subarray", "arrays"),
    ("duplicate", "arrays"),
    ("product", "arrays"),
    ("consecutive", "arrays"),
    ("interval", "intervals"),
    ("meeting", "intervals"),
    ("merge", "sorting"),
    ("sort", "sorting"),
    ("colors", "sorting"),
    ("search", "searching"),
    ("find", "searching"),
    ("position", "searching"),
    ("string", "strings"),
    ("substring", "strings"),
    ("palindrome", "strings"),
    ("anagram", "strings"),
    ("word", "strings"),
    ("letter", "strings"),
    ("parentheses", "stacks"),
    ("stack", "stacks"),
    ("histogram", "stacks"),
    ("temperatures", "stacks"),
    ("polish", "stacks"),
    ("queue", "queues"),
    ("list", "linked-lists"),
    ("cycle", "linked-lists"),
    ("tree", "trees"),
    ("traversal", "trees"),
    ("ancestor", "trees"),
    ("trie", "trees"),
    ("graph", "graphs"),
    ("course", "graphs"),
    ("island", "graphs"),
    ("ladder", "graphs"),
    ("alien", "graphs"),
    ("network", "graphs"),
    ("accounts", "graphs"),
    ("kth", "heaps"),
    ("top-k", "heaps"),
    ("closest", "heaps"),
    ("median", "heaps"),
    ("frequent", "heaps"),
    ("climbing", "dynamic-programming"),
    ("robber", "dynamic-programming"),
    ("coin", "dynamic-programming"),
    ("subsequence", "dynamic-programming"),
    ("break", "dynamic-programming"),
    ("edit-distance", "dynamic-programming"),
    ("regular-expression", "dynamic-programming"),
    ("jump", "greedy"),
    ("gas", "greedy"),
    ("partition", "greedy"),
    ("stock", "greedy"),
    ("sum", "math"),
    ("number", "math"),
    ("integer", "math"),
    ("digit", "math"),
    ("power", "math"),
    ("add", "math"),
    ("missing", "math"),
    ("design", "design"),
    ("cache", "design"),
    ("stream", "design"),
    ("autocomplete", "design"),
    ("key-value", "design"),
    ("twitter", "design"),
    ("counter", "design"),
    ("snapshot", "design"),
    ("serialize", "design"),
    ("average", "design"),
    ("window", "sliding-window"),
    ("water", "two-pointers"),
    ("container", "two-pointers"),
    ("squares", "two-pointers"),
    ("permutation", "backtracking"),
    ("combination", "backtracking"),
    ("subset", "backtracking"),
    ("queens", "backtracking"),
    ("bit", "bit-manipulation"),
    ("single-number", "bit-manipulation"),
    ("matrix", "matrices"),
    ("rectangle", "matrices"),
];

/// Infers the topic set for a slug. Slugs matching no fragment get the
/// catch-all "general" topic so every problem carries at least one.
pub(crate) fn infer_topics(slug: &str) -> BTreeSet<String> {
    let mut topics: BTreeSet<String> = SLUG_TOPIC_KEYWORDS
        .iter()
        .filter(|(fragment, _)| slug.contains(fragment))
        .map(|(_, topic)| (*topic).to_string())
        .collect();
    if topics.is_empty() {
        topics.insert("general".to_string());
    }
    topics
}

/// Lowercases a title into a slug-shaped identifier. Used when a model
/// entry arrives without a usable slug.
pub(crate) fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_dash = true;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
