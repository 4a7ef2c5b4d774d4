//! Role context classification.
//!
//! Derives technical/non-technical status, functional sub-domain tags, and
//! the target difficulty tier from a job posting. Pure keyword matching over
//! a lowercase blob of title + description; no I/O.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::context::JobContext;

/// Difficulty tier the plan should target, derived from seniority wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLevel {
    Entry,
    Mid,
    Senior,
}

impl TargetLevel {
    /// Ordinal rank used for adjacency comparisons against catalog
    /// difficulty tiers (Entry=0, Mid=1, Senior=2).
    pub fn rank(&self) -> i8 {
        match self {
            TargetLevel::Entry => 0,
            TargetLevel::Mid => 1,
            TargetLevel::Senior => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetLevel::Entry => "entry",
            TargetLevel::Mid => "mid",
            TargetLevel::Senior => "senior",
        }
    }
}

/// Derived classification of a job posting.
///
/// Computed once per generation request; every downstream component reads
/// the same instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleContext {
    /// Whether the role warrants coding-interview preparation.
    pub is_technical: bool,
    /// Functional sub-domains detected in the posting (backend, data, ...).
    pub functional_tags: BTreeSet<String>,
    /// Difficulty tier the plan should target.
    pub target_level: TargetLevel,
}

/// Titles that mark a role as technical even when paired with
/// otherwise non-technical wording ("Technical Program Manager").
const ENGINEERING_TITLE_TOKENS: &[&str] = &[
    "engineer",
    "developer",
    "programmer",
    "technical",
    "scientist",
    "swe",
    "sde",
    "sre",
    "architect",
];

const NON_TECHNICAL_TITLE_TOKENS: &[&str] = &[
    "manager",
    "recruiter",
    "designer",
    "marketing",
    "sales",
    "account executive",
    "coordinator",
    "copywriter",
    "human resources",
    "people operations",
    "customer success",
    "support specialist",
];

const LANGUAGE_TOKENS: &[&str] = &[
    "python",
    "java",
    "typescript",
    "javascript",
    "golang",
    "rust",
    "c++",
    "c#",
    "ruby",
    "kotlin",
    "swift",
    "scala",
    "elixir",
    "sql",
    "general-purpose language",
];

const BUILD_VERB_TOKENS: &[&str] = &[
    "build",
    "implement",
    "develop",
    "deploy",
    "debug",
    "ship",
    "maintain",
    "optimize",
    "integrate",
    "write code",
];

const SENIOR_TOKENS: &[&str] = &["senior", "staff", "principal", "lead", "architect", "sr."];

const ENTRY_TOKENS: &[&str] = &[
    "intern",
    "junior",
    "associate",
    "entry level",
    "entry-level",
    "new grad",
    "graduate",
];

/// Functional keyword groups. A single keyword hit assigns the tag.
const FUNCTIONAL_GROUPS: &[(&str, &[&str])] = &[
    (
        "backend",
        &[
            "backend",
            "back-end",
            "back end",
            "api",
            "microservice",
            "server-side",
            "distributed system",
            "database",
            "scalab",
            "grpc",
        ],
    ),
    (
        "frontend",
        &[
            "frontend",
            "front-end",
            "front end",
            "react",
            "angular",
            "vue",
            "css",
            "browser",
            "web application",
        ],
    ),
    (
        "data",
        &[
            "data engineer",
            "data pipeline",
            "etl",
            "machine learning",
            "analytics",
            "spark",
            "warehouse",
            "data science",
        ],
    ),
    (
        "mobile",
        &[
            "mobile",
            "ios",
            "android",
            "react native",
            "flutter",
        ],
    ),
    (
        "devops",
        &[
            "devops",
            "kubernetes",
            "docker",
            "terraform",
            "ci/cd",
            "infrastructure",
            "site reliability",
            "observability",
        ],
    ),
    (
        "security",
        &[
            "security",
            "appsec",
            "penetration",
            "vulnerability",
            "cryptograph",
            "threat",
        ],
    ),
];

/// Classifies a job posting into a [`RoleContext`].
///
/// Tie rule: a technical-title token beats a non-technical one, so
/// "Technical Program Manager" resolves to technical. A non-technical title
/// with no technical signal anywhere forces `is_technical = false` and
/// clears the functional tags.
pub fn classify(job: &JobContext) -> RoleContext {
    let blob = job.text_blob();
    let hit = |tokens: &[&str]| tokens.iter().any(|t| blob.contains(t));

    let technical_title = hit(ENGINEERING_TITLE_TOKENS);
    let non_technical_title = hit(NON_TECHNICAL_TITLE_TOKENS);
    let builds_with_language = hit(LANGUAGE_TOKENS) && hit(BUILD_VERB_TOKENS);

    let mut functional_tags: BTreeSet<String> = FUNCTIONAL_GROUPS
        .iter()
        .filter(|(_, keywords)| hit(keywords))
        .map(|(tag, _)| (*tag).to_string())
        .collect();

    let is_technical = if non_technical_title && !technical_title && !builds_with_language {
        functional_tags.clear();
        false
    } else {
        technical_title || builds_with_language || !functional_tags.is_empty()
    };

    let target_level = if hit(SENIOR_TOKENS) {
        TargetLevel::Senior
    } else if hit(ENTRY_TOKENS) {
        TargetLevel::Entry
    } else {
        TargetLevel::Mid
    };

    RoleContext {
        is_technical,
        functional_tags,
        target_level,
    }
}
