//! The preparation plan aggregate.
//!
//! A [`PrepPlan`] is created fresh per request and immutable once returned;
//! the engine retains no reference to it. All numeric fields are unsigned,
//! so the non-negativity guarantee holds by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::CatalogProblem;
use crate::error::EngineError;
use crate::role::{RoleContext, TargetLevel};

/// Whether any section had to degrade to its deterministic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    /// Every section used the model successfully.
    Ai,
    /// At least one section substituted its fallback payload.
    Fallback,
}

/// Snapshot of the role classification the plan was built for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleProfile {
    pub is_technical: bool,
    pub functional_tags: Vec<String>,
    pub target_level: TargetLevel,
}

impl From<&RoleContext> for RoleProfile {
    fn from(role: &RoleContext) -> Self {
        Self {
            is_technical: role.is_technical,
            functional_tags: role.functional_tags.iter().cloned().collect(),
            target_level: role.target_level,
        }
    }
}

/// One coding exercise in the plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodingChallenge {
    /// Stable content-derived identifier.
    pub id: String,
    pub slug: String,
    pub title: String,
    pub difficulty: String,
    pub summary: String,
    pub topics: Vec<String>,
    pub estimated_minutes: u32,
    /// Why this exercise matters for the target company.
    pub company_context: String,
    /// Judge links; never empty after assembly.
    pub reference_links: Vec<String>,
}

/// A system-design exercise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignScenario {
    pub id: String,
    pub title: String,
    pub prompt: String,
    pub focus_points: Vec<String>,
    pub estimated_minutes: u32,
}

/// A discussion-style case study.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseStudy {
    pub id: String,
    pub title: String,
    pub scenario: String,
    pub discussion_points: Vec<String>,
}

/// A knowledge question with a model answer outline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalQuestion {
    pub id: String,
    pub question: String,
    pub answer_outline: String,
    pub topic: String,
}

/// A reusable problem-solving framework.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolutionFramework {
    pub id: String,
    pub name: String,
    pub steps: Vec<String>,
    pub applies_to: String,
}

/// Whiteboarding warm-up guidance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhiteboardingPractice {
    pub warmup: String,
    pub core_exercise: String,
    pub tips: Vec<String>,
}

/// Complete output bundle of the generation engine for one job/candidate
/// pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepPlan {
    pub tech_stack: Vec<String>,
    pub focus_areas: Vec<String>,
    pub coding_challenges: Vec<CodingChallenge>,
    pub suggested_challenges: Vec<CodingChallenge>,
    pub system_design_scenarios: Vec<DesignScenario>,
    pub case_studies: Vec<CaseStudy>,
    pub technical_questions: Vec<TechnicalQuestion>,
    pub solution_frameworks: Vec<SolutionFramework>,
    pub whiteboarding_practice: WhiteboardingPractice,
    pub real_world_alignment: Vec<String>,
    pub role_profile: RoleProfile,
    pub source: PlanSource,
    pub generated_at: DateTime<Utc>,
    pub catalog_version: String,
}

impl PrepPlan {
    /// Checks the structural guarantees the engine promises its callers:
    /// unique coding slugs, full coverage of the selected problems, and a
    /// reference link on every coding and suggested entry.
    pub fn verify_invariants(&self, expected_primary: &[CatalogProblem]) -> Result<(), EngineError> {
        let mut seen = BTreeSet::new();
        for entry in &self.coding_challenges {
            if !seen.insert(entry.slug.clone()) {
                return Err(EngineError::InvariantViolation(format!(
                    "duplicate coding challenge slug '{}'",
                    entry.slug
                )));
            }
        }

        for problem in expected_primary {
            if !seen.contains(&problem.slug) {
                return Err(EngineError::InvariantViolation(format!(
                    "selected problem '{}' missing from coding challenges",
                    problem.slug
                )));
            }
        }

        for entry in self.coding_challenges.iter().chain(&self.suggested_challenges) {
            if entry.reference_links.is_empty() {
                return Err(EngineError::InvariantViolation(format!(
                    "challenge '{}' carries no reference link",
                    entry.slug
                )));
            }
        }

        Ok(())
    }
}
