//! Caller-supplied inputs for plan generation.
//!
//! Both records are owned by the caller's persistence layer and treated as
//! read-only here. The engine never mutates or retains them.

use serde::{Deserialize, Serialize};

/// A job posting the candidate is preparing for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobContext {
    /// Job title as posted.
    pub title: String,
    /// Hiring company name.
    pub company: String,
    /// Free-text job description.
    pub description: String,
    /// Skill names the posting requires.
    #[serde(default)]
    pub required_skills: Vec<String>,
}

impl JobContext {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            description: description.into(),
            required_skills: Vec::new(),
        }
    }

    /// Builder method to attach required skills.
    pub fn with_required_skills(mut self, skills: Vec<String>) -> Self {
        self.required_skills = skills;
        self
    }

    /// Lowercased concatenation of title and description, used by the
    /// classifier and selector for keyword matching.
    pub(crate) fn text_blob(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

/// The candidate the plan is personalized for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateContext {
    /// Free-text background summary.
    pub summary: String,
    /// Skills the candidate already has.
    #[serde(default)]
    pub known_skills: Vec<String>,
}

impl CandidateContext {
    pub fn new(summary: impl Into<String>, known_skills: Vec<String>) -> Self {
        Self {
            summary: summary.into(),
            known_skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_blob_is_lowercase() {
        let job = JobContext::new("Senior Rust Engineer", "Acme", "Build SERVICES");
        let blob = job.text_blob();
        assert!(blob.contains("senior rust engineer"));
        assert!(blob.contains("build services"));
    }

    #[test]
    fn test_job_context_deserializes_without_skills() {
        let job: JobContext = serde_json::from_str(
            r#"{"title": "Engineer", "company": "Acme", "description": "code"}"#,
        )
        .expect("should deserialize");
        assert!(job.required_skills.is_empty());
    }
}
