//! The preparation-plan engine.
//!
//! One logical control flow per request: classify the role once, select
//! catalog problems deterministically, run the three section generators
//! sequentially against one shared deadline, enforce coverage, assemble.
//! No state is shared across concurrent requests; the only process-wide
//! resource is the lazily-built model client handle.

use std::sync::Arc;

use tracing::info;

use crate::assembler::{self, SectionPayloads};
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::context::{CandidateContext, JobContext};
use crate::error::EngineError;
use crate::llm::{shared_client, LlmProvider};
use crate::plan::{PlanSource, PrepPlan};
use crate::sections::{self, Deadline, ModelGate, SectionOutcome};
use crate::{fallback, role, selector};

/// Builds personalized interview-preparation plans.
pub struct PrepEngine {
    config: EngineConfig,
    catalog: &'static Catalog,
    llm: Option<Arc<dyn LlmProvider>>,
}

impl PrepEngine {
    /// Creates an engine with an explicitly injected model provider.
    ///
    /// This is the seam tests and alternative transports plug into; the
    /// engine issues every model call through the given provider.
    pub fn new(config: EngineConfig, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            config,
            catalog: Catalog::builtin(),
            llm: Some(provider),
        }
    }

    /// Creates an engine backed by the process-wide chat client.
    ///
    /// # Errors
    ///
    /// Fails fast with [`crate::config::ConfigError::MissingApiKey`] when
    /// credentials are absent: callers wanting a network-free engine must
    /// say so via [`PrepEngine::offline`].
    pub fn from_config(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let client = shared_client(&config)?;
        Ok(Self {
            config,
            catalog: Catalog::builtin(),
            llm: Some(client),
        })
    }

    /// Creates an engine that never touches the network. Every section
    /// uses its deterministic fallback builder.
    pub fn offline(config: EngineConfig) -> Self {
        Self {
            config,
            catalog: Catalog::builtin(),
            llm: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generates a preparation plan for a job/candidate pair.
    ///
    /// Sections run sequentially under one wall-clock deadline fixed here;
    /// each model call gets the smaller of the per-call timeout and the
    /// remaining budget, and is skipped outright once the budget is gone.
    /// Transient model failures and unparsable output degrade sections to
    /// fallbacks; the returned plan is always schema-complete.
    ///
    /// # Errors
    ///
    /// Only configuration errors and internal invariant violations
    /// propagate. Model trouble never does.
    pub async fn generate(
        &self,
        job: &JobContext,
        candidate: &CandidateContext,
    ) -> Result<PrepPlan, EngineError> {
        let role = role::classify(job);
        let selection = selector::select(
            job,
            &role,
            self.catalog,
            self.config.primary_count,
            self.config.suggested_count,
        );
        let deadline = Deadline::starting_now(self.config.plan_budget);
        let gate = ModelGate {
            provider: self.llm.as_ref(),
            config: &self.config,
            deadline: &deadline,
        };

        let (summary, summary_outcome) =
            sections::summary::generate(&gate, job, candidate, &role).await;
        let (coding, coding_outcome) =
            sections::coding::generate(&gate, job, &role, &selection).await?;
        let (advanced, advanced_outcome) =
            sections::advanced::generate(&gate, job, &role).await;

        let outcomes = [summary_outcome, coding_outcome, advanced_outcome];
        let source = if outcomes.iter().all(SectionOutcome::used_model) {
            PlanSource::Ai
        } else {
            PlanSource::Fallback
        };

        let plan = assembler::assemble(
            SectionPayloads {
                summary,
                coding,
                advanced,
            },
            &role,
            source,
            self.catalog,
        );
        plan.verify_invariants(&selection.primary)?;

        info!(
            company = %job.company,
            source = ?plan.source,
            challenges = plan.coding_challenges.len(),
            "preparation plan assembled"
        );
        Ok(plan)
    }

    /// Builds a structurally identical plan with zero network calls.
    ///
    /// This is the offline/test entrypoint and the disaster-recovery path;
    /// it cannot fail and involves no I/O.
    pub fn generate_fallback_only(
        &self,
        job: &JobContext,
        candidate: &CandidateContext,
    ) -> PrepPlan {
        let role = role::classify(job);
        let selection = selector::select(
            job,
            &role,
            self.catalog,
            self.config.primary_count,
            self.config.suggested_count,
        );

        let plan = assembler::assemble(
            SectionPayloads {
                summary: fallback::summary_payload(job, candidate, &role),
                coding: fallback::coding_payload(&selection, job),
                advanced: fallback::advanced_payload(job, &role),
            },
            &role,
            PlanSource::Fallback,
            self.catalog,
        );
        debug_assert!(plan.verify_invariants(&selection.primary).is_ok());
        plan
    }
}
