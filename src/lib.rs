//! prep-engine: interview preparation plan generation.
//!
//! This library builds a personalized technical-interview preparation plan
//! for a (job, candidate) pair by combining deterministic selection from a
//! curated challenge catalog, timeout-bounded generation against an
//! external language model, resilient parsing of the model's structured
//! output, and a fully deterministic offline fallback.
//!
//! # Example
//!
//! ```ignore
//! use prep_engine::{CandidateContext, EngineConfig, JobContext, PrepEngine};
//!
//! let config = EngineConfig::from_env()?;
//! let engine = PrepEngine::from_config(config)?;
//!
//! let job = JobContext::new("Backend Engineer", "Acme", "Build scalable APIs");
//! let candidate = CandidateContext::default();
//!
//! let plan = engine.generate(&job, &candidate).await?;
//! assert!(!plan.coding_challenges.is_empty());
//! ```
//!
//! The offline entrypoint produces a structurally identical plan with no
//! network I/O:
//!
//! ```
//! use prep_engine::{CandidateContext, EngineConfig, JobContext, PrepEngine};
//!
//! let engine = PrepEngine::offline(EngineConfig::default());
//! let job = JobContext::new("Backend Engineer", "Acme", "Build scalable APIs");
//! let plan = engine.generate_fallback_only(&job, &CandidateContext::default());
//! assert_eq!(plan.coding_challenges.len(), 5);
//! ```

// Core modules
pub mod catalog;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod llm;
pub mod parser;
pub mod plan;
pub mod role;
pub mod selector;

// Internal machinery
mod assembler;
mod coverage;
mod fallback;
mod prompts;
mod sections;

// Re-export the primary API surface
pub use catalog::{Catalog, CatalogProblem, Difficulty};
pub use config::{ConfigError, EngineConfig};
pub use context::{CandidateContext, JobContext};
pub use engine::PrepEngine;
pub use error::{EngineError, LlmError};
pub use llm::{ChatClient, GenerationRequest, GenerationResponse, LlmProvider, Message};
pub use parser::{parse_model_json, ExtractError};
pub use plan::{CodingChallenge, PlanSource, PrepPlan, RoleProfile};
pub use role::{classify, RoleContext, TargetLevel};
pub use selector::{select, selection_seed, SelectionResult};
