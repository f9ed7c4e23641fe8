//! JobPilot - Task-Based LLM Provider Routing
//!
//! Routes text-generation requests among hosted LLM providers (OpenAI,
//! Gemini, Claude) based on a task label, with deterministic degradation:
//! a provider failure becomes a mock-tagged placeholder and a fully
//! unavailable task becomes a fixed sentinel string. `route` never fails,
//! so pipelines embedding the router need no error handling around
//! generation calls.
//!
//! ## Core Behavior
//!
//! - **Availability snapshot**: credentials are read once at router
//!   construction and never rechecked
//! - **Task preference**: a static table orders providers per task label
//! - **Short-circuit**: the first available provider is invoked and its
//!   outcome returned; later preferences are never consulted
//! - **Prefix-tagged degradation**: `"[<provider> mock] "` and
//!   `"[no provider available] "` make failure paths machine-detectable
//!
//! ## Quick Start
//!
//! ```ignore
//! use jobpilot::{ProviderRouter, RouterConfig};
//!
//! let config = RouterConfig::from_env();
//! let router = ProviderRouter::from_env(&config);
//! let reply = router.route("Summarize my experience", "resume").await;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: provider abstraction and the task router
//! - [`config`]: per-provider settings with env overrides
//! - [`worker`]: higher-level generation tasks (recruiter outreach)
//! - [`cli`]: command implementations for the `jobpilot` binary

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod types;
pub mod worker;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{ProviderSettings, RouterConfig};

// Error Types
pub use types::error::{ErrorCategory, ErrorClassifier, LlmError, PilotError, Result};

// Providers and Routing
pub use ai::provider::{
    ClaudeProvider, Credentials, GeminiProvider, LlmProvider, OpenAiProvider, ProviderId,
    ProviderRouter, ProviderRouterBuilder, SharedProvider, task_preference,
};

// Workers
pub use worker::recruiter::{CandidateProfile, JobPosting, Tone, generate_message};
