//! AI Integration Layer
//!
//! Provider abstraction and task-based routing over hosted LLM APIs.

pub mod provider;

pub use provider::{
    ClaudeProvider, Credentials, GeminiProvider, LlmProvider, OpenAiProvider, ProviderId,
    ProviderRouter, ProviderRouterBuilder, SharedProvider, task_preference,
};
