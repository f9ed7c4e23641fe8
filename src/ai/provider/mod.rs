//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait for plain-text generation and the closed
//! set of supported providers. Providers return `Result<String>`; the router
//! maps any failure to a deterministic mock-tagged string so callers never
//! see an error.
//!
//! ## Modules
//!
//! - `router`: Task-based routing with availability snapshot and fallback
//! - `openai`, `gemini`, `claude`: per-provider call strategies

mod claude;
mod gemini;
mod openai;
mod router;

pub use claude::ClaudeProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use router::{ProviderRouter, ProviderRouterBuilder, task_preference};

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ProviderSettings;
use crate::types::{PilotError, Result};

/// Shared provider type for concurrent access from multiple call sites.
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Identifiers
// =============================================================================

/// The closed set of supported text-generation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenAi,
    Gemini,
    Claude,
}

impl ProviderId {
    /// All supported providers, in declaration order.
    pub const ALL: [ProviderId; 3] = [ProviderId::OpenAi, ProviderId::Gemini, ProviderId::Claude];

    /// Stable symbolic name ("openai", "gemini", "claude").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::Claude => "claude",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn credential_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Gemini => "GOOGLE_API_KEY",
            Self::Claude => "ANTHROPIC_API_KEY",
        }
    }

    /// Prefix of the deterministic placeholder returned when this provider's
    /// call strategy cannot produce a real response.
    pub fn mock_tag(&self) -> &'static str {
        match self {
            Self::OpenAi => "[openai mock] ",
            Self::Gemini => "[gemini mock] ",
            Self::Claude => "[claude mock] ",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// Per-provider API keys, snapshotted once.
///
/// The router reads the environment exactly once at construction; a provider
/// without a key at that point stays unavailable for the lifetime of the
/// router instance. Keys are converted to `SecretString` by each provider.
#[derive(Clone, Default)]
pub struct Credentials {
    openai: Option<String>,
    gemini: Option<String>,
    claude: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai", &self.openai.as_ref().map(|_| "[REDACTED]"))
            .field("gemini", &self.gemini.as_ref().map(|_| "[REDACTED]"))
            .field("claude", &self.claude.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Credentials {
    /// Snapshot credentials from the process environment.
    pub fn from_env() -> Self {
        Self {
            openai: read_key(ProviderId::OpenAi),
            gemini: read_key(ProviderId::Gemini),
            claude: read_key(ProviderId::Claude),
        }
    }

    /// Set a key explicitly (embedders and tests).
    pub fn with_key(mut self, id: ProviderId, key: impl Into<String>) -> Self {
        let slot = match id {
            ProviderId::OpenAi => &mut self.openai,
            ProviderId::Gemini => &mut self.gemini,
            ProviderId::Claude => &mut self.claude,
        };
        *slot = Some(key.into());
        self
    }

    /// Key for a provider, if present.
    pub fn get(&self, id: ProviderId) -> Option<&str> {
        match id {
            ProviderId::OpenAi => self.openai.as_deref(),
            ProviderId::Gemini => self.gemini.as_deref(),
            ProviderId::Claude => self.claude.as_deref(),
        }
    }

    /// Whether a non-empty key is present for a provider.
    pub fn has(&self, id: ProviderId) -> bool {
        self.get(id).is_some()
    }
}

fn read_key(id: ProviderId) -> Option<String> {
    std::env::var(id.credential_var())
        .ok()
        .filter(|v| !v.is_empty())
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// A text-generation call strategy for one provider.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for a prompt.
    ///
    /// Returns the generated text with surrounding whitespace trimmed.
    /// Implementations report failures as `Err`; they never panic.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Construct the call strategy for a provider from its key and settings.
pub fn create_provider(
    id: ProviderId,
    api_key: &str,
    settings: &ProviderSettings,
) -> Result<SharedProvider> {
    match id {
        ProviderId::OpenAi => Ok(Arc::new(OpenAiProvider::new(api_key, settings)?)),
        ProviderId::Gemini => Ok(Arc::new(GeminiProvider::new(api_key, settings)?)),
        ProviderId::Claude => Ok(Arc::new(ClaudeProvider::new(api_key, settings)?)),
    }
}

/// Validate an endpoint override.
///
/// Only http/https schemes are accepted; a trailing slash is stripped for
/// consistent URL joining.
pub(crate) fn validate_api_base(endpoint: &str) -> Result<String> {
    let url = url::Url::parse(endpoint)
        .map_err(|e| PilotError::Config(format!("Invalid endpoint URL '{}': {}", endpoint, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(PilotError::Config(format!(
            "Endpoint must use http or https scheme, got: {}",
            url.scheme()
        )));
    }

    let mut result = url.to_string();
    if result.ends_with('/') {
        result.pop();
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_names() {
        assert_eq!(ProviderId::OpenAi.as_str(), "openai");
        assert_eq!(ProviderId::Gemini.as_str(), "gemini");
        assert_eq!(ProviderId::Claude.as_str(), "claude");
    }

    #[test]
    fn test_mock_tags_are_distinct() {
        let tags: Vec<&str> = ProviderId::ALL.iter().map(|id| id.mock_tag()).collect();
        for (i, tag) in tags.iter().enumerate() {
            assert!(tag.starts_with('['));
            assert!(tag.ends_with("mock] "));
            for other in &tags[i + 1..] {
                assert_ne!(tag, other);
            }
        }
    }

    #[test]
    fn test_credentials_with_key() {
        let creds = Credentials::default().with_key(ProviderId::Claude, "sk-test");
        assert!(creds.has(ProviderId::Claude));
        assert!(!creds.has(ProviderId::OpenAi));
        assert_eq!(creds.get(ProviderId::Claude), Some("sk-test"));
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::default().with_key(ProviderId::OpenAi, "sk-secret");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_validate_api_base() {
        assert_eq!(
            validate_api_base("https://api.example.com/v1/").expect("valid"),
            "https://api.example.com/v1"
        );
        assert!(validate_api_base("ftp://api.example.com").is_err());
        assert!(validate_api_base("not a url").is_err());
    }
}
