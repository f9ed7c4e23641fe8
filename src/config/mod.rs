//! Configuration Management
//!
//! Per-provider settings with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Environment variables (JOBPILOT_<PROVIDER>_*)
//! 3. Programmatic overrides by the embedding application (highest priority)
//!
//! Credentials are not configuration; they are snapshotted separately at
//! router construction (see [`crate::ai::provider::Credentials`]). The
//! structs here are serde-compatible so hosts can deserialize them from
//! whatever config source they own.

use serde::{Deserialize, Serialize};

use crate::ai::provider::ProviderId;
use crate::constants::{generation, network};

/// Settings for a single provider.
///
/// `None` fields fall back to the provider's built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Model name (provider-specific)
    #[serde(default)]
    pub model: Option<String>,
    /// API base URL (for custom endpoints)
    #[serde(default)]
    pub api_base: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_timeout_secs() -> u64 {
    network::DEFAULT_TIMEOUT_SECS
}

fn default_max_tokens() -> usize {
    generation::DEFAULT_MAX_TOKENS
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            model: None,
            api_base: None,
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Router-wide configuration: one settings block per supported provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub openai: ProviderSettings,
    pub gemini: ProviderSettings,
    pub claude: ProviderSettings,
}

impl RouterConfig {
    /// Build configuration from defaults plus `JOBPILOT_*` env overrides.
    ///
    /// Recognized variables, per provider prefix (OPENAI, GEMINI, CLAUDE):
    /// `JOBPILOT_<PREFIX>_MODEL`, `JOBPILOT_<PREFIX>_API_BASE`,
    /// `JOBPILOT_<PREFIX>_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        apply_env(&mut config.openai, "OPENAI");
        apply_env(&mut config.gemini, "GEMINI");
        apply_env(&mut config.claude, "CLAUDE");
        config
    }

    /// Settings block for a provider.
    pub fn for_provider(&self, id: ProviderId) -> &ProviderSettings {
        match id {
            ProviderId::OpenAi => &self.openai,
            ProviderId::Gemini => &self.gemini,
            ProviderId::Claude => &self.claude,
        }
    }
}

fn apply_env(settings: &mut ProviderSettings, prefix: &str) {
    if let Ok(model) = std::env::var(format!("JOBPILOT_{prefix}_MODEL"))
        && !model.is_empty()
    {
        settings.model = Some(model);
    }
    if let Ok(base) = std::env::var(format!("JOBPILOT_{prefix}_API_BASE"))
        && !base.is_empty()
    {
        settings.api_base = Some(base);
    }
    if let Ok(timeout) = std::env::var(format!("JOBPILOT_{prefix}_TIMEOUT_SECS"))
        && let Ok(secs) = timeout.parse::<u64>()
    {
        settings.timeout_secs = secs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ProviderSettings::default();
        assert!(settings.model.is_none());
        assert!(settings.api_base.is_none());
        assert_eq!(settings.timeout_secs, network::DEFAULT_TIMEOUT_SECS);
        assert_eq!(settings.max_tokens, generation::DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_deserialize_partial_settings() {
        let settings: ProviderSettings =
            serde_json::from_str(r#"{"model": "gpt-4o"}"#).expect("valid settings");
        assert_eq!(settings.model.as_deref(), Some("gpt-4o"));
        assert_eq!(settings.timeout_secs, network::DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: RouterConfig =
            serde_json::from_str(r#"{"gemini": {"timeout_secs": 10}}"#).expect("valid config");
        assert_eq!(config.gemini.timeout_secs, 10);
        assert_eq!(config.openai.timeout_secs, network::DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_for_provider() {
        let mut config = RouterConfig::default();
        config.claude.model = Some("claude-3-opus-20240229".to_string());
        assert_eq!(
            config.for_provider(ProviderId::Claude).model.as_deref(),
            Some("claude-3-opus-20240229")
        );
        assert!(config.for_provider(ProviderId::OpenAi).model.is_none());
    }
}
