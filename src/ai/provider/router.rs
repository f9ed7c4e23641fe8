//! Task-Based Provider Router
//!
//! Routes a generation request to the best available provider for a task
//! label and degrades deterministically when providers are missing or fail.
//!
//! ## Strategy
//!
//! 1. Look up the ordered provider preference for the task (empty if unknown)
//! 2. Skip providers without credentials (snapshotted at construction)
//! 3. Invoke the first available provider and return its outcome immediately:
//!    success text on `Ok`, the provider's mock-tagged placeholder on `Err`.
//!    Later providers in the list are never consulted once one is picked.
//! 4. If nothing in the list is available, return the sentinel placeholder
//!
//! `route` never returns an error; every fault is absorbed into a
//! prefix-tagged string so pipelines embedding the router need no error
//! handling around generation calls.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::{Credentials, ProviderId, SharedProvider, create_provider};
use crate::config::RouterConfig;
use crate::constants::routing::NO_PROVIDER_TAG;

/// Ordered provider preference for a task label.
///
/// Unknown labels map to an empty list, which routes to the sentinel.
pub fn task_preference(task: &str) -> &'static [ProviderId] {
    use ProviderId::{Claude, Gemini, OpenAi};
    match task {
        "resume" => &[OpenAi, Claude, Gemini],
        // Gemini first is a deliberate cost choice for outreach copy.
        "recruiter_message" => &[Gemini, OpenAi, Claude],
        "feedback" => &[Claude, OpenAi, Gemini],
        _ => &[],
    }
}

/// Task-based router over the supported providers.
///
/// Availability is snapshotted once at construction and never rechecked;
/// create a new router to pick up credential changes. The router holds no
/// mutable state after construction, so a shared instance is safe for
/// concurrent `route` calls without additional locking.
pub struct ProviderRouter {
    available: HashMap<ProviderId, bool>,
    providers: HashMap<ProviderId, SharedProvider>,
}

impl std::fmt::Debug for ProviderRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRouter")
            .field("available", &self.available)
            .field(
                "providers",
                &self.providers.keys().collect::<Vec<&ProviderId>>(),
            )
            .finish()
    }
}

impl ProviderRouter {
    /// Build a router from the process environment.
    ///
    /// Reads each provider's credential variable exactly once and constructs
    /// one owned client per credentialed provider.
    pub fn from_env(config: &RouterConfig) -> Self {
        Self::with_credentials(Credentials::from_env(), config)
    }

    /// Build a router from an explicit credential snapshot.
    ///
    /// A credentialed provider whose client cannot be constructed stays in
    /// the availability table; its requests degrade to mock output instead
    /// of falling through to later preferences.
    pub fn with_credentials(credentials: Credentials, config: &RouterConfig) -> Self {
        let mut available = HashMap::new();
        let mut providers = HashMap::new();

        for id in ProviderId::ALL {
            let Some(key) = credentials.get(id) else {
                available.insert(id, false);
                continue;
            };
            available.insert(id, true);

            match create_provider(id, key, config.for_provider(id)) {
                Ok(provider) => {
                    debug!(provider = %id, model = provider.model(), "Provider client initialized");
                    providers.insert(id, provider);
                }
                Err(err) => {
                    warn!(
                        provider = %id,
                        error = %err,
                        "Provider client could not be constructed; its requests will return mock output"
                    );
                }
            }
        }

        Self {
            available,
            providers,
        }
    }

    /// Builder for injecting provider implementations (embedders and tests).
    pub fn builder() -> ProviderRouterBuilder {
        ProviderRouterBuilder::new()
    }

    /// Whether a provider was credentialed at construction time.
    pub fn is_available(&self, id: ProviderId) -> bool {
        self.available.get(&id).copied().unwrap_or(false)
    }

    /// Route a prompt to the best available provider for `task`.
    ///
    /// Always returns a string:
    /// - the provider's trimmed response text on success
    /// - `"[<provider> mock] <prompt>"` when the chosen provider fails
    /// - `"[no provider available] <prompt>"` when nothing can serve the task
    pub async fn route(&self, prompt: &str, task: &str) -> String {
        for id in task_preference(task) {
            if !self.is_available(*id) {
                debug!(provider = %id, task, "Skipping provider (no credential)");
                continue;
            }

            let Some(provider) = self.providers.get(id) else {
                // Credentialed but no usable client.
                debug!(provider = %id, task, "No client for credentialed provider");
                return mock_reply(*id, prompt);
            };

            info!(provider = %id, task, "Routing generation request");

            return match provider.generate(prompt).await {
                Ok(text) => text,
                Err(err) => {
                    warn!(
                        provider = %id,
                        task,
                        error = %err,
                        "Provider call failed, returning mock output"
                    );
                    mock_reply(*id, prompt)
                }
            };
        }

        debug!(task, "No provider available");
        no_provider_reply(prompt)
    }
}

/// Deterministic placeholder for a failed provider call.
fn mock_reply(id: ProviderId, prompt: &str) -> String {
    format!("{}{}", id.mock_tag(), prompt)
}

/// Deterministic placeholder when no provider can serve a task.
fn no_provider_reply(prompt: &str) -> String {
    format!("{}{}", NO_PROVIDER_TAG, prompt)
}

/// Builder for routers with injected provider implementations.
pub struct ProviderRouterBuilder {
    available: HashMap<ProviderId, bool>,
    providers: HashMap<ProviderId, SharedProvider>,
}

impl ProviderRouterBuilder {
    pub fn new() -> Self {
        let mut available = HashMap::new();
        for id in ProviderId::ALL {
            available.insert(id, false);
        }
        Self {
            available,
            providers: HashMap::new(),
        }
    }

    /// Register a provider implementation and mark it available.
    pub fn with_provider(mut self, id: ProviderId, provider: SharedProvider) -> Self {
        self.available.insert(id, true);
        self.providers.insert(id, provider);
        self
    }

    /// Mark a provider as credentialed without a backing client.
    ///
    /// Routing attempts against it return its mock-tagged placeholder.
    pub fn mark_available(mut self, id: ProviderId) -> Self {
        self.available.insert(id, true);
        self
    }

    /// Build the router.
    pub fn build(self) -> ProviderRouter {
        ProviderRouter {
            available: self.available,
            providers: self.providers,
        }
    }
}

impl Default for ProviderRouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::LlmProvider;
    use crate::types::{PilotError, Result};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Arc;

    struct StaticProvider {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl LlmProvider for StaticProvider {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.reply.to_string())
        }

        fn name(&self) -> &str {
            self.name
        }

        fn model(&self) -> &str {
            "static-model"
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(PilotError::LlmApi("simulated outage".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }

        fn model(&self) -> &str {
            "failing-model"
        }
    }

    fn static_provider(name: &'static str, reply: &'static str) -> SharedProvider {
        Arc::new(StaticProvider { name, reply })
    }

    #[test]
    fn test_preference_tables() {
        use ProviderId::{Claude, Gemini, OpenAi};
        assert_eq!(task_preference("resume"), &[OpenAi, Claude, Gemini]);
        assert_eq!(
            task_preference("recruiter_message"),
            &[Gemini, OpenAi, Claude]
        );
        assert_eq!(task_preference("feedback"), &[Claude, OpenAi, Gemini]);
        assert!(task_preference("nonexistent_task").is_empty());
    }

    #[tokio::test]
    async fn test_first_preference_wins() {
        let router = ProviderRouter::builder()
            .with_provider(ProviderId::OpenAi, static_provider("openai", "from-openai"))
            .with_provider(ProviderId::Claude, static_provider("claude", "from-claude"))
            .build();

        assert_eq!(router.route("draft my resume", "resume").await, "from-openai");
    }

    #[tokio::test]
    async fn test_skips_unavailable_provider() {
        let router = ProviderRouter::builder()
            .with_provider(ProviderId::Claude, static_provider("claude", "from-claude"))
            .build();

        // "resume" prefers openai, which has no credential here.
        assert_eq!(router.route("draft my resume", "resume").await, "from-claude");
    }

    #[tokio::test]
    async fn test_failure_short_circuits_to_mock() {
        let router = ProviderRouter::builder()
            .with_provider(ProviderId::OpenAi, Arc::new(FailingProvider))
            .with_provider(ProviderId::Claude, static_provider("claude", "from-claude"))
            .build();

        // Claude is available but must not be consulted once openai was picked.
        assert_eq!(
            router.route("hello", "resume").await,
            "[openai mock] hello"
        );
    }

    #[tokio::test]
    async fn test_credentialed_provider_without_client() {
        let router = ProviderRouter::builder()
            .mark_available(ProviderId::OpenAi)
            .build();

        let out = router.route("hello", "resume").await;
        assert!(out.starts_with("[openai mock] "), "{out}");
        assert!(out.ends_with("hello"), "{out}");
    }

    #[tokio::test]
    async fn test_no_provider_sentinel() {
        let router = ProviderRouter::builder().build();

        assert_eq!(
            router.route("hi", "resume").await,
            "[no provider available] hi"
        );
    }

    #[tokio::test]
    async fn test_unknown_task_sentinel() {
        let router = ProviderRouter::builder()
            .with_provider(ProviderId::OpenAi, static_provider("openai", "from-openai"))
            .build();

        assert_eq!(
            router.route("hi", "nonexistent_task").await,
            "[no provider available] hi"
        );
    }

    #[tokio::test]
    async fn test_mock_path_is_deterministic() {
        let router = ProviderRouter::builder()
            .with_provider(ProviderId::Gemini, Arc::new(FailingProvider))
            .build();

        let first = router.route("same prompt", "recruiter_message").await;
        let second = router.route("same prompt", "recruiter_message").await;
        assert_eq!(first, second);
        assert_eq!(first, "[gemini mock] same prompt");
    }

    #[tokio::test]
    async fn test_gemini_first_for_recruiter_message() {
        let router = ProviderRouter::builder()
            .with_provider(ProviderId::OpenAi, static_provider("openai", "from-openai"))
            .with_provider(ProviderId::Gemini, static_provider("gemini", "from-gemini"))
            .build();

        assert_eq!(
            router.route("say hi", "recruiter_message").await,
            "from-gemini"
        );
    }

    proptest! {
        #[test]
        fn prop_mock_reply_wraps_prompt(prompt in ".*") {
            for id in ProviderId::ALL {
                let reply = mock_reply(id, &prompt);
                prop_assert!(reply.starts_with(id.mock_tag()));
                prop_assert!(reply.ends_with(&prompt));
            }
        }

        #[test]
        fn prop_sentinel_wraps_prompt(prompt in ".*") {
            let reply = no_provider_reply(&prompt);
            prop_assert!(reply.starts_with(NO_PROVIDER_TAG));
            prop_assert!(reply.ends_with(&prompt));
        }
    }
}
