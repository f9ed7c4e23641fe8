//! Global Constants
//!
//! Centralized constants for configuration and tuning.

/// Routing constants
pub mod routing {
    /// Prefix of the sentinel returned when no provider can serve a task.
    /// Callers detect the degraded path by prefix match.
    pub const NO_PROVIDER_TAG: &str = "[no provider available] ";
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
}

/// Generation constants
pub mod generation {
    /// Default maximum tokens to generate per request
    pub const DEFAULT_MAX_TOKENS: usize = 512;
}
