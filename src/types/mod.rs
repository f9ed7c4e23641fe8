pub mod error;

pub use error::{ErrorCategory, ErrorClassifier, LlmError, PilotError, Result};
