//! Generation Workers
//!
//! Higher-level generation tasks built on top of the provider router.

pub mod recruiter;

pub use recruiter::{CandidateProfile, JobPosting, Tone, generate_message};
