//! Message Command
//!
//! Generate a recruiter outreach message for a job posting.

use crate::ai::provider::ProviderRouter;
use crate::config::RouterConfig;
use crate::types::Result;
use crate::worker::recruiter::{CandidateProfile, JobPosting, Tone, generate_message};

pub struct MessageOptions {
    pub candidate: String,
    pub headline: String,
    pub highlights: Vec<String>,
    pub title: String,
    pub location: String,
    pub recipient: String,
    pub tone: String,
}

pub async fn run(options: MessageOptions) -> Result<()> {
    let config = RouterConfig::from_env();
    let router = ProviderRouter::from_env(&config);

    let profile = CandidateProfile {
        name: options.candidate,
        headline: options.headline,
        highlights: options.highlights,
    };
    let job = JobPosting {
        title: options.title,
        location: options.location,
    };

    let message = generate_message(
        &router,
        &profile,
        &job,
        &options.recipient,
        Tone::parse(&options.tone),
    )
    .await;
    println!("{}", message);

    Ok(())
}
