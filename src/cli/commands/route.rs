//! Route Command
//!
//! Route a prompt to the best available provider for a task and print the
//! result. Degraded output is recognizable by its bracket-tag prefix.

use crate::ai::provider::ProviderRouter;
use crate::config::RouterConfig;
use crate::types::Result;

pub async fn run(prompt: &str, task: &str) -> Result<()> {
    let config = RouterConfig::from_env();
    let router = ProviderRouter::from_env(&config);

    let output = router.route(prompt, task).await;
    println!("{}", output);

    Ok(())
}
