//! Providers Command
//!
//! Show which providers are credentialed right now and the preference order
//! per task label.

use console::style;

use crate::ai::provider::{Credentials, ProviderId, task_preference};
use crate::types::Result;

const KNOWN_TASKS: [&str; 3] = ["resume", "recruiter_message", "feedback"];

pub fn run() -> Result<()> {
    let credentials = Credentials::from_env();

    println!("{}", style("Providers").bold());
    for id in ProviderId::ALL {
        let status = if credentials.has(id) {
            style("available").green()
        } else {
            style("unavailable").red()
        };
        println!("  {:<8} {}  ({})", id.as_str(), status, id.credential_var());
    }

    println!();
    println!("{}", style("Task preference").bold());
    for task in KNOWN_TASKS {
        let order: Vec<&str> = task_preference(task).iter().map(|p| p.as_str()).collect();
        println!("  {:<18} {}", task, order.join(" → "));
    }

    Ok(())
}
