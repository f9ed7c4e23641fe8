use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobpilot::cli::commands::message::MessageOptions;

#[derive(Parser)]
#[command(name = "jobpilot")]
#[command(
    version,
    about = "Task-based LLM provider routing for job application workflows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Route a prompt to the best available provider for a task
    Route {
        #[arg(help = "Prompt text to send")]
        prompt: String,
        #[arg(
            long,
            short,
            help = "Task label: resume, recruiter_message, feedback"
        )]
        task: String,
    },

    /// Show provider availability and task preference order
    Providers,

    /// Generate a recruiter outreach message
    Message {
        #[arg(long, help = "Candidate name")]
        candidate: String,
        #[arg(long, default_value = "", help = "One-line professional headline")]
        headline: String,
        #[arg(long = "highlight", help = "Career highlight (repeatable)")]
        highlights: Vec<String>,
        #[arg(long, help = "Job title")]
        title: String,
        #[arg(long, default_value = "", help = "Job location")]
        location: String,
        #[arg(long, default_value = "there", help = "Recipient name for the greeting")]
        recipient: String,
        #[arg(long, default_value = "polite", help = "Tone preset: polite, formal, casual")]
        tone: String,
    },
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", console::style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Route { prompt, task } => {
            let rt = Runtime::new()?;
            rt.block_on(jobpilot::cli::commands::route::run(&prompt, &task))?;
        }
        Commands::Providers => {
            jobpilot::cli::commands::providers::run()?;
        }
        Commands::Message {
            candidate,
            headline,
            highlights,
            title,
            location,
            recipient,
            tone,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(jobpilot::cli::commands::message::run(MessageOptions {
                candidate,
                headline,
                highlights,
                title,
                location,
                recipient,
                tone,
            }))?;
        }
    }

    Ok(())
}
