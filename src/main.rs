use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use submission_client::models::{RawInputData, SourceData};
use submission_client::output::{self, OutputFormat};
use submission_client::{Config, SubmissionClient};
use tracing::Level;

/// Submission client - talk to the validation backend on behalf of a submitter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    config: PathBuf,

    /// JSON file describing the submission (proof token, source, submitter)
    #[arg(short, long)]
    source_data: PathBuf,

    /// Override the validation API base URL from the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Output format: plain or json
    #[arg(short, long, default_value = "plain")]
    output: OutputFormat,

    /// Verbose output - log every request
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the submitter's previous submissions
    History,
    /// Send raw chats for quality and uniqueness scoring
    Evaluate {
        /// JSON file with the raw chats and submission token
        #[arg(short, long)]
        raw_input: PathBuf,
    },
    /// Submit the finalized proof data
    Submit,
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_file(&args.config)?;
    if let Some(base_url) = args.base_url {
        config.validation_api_url = base_url;
    }

    let source_data: SourceData = load_json(&args.source_data)?;
    let client = SubmissionClient::new(config).context("Failed to build HTTP client")?;

    // History and submit failures end the process; evaluate failures are reported as results.
    match args.command {
        Command::History => {
            let history = client
                .fetch_historical_data(&source_data)
                .await
                .context("Failed to fetch submission history")?;
            output::print_history(&history, args.output);
        }
        Command::Evaluate { raw_input } => {
            let raw_input: RawInputData = load_json(&raw_input)?;
            let result = client.evaluate_submission(&source_data, &raw_input).await;
            output::print_evaluation(&result, args.output);
        }
        Command::Submit => {
            let result = client
                .submit_data(&source_data)
                .await
                .context("Failed to submit data")?;
            output::print_submission(&result, args.output);
        }
    }

    Ok(())
}
