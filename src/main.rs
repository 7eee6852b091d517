mod extract;
mod github;
mod pipeline;
mod report;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "glean",
    version,
    about = "Harvest contributor email addresses from a GitHub user's public activity"
)]
struct Cli {
    /// GitHub username to scan
    #[arg(short = 'u', long = "user")]
    user: String,

    /// Output CSV path
    #[arg(short = 'o', long, default_value = "emails.csv")]
    output: PathBuf,

    /// Maximum repositories processed at once
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Token check happens before any network activity
    let token = load_token()?;
    let github = Arc::new(github::GitHub::new(token)?);

    let findings = pipeline::harvest(github, &cli.user, cli.concurrency).await?;

    report::write_csv(&findings, &cli.output)?;
    report::print_summary(&findings, &cli.output);

    Ok(())
}

fn load_token() -> Result<String> {
    let token = std::env::var("GLEAN_GITHUB_TOKEN")
        .or_else(|_| std::env::var("GITHUB_TOKEN"))
        .ok();

    match token {
        Some(token) if !token.trim().is_empty() => Ok(token),
        _ => bail!("missing GitHub token: set GLEAN_GITHUB_TOKEN or GITHUB_TOKEN"),
    }
}
