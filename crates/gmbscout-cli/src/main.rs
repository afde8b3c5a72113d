use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod analyze;
mod find;
mod records;
mod score;

#[derive(Debug, Parser)]
#[command(name = "gmbscout")]
#[command(about = "Score business listings and rank niches by optimization opportunity")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Aggregate every niche and rank them by opportunity score
    Analyze {
        /// Restrict the run to one niche (by name or slug)
        #[arg(long)]
        niche: Option<String>,

        /// Read records from a JSON file (niche -> records) instead of the API
        #[arg(long)]
        input: Option<PathBuf>,

        /// Write the full report as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List individual listings whose score falls inside a window
    Find {
        /// Restrict the search to one niche (by name or slug)
        #[arg(long)]
        niche: Option<String>,

        /// Read records from a JSON file (niche -> records) instead of the API
        #[arg(long)]
        input: Option<PathBuf>,

        /// Lowest score to include (defaults to the configured window)
        #[arg(long)]
        min_score: Option<u8>,

        /// Highest score to include (defaults to the configured window)
        #[arg(long)]
        max_score: Option<u8>,

        /// Write the matching listings as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Score a JSON array of records offline
    Score {
        #[arg(long)]
        input: PathBuf,

        /// Write the assessments as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(config: &gmbscout_core::AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = gmbscout_core::load_app_config()?;
    init_tracing(&config)?;
    tracing::debug!(env = %config.env, ?config, "configuration loaded");

    match cli.command {
        Commands::Analyze {
            niche,
            input,
            output,
        } => {
            analyze::run_analyze(&config, niche.as_deref(), input.as_deref(), output.as_deref())
                .await?;
        }
        Commands::Find {
            niche,
            input,
            min_score,
            max_score,
            output,
        } => {
            find::run_find(
                &config,
                niche.as_deref(),
                input.as_deref(),
                min_score,
                max_score,
                output.as_deref(),
            )
            .await?;
        }
        Commands::Score { input, output } => {
            score::run_score(&input, output.as_deref())?;
        }
    }

    Ok(())
}
