use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod report;

#[derive(Debug, Parser)]
#[command(name = "castmatch-cli")]
#[command(about = "Influencer selection & budget allocation for campaign briefs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the selection pipeline for a brief over a candidate pool.
    Select {
        /// Campaign brief file (.yaml, .yml, or .json).
        #[arg(long)]
        brief: PathBuf,
        /// Candidate pool file (.yaml, .yml, or .json).
        #[arg(long)]
        pool: PathBuf,
        /// Brand profile merged into the brief before filtering.
        #[arg(long)]
        brand: Option<PathBuf>,
        /// Write the JSON report here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compare the brief's declared budget scenarios.
    Scenarios {
        #[arg(long)]
        brief: PathBuf,
        #[arg(long)]
        pool: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Select {
            brief,
            pool,
            brand,
            output,
        } => report::run_select(&brief, &pool, brand.as_deref(), output.as_deref()).await,
        Commands::Scenarios {
            brief,
            pool,
            output,
        } => report::run_scenarios(&brief, &pool, output.as_deref()).await,
    }
}
