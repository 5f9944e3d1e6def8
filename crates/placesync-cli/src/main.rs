use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use placesync_core::{Category, SearchableRecord, SourceTag};
use tracing_subscriber::EnvFilter;

mod search;
mod simulate;

#[derive(Debug, Parser)]
#[command(name = "placesync")]
#[command(about = "Place search and map marker sync")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one search and print the merged results as JSON.
    Search {
        keyword: String,
        #[command(flatten)]
        sources: SourceFiles,
        /// Only show results in this category.
        #[arg(long)]
        category: Option<Category>,
        /// Zero-based result page.
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Feed keystrokes through the debouncer and reconcile a logging map.
    Simulate {
        /// Successive contents of the search box, e.g. `o on oni onion`.
        #[arg(required = true)]
        keystrokes: Vec<String>,
        #[command(flatten)]
        sources: SourceFiles,
        /// Delay between keystrokes in milliseconds.
        #[arg(long, default_value_t = 100)]
        gap_ms: u64,
        /// Marker key (`source:id`) to select once results settle.
        #[arg(long)]
        select: Vec<String>,
    },
}

/// Saved and public place collections (YAML, or JSON by extension).
#[derive(Debug, Args)]
struct SourceFiles {
    #[arg(long, value_name = "FILE")]
    local: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    public: Option<PathBuf>,
}

impl SourceFiles {
    fn load(&self) -> anyhow::Result<(Vec<SearchableRecord>, Vec<SearchableRecord>)> {
        let load = |path: Option<&PathBuf>, source: SourceTag| -> anyhow::Result<_> {
            let Some(path) = path else {
                return Ok(Vec::new());
            };
            let records = placesync_core::load_records(path, source)?;
            tracing::info!(path = %path.display(), %source, count = records.len(), "loaded places");
            Ok(records)
        };
        Ok((
            load(self.local.as_ref(), SourceTag::Local)?,
            load(self.public.as_ref(), SourceTag::Public)?,
        ))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = placesync_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Search {
            keyword,
            sources,
            category,
            page,
        } => search::run_search(&config, &keyword, &sources, category, page).await,
        Commands::Simulate {
            keystrokes,
            sources,
            gap_ms,
            select,
        } => {
            simulate::run_simulate(
                &config,
                &keystrokes,
                &sources,
                std::time::Duration::from_millis(gap_ms),
                &select,
            )
            .await
        }
    }
}
