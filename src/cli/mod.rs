//! CLI parser and command dispatch.

mod commands;
mod helpers;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "golf")]
#[command(about = "Golf course scraper and course search tools")]
#[command(version)]
pub struct Cli {
    /// Dataset JSON file (overrides config file)
    #[arg(long, global = true, env = "GOLF_DATA")]
    data: Option<PathBuf>,

    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every course from the listing into the dataset file
    Scrape {
        /// Only visit the first N courses
        #[arg(short, long)]
        limit: Option<usize>,
        /// Show the browser window
        #[arg(long)]
        headed: bool,
        /// Connect to a running Chrome (e.g. ws://localhost:9222)
        #[arg(long)]
        remote_url: Option<String>,
    },

    /// Filter courses by name, country, tee and yardage
    Search {
        /// Course name substring
        #[arg(short, long)]
        name: Option<String>,
        /// Country code or name
        #[arg(long)]
        country: Option<String>,
        /// Tee name; yardage is then checked against this tee's total
        #[arg(short, long)]
        tee: Option<String>,
        /// Yardage range: "lo-hi", ">=N", "<=N", "N" or "lo hi"
        #[arg(short, long)]
        yardage: Option<String>,
        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show hole-by-hole detail for one course
    Holes {
        /// Course name substring
        query: String,
        /// Which match to use when several courses match (1-based)
        #[arg(short, long)]
        pick: Option<usize>,
        /// Holes to show, e.g. "1,3,5-9" (default: all)
        #[arg(long)]
        holes: Option<String>,
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tee names, or per-tee totals for matching courses
    Tees {
        /// Course name substring
        query: Option<String>,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        data: cli.data,
    };
    let (settings, _config) = load_settings_with_options(options)
        .await
        .map_err(anyhow::Error::msg)?;

    match cli.command {
        Commands::Scrape {
            limit,
            headed,
            remote_url,
        } => commands::scrape::cmd_scrape(&settings, limit, headed, remote_url).await,
        Commands::Search {
            name,
            country,
            tee,
            yardage,
            json,
        } => commands::search::cmd_search(&settings, name, country, tee, yardage, json).await,
        Commands::Holes {
            query,
            pick,
            holes,
            json,
        } => commands::holes::cmd_holes(&settings, &query, pick, holes.as_deref(), json).await,
        Commands::Tees { query } => commands::tees::cmd_tees(&settings, query.as_deref()).await,
    }
}
