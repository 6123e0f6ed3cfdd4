//! Command-line interface definitions for newsdesk.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Global options can also come from environment variables or the YAML
//! settings file; flags win over both.

use clap::{Parser, Subcommand};

/// Command-line arguments for the newsdesk application.
///
/// # Examples
///
/// ```sh
/// # Daily cron run: fetch today's feeds into the cache
/// SERP_API_KEY=... newsdesk sync
///
/// # Re-fetch a specific date even if it is cached
/// newsdesk sync --date 2025-05-06 --refresh
///
/// # Browse the feed served by a running news server
/// newsdesk show --server http://localhost:3000 --scroll 1
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, global = true, env = "NEWSDESK_CONFIG")]
    pub config: Option<String>,

    /// Path of the JSON news cache (overrides the settings file)
    #[arg(long, global = true)]
    pub cache: Option<String>,

    /// SerpApi key (overrides the settings file)
    #[arg(long, global = true, env = "SERP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch and cache the feeds for one date
    Sync {
        /// Date to sync as YYYY-MM-DD (defaults to today, UTC)
        #[arg(short, long)]
        date: Option<String>,

        /// Re-fetch even if the date is already cached
        #[arg(short, long)]
        refresh: bool,
    },

    /// Print the cached dates as a JSON array
    Dates,

    /// Load one date through the feed controller and print the columns
    Show {
        /// Date to show as YYYY-MM-DD (defaults to today, UTC)
        #[arg(short, long)]
        date: Option<String>,

        /// Force a refresh, like the sync button
        #[arg(short, long)]
        refresh: bool,

        /// Base URL of a news server. When omitted, reads the local cache and
        /// fetches from SerpApi on a miss
        #[arg(short, long)]
        server: Option<String>,

        /// Scroll-near-bottom events to apply to each paginated column
        #[arg(long, default_value_t = 0)]
        scroll: usize,

        /// Activity gauge updates to print after the feed
        #[arg(long, default_value_t = 0)]
        ticks: usize,
    },
}
