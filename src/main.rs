//! # newsdesk
//!
//! A daily news aggregator that pulls headlines and viral videos from
//! SerpApi, normalizes them into ranked buckets, caches them per calendar
//! date, and browses them as paginated feeds.
//!
//! ## Features
//!
//! - Three sources per day: global news, region-scoped news, viral videos
//! - Normalization into canonical items with a synthetic "viral score"
//! - A single JSON cache document keyed by `YYYY-MM-DD`
//! - A feed controller with infinite-scroll pagination, forced refresh, and
//!   a built-in fallback dataset when the feed is unreachable
//!
//! ## Usage
//!
//! ```sh
//! SERP_API_KEY=... newsdesk sync
//! newsdesk dates
//! newsdesk show --scroll 1
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: One SerpApi request per source, failures degrade to empty
//! 2. **Normalizing**: First-N items, round-robin labels, position-based scores
//! 3. **Caching**: Merge the date's bundle into the document, rewrite the file
//! 4. **Presenting**: Load through the feed controller and render the columns

use clap::Parser;
use itertools::Itertools;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cache;
mod cli;
mod config;
mod feed;
mod ingest;
mod models;
mod normalize;
mod providers;
mod utils;

use cache::CacheStore;
use cli::{Cli, Command};
use config::Settings;
use feed::gauge::ActivityGauge;
use feed::source::{HttpFeedClient, LocalFeed};
use feed::{Connectivity, FeedController, render};
use ingest::Ingestor;
use models::Bucket;
use normalize::Jitter;
use providers::SerpClient;
use utils::{parse_date, today};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args.command, "Parsed CLI arguments");

    let mut settings = Settings::load(args.config.as_deref()).await?;
    if let Some(cache) = args.cache {
        settings.cache_path = cache.into();
    }
    if args.api_key.is_some() {
        settings.api_key = args.api_key;
    }

    let result = match args.command {
        Command::Sync { date, refresh } => run_sync(&settings, date.as_deref(), refresh).await,
        Command::Dates => run_dates(&settings).await,
        Command::Show {
            date,
            refresh,
            server,
            scroll,
            ticks,
        } => run_show(&settings, date.as_deref(), refresh, server.as_deref(), scroll, ticks).await,
    };

    let elapsed = start_time.elapsed();
    match &result {
        Ok(()) => info!(?elapsed, "Execution complete"),
        Err(e) => error!(?elapsed, error = %e, "FATAL: run aborted"),
    }
    result
}

fn resolve_date(date: Option<&str>) -> Result<chrono::NaiveDate, Box<dyn Error>> {
    match date {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(today()),
    }
}

async fn build_ingestor(settings: &Settings) -> Ingestor<SerpClient> {
    let api_key = settings.api_key.clone().unwrap_or_else(|| {
        warn!("No SerpApi key configured (set SERP_API_KEY); provider requests will fail");
        String::new()
    });
    let jitter = match settings.score_seed {
        Some(seed) => Jitter::seeded(seed),
        None => Jitter::from_os_rng(),
    };
    let cache = CacheStore::load(&settings.cache_path).await;
    Ingestor::new(
        SerpClient::new(api_key.clone()),
        cache,
        settings.sources.clone(),
        settings.serp_base_url.clone(),
        api_key,
    )
    .with_jitter(jitter)
}

async fn run_sync(settings: &Settings, date: Option<&str>, refresh: bool) -> Result<(), Box<dyn Error>> {
    let date = resolve_date(date)?;
    info!(%date, refresh, "--- Starting news sync ---");
    let ingestor = build_ingestor(settings).await;
    let bundle = ingestor.bundle_for(date, refresh).await?;
    info!(
        %date,
        global = bundle.global.len(),
        tech = bundle.tech.len(),
        ai = bundle.ai.len(),
        "--- News sync finished ---"
    );
    Ok(())
}

async fn run_dates(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let cache = CacheStore::load(&settings.cache_path).await;
    let dates = cache.dates().await;
    info!(count = dates.len(), "Cached dates");
    println!("{}", serde_json::to_string(&dates)?);
    Ok(())
}

async fn run_show(
    settings: &Settings,
    date: Option<&str>,
    refresh: bool,
    server: Option<&str>,
    scroll: usize,
    ticks: usize,
) -> Result<(), Box<dyn Error>> {
    let date = resolve_date(date)?;
    let mut controller = FeedController::new(today(), settings.page_size);

    // Only the requested date is loaded, so a past date never triggers
    // ingestion for today.
    let outcome = match server {
        Some(base) => {
            let source = HttpFeedClient::new(base)?;
            controller.refresh_dates(&source, today()).await;
            controller.load(&source, date, refresh).await
        }
        None => {
            let ingestor = build_ingestor(settings).await;
            let source = LocalFeed::new(&ingestor);
            controller.refresh_dates(&source, today()).await;
            controller.load(&source, date, refresh).await
        }
    };
    debug!(?outcome, "Final load outcome");

    for bucket in Bucket::ALL {
        for _ in 0..scroll {
            if !controller.scroll_near_bottom(bucket) {
                break;
            }
        }
    }

    let mut gauge = ActivityGauge::new(Jitter::from_os_rng());
    if controller.connectivity() == Connectivity::Connected {
        gauge.surge();
    }

    println!(
        "{} | {} | activity {} | dates: {}",
        controller.selected_date(),
        controller.connectivity().label(),
        gauge.label(),
        controller.available_dates().iter().join(", ")
    );
    for bucket in Bucket::ALL {
        println!("\n{}", render::column(&controller.render(bucket)));
    }

    if ticks > 0 {
        gauge
            .run(Duration::from_secs(settings.gauge_interval_secs), ticks, |g| {
                println!("activity {}", g.label())
            })
            .await;
    }
    Ok(())
}
