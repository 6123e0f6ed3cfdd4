//! Runtime settings loaded from an optional YAML file.
//!
//! Every field has a built-in default, so an empty file (or no file at all)
//! is a valid configuration. Command-line flags and environment variables
//! override what the file says; see [`crate::cli`].
//!
//! ```yaml
//! cache_path: api/news-cache.json
//! page_size: 3
//! sources:
//!   tech:
//!     kind: region_news
//!     query: top 10 Singapore viral news
//!     labels: [SINGAPORE, VIRAL, LOCAL]
//! ```

use crate::models::Bucket;
use crate::normalize::DEFAULT_CAP;
use crate::providers::ProviderKind;
use crate::providers::serp::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::PathBuf;
use tracing::{info, instrument};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub cache_path: PathBuf,
    pub serp_base_url: String,
    pub api_key: Option<String>,
    /// Items revealed per scroll step in paginated columns.
    pub page_size: usize,
    pub gauge_interval_secs: u64,
    /// Seed for viral score jitter; scores vary run to run when unset.
    pub score_seed: Option<u64>,
    pub sources: SourcePlan,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from("api/news-cache.json"),
            serp_base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            page_size: 3,
            gauge_interval_secs: 3,
            score_seed: None,
            sources: SourcePlan::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or return the defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = tokio::fs::read_to_string(path).await?;
        let settings = Self::from_yaml(&raw)?;
        info!(config_path = path, "Loaded configuration");
        Ok(settings)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document parses as unit, not as a mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }
}

/// One ingestion source: what to query and how to label the results.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SourceSpec {
    pub kind: ProviderKind,
    pub query: String,
    pub labels: Vec<String>,
    #[serde(default = "default_cap")]
    pub cap: usize,
}

fn default_cap() -> usize {
    DEFAULT_CAP
}

impl SourceSpec {
    fn new(kind: ProviderKind, query: &str, labels: [&str; 3]) -> Self {
        Self {
            kind,
            query: query.to_string(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            cap: DEFAULT_CAP,
        }
    }
}

/// The source feeding each bucket.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SourcePlan {
    pub global: SourceSpec,
    pub tech: SourceSpec,
    pub ai: SourceSpec,
}

impl SourcePlan {
    pub fn for_bucket(&self, bucket: Bucket) -> &SourceSpec {
        match bucket {
            Bucket::Global => &self.global,
            Bucket::Tech => &self.tech,
            Bucket::Ai => &self.ai,
        }
    }
}

impl Default for SourcePlan {
    fn default() -> Self {
        Self {
            global: SourceSpec::new(
                ProviderKind::GeneralNews,
                "top 10 global news breaking",
                ["BREAKING", "WORLD", "POLITICS"],
            ),
            tech: SourceSpec::new(
                ProviderKind::RegionNews,
                "top 10 Malaysia top viral news latest",
                ["MALAYSIA", "VIRAL", "LOCAL"],
            ),
            ai: SourceSpec::new(
                ProviderKind::Video,
                "latest most viral video",
                ["VIRAL", "YOUTUBE", "TRENDING"],
            ),
        }
    }
}
