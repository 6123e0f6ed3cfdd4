//! Data models for normalized news items and the bundles they are grouped into.
//!
//! This module defines the core data structures shared by ingestion, the cache
//! and the feed controller:
//! - [`NewsItem`]: One canonical record, whatever provider it came from
//! - [`NewsBundle`]: The three ranked buckets for a single calendar date
//! - [`Bucket`]: Names one of those buckets and carries its display rules
//! - [`CacheDocument`]: The whole persisted date → bundle mapping
//!
//! Field names serialize as camelCase to match the JSON the feed endpoints
//! serve (`viralScore`, not `viral_score`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder link used when a provider omits one.
pub const NO_URL: &str = "#";
/// Placeholder source used when no provider field names one.
pub const UNKNOWN_SOURCE: &str = "Unknown";

fn default_url() -> String {
    NO_URL.to_string()
}

fn default_source() -> String {
    UNKNOWN_SOURCE.to_string()
}

/// A single normalized news or video item.
///
/// Produced by [`crate::normalize::normalize_results`] during ingestion and by
/// the embedded fallback dataset on the client side. Only the fallback dataset
/// populates `description`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// Round-robin label from the bucket's label set (e.g. `"BREAKING"`).
    pub category: String,
    /// Never empty; falls back to `"News Update"`.
    pub headline: String,
    /// Provider date string, or the ingestion time in ISO-8601.
    #[serde(default, alias = "date")]
    pub timestamp: String,
    /// Synthetic display score, one decimal, roughly 0..10 but not clamped.
    pub viral_score: f64,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_source")]
    pub source: String,
    /// Compact view count such as `"22.4K"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The three ranked buckets collected for one calendar date.
///
/// Order inside each bucket is provider rank and must be preserved.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NewsBundle {
    #[serde(default)]
    pub global: Vec<NewsItem>,
    #[serde(default)]
    pub tech: Vec<NewsItem>,
    #[serde(default)]
    pub ai: Vec<NewsItem>,
}

impl NewsBundle {
    /// Items of one bucket, in rank order.
    pub fn bucket(&self, bucket: Bucket) -> &[NewsItem] {
        match bucket {
            Bucket::Global => &self.global,
            Bucket::Tech => &self.tech,
            Bucket::Ai => &self.ai,
        }
    }

    pub fn is_empty(&self) -> bool {
        Bucket::ALL.iter().all(|b| self.bucket(*b).is_empty())
    }
}

/// The persisted cache: calendar date → bundle, ordered by date.
pub type CacheDocument = BTreeMap<NaiveDate, NewsBundle>;

/// One of the three named feeds in a [`NewsBundle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    /// World headlines.
    Global,
    /// Region-scoped headlines.
    Tech,
    /// Viral videos. Always rendered in full, never paginated.
    Ai,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Global, Bucket::Tech, Bucket::Ai];

    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Global => "global",
            Bucket::Tech => "tech",
            Bucket::Ai => "ai",
        }
    }

    /// Whether scroll events page this bucket in, or it shows everything at once.
    pub fn is_paginated(self) -> bool {
        !matches!(self, Bucket::Ai)
    }

    /// Column header count, e.g. `"5 REPORTS"`, `"07 LOCAL"`, `"TRENDING: 3"`.
    pub fn count_label(self, count: usize) -> String {
        match self {
            Bucket::Global => format!("{count} REPORTS"),
            Bucket::Tech => format!("{count:02} LOCAL"),
            Bucket::Ai => format!("TRENDING: {count}"),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
