//! Provider adapters for the external search APIs.
//!
//! Every source is reached through the same SerpApi-style JSON endpoint; the
//! three [`ProviderKind`]s differ only in engine, query parameter, and the key
//! the result array lives under.
//!
//! | Kind | Engine | Query param | Results key |
//! |------|--------|-------------|-------------|
//! | [`ProviderKind::GeneralNews`] | `google_news` | `q` | `news_results` |
//! | [`ProviderKind::RegionNews`] | `google_news` | `q` | `news_results` |
//! | [`ProviderKind::Video`] | `youtube` | `search_query` | `video_results` |
//!
//! # Failure Model
//!
//! Adapters never retry and never return errors: a transport failure, a
//! non-JSON body, or a body carrying a provider `error` field all come back as
//! `None`, which the orchestrator treats as "this source has zero items".
//! See [`serp`] for the HTTP implementation.

pub mod serp;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

pub use serp::SerpClient;

/// Which kind of search a source performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    GeneralNews,
    RegionNews,
    Video,
}

impl ProviderKind {
    pub fn engine(self) -> &'static str {
        match self {
            ProviderKind::GeneralNews | ProviderKind::RegionNews => "google_news",
            ProviderKind::Video => "youtube",
        }
    }

    fn query_param(self) -> &'static str {
        match self {
            ProviderKind::Video => "search_query",
            _ => "q",
        }
    }

    fn results_key(self) -> &'static str {
        match self {
            ProviderKind::Video => "video_results",
            _ => "news_results",
        }
    }

    /// Build the fully-formed request URL for this kind of search.
    pub fn query_url(self, base: &str, query: &str, api_key: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            base,
            &[
                ("engine", self.engine()),
                (self.query_param(), query),
                ("api_key", api_key),
            ],
        )
    }

    /// Extract the raw result array from a provider payload.
    ///
    /// A payload without the expected key (or with a non-array there) yields
    /// an empty list rather than an error.
    pub fn results(self, payload: &Value) -> Vec<Value> {
        payload
            .get(self.results_key())
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }
}

/// Fetch one URL and hand back its parsed JSON body, or `None` on any failure.
///
/// This is the seam between ingestion and the network: [`SerpClient`] is the
/// production implementation, tests plug in canned payloads.
pub trait FetchJson {
    async fn fetch_json(&self, url: &Url) -> Option<Value>;
}
