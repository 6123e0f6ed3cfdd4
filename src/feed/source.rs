//! Where the feed controller gets its bundles from.
//!
//! [`HttpFeedClient`] talks to a running news server:
//!
//! ```text
//! GET /api/news?date=2025-05-06[&refresh=true]   -> NewsBundle
//! GET /api/news/dates                            -> ["2025-05-05", "2025-05-06"]
//! ```
//!
//! [`LocalFeed`] skips the server and drives the [`Ingestor`] in-process,
//! which is what `newsdesk show` does when no `--server` is given.

use crate::ingest::Ingestor;
use crate::models::NewsBundle;
use crate::providers::FetchJson;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(StatusCode),
    #[error("bad server URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("ingestion failed: {0}")]
    Ingest(String),
}

pub trait BundleSource {
    async fn fetch_bundle(&self, date: NaiveDate, refresh: bool) -> Result<NewsBundle, FeedError>;
    async fn fetch_dates(&self) -> Result<Vec<NaiveDate>, FeedError>;
}

#[derive(Debug, Clone)]
pub struct HttpFeedClient {
    http: Client,
    base: Url,
}

impl HttpFeedClient {
    pub fn new(base: &str) -> Result<Self, FeedError> {
        Ok(Self {
            http: Client::new(),
            base: Url::parse(base)?,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, FeedError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }
        Ok(resp.json().await?)
    }
}

impl BundleSource for HttpFeedClient {
    #[instrument(level = "info", skip(self))]
    async fn fetch_bundle(&self, date: NaiveDate, refresh: bool) -> Result<NewsBundle, FeedError> {
        let mut url = self.base.join("/api/news")?;
        url.query_pairs_mut().append_pair("date", &date.to_string());
        if refresh {
            url.query_pairs_mut().append_pair("refresh", "true");
        }
        debug!(%url, "Requesting bundle");
        self.get_json(url).await
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch_dates(&self) -> Result<Vec<NaiveDate>, FeedError> {
        let url = self.base.join("/api/news/dates")?;
        self.get_json(url).await
    }
}

/// In-process source backed directly by an [`Ingestor`].
pub struct LocalFeed<'a, F> {
    ingestor: &'a Ingestor<F>,
}

impl<'a, F: FetchJson> LocalFeed<'a, F> {
    pub fn new(ingestor: &'a Ingestor<F>) -> Self {
        Self { ingestor }
    }
}

impl<F: FetchJson> BundleSource for LocalFeed<'_, F> {
    async fn fetch_bundle(&self, date: NaiveDate, refresh: bool) -> Result<NewsBundle, FeedError> {
        self.ingestor
            .bundle_for(date, refresh)
            .await
            .map_err(|e| FeedError::Ingest(e.to_string()))
    }

    async fn fetch_dates(&self) -> Result<Vec<NaiveDate>, FeedError> {
        Ok(self.ingestor.cache().dates().await)
    }
}
