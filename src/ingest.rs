//! Ingestion orchestrator: cache hit, or fetch + normalize + persist.
//!
//! Both the scheduled `sync` run and on-demand loads go through
//! [`Ingestor::bundle_for`]. Without `force`, a cached date is returned as-is;
//! otherwise the three sources are queried concurrently, each normalized into
//! its bucket, and the assembled bundle replaces that date in the cache.
//!
//! A source that fails contributes zero items. The only error this module
//! returns is a failed cache write.

use crate::cache::CacheStore;
use crate::config::{SourcePlan, SourceSpec};
use crate::models::{Bucket, NewsBundle, NewsItem};
use crate::normalize::{Jitter, normalize_results};
use crate::providers::FetchJson;
use chrono::NaiveDate;
use std::error::Error;
use std::sync::Mutex;
use tracing::{info, instrument, warn};

pub struct Ingestor<F> {
    fetcher: F,
    cache: CacheStore,
    plan: SourcePlan,
    base_url: String,
    api_key: String,
    jitter: Mutex<Jitter>,
}

impl<F: FetchJson> Ingestor<F> {
    pub fn new(
        fetcher: F,
        cache: CacheStore,
        plan: SourcePlan,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            cache,
            plan,
            base_url: base_url.into(),
            api_key: api_key.into(),
            jitter: Mutex::new(Jitter::from_os_rng()),
        }
    }

    /// Replace the score jitter source.
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = Mutex::new(jitter);
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Return `date`'s bundle, fetching and persisting it on a miss or when forced.
    #[instrument(level = "info", skip(self))]
    pub async fn bundle_for(&self, date: NaiveDate, force: bool) -> Result<NewsBundle, Box<dyn Error>> {
        if !force {
            if let Some(bundle) = self.cache.get(date).await {
                info!("Serving bundle from cache");
                return Ok(bundle);
            }
        }

        info!("Fetching fresh bundle");
        let (global, tech, ai) = futures::join!(
            self.collect(Bucket::Global),
            self.collect(Bucket::Tech),
            self.collect(Bucket::Ai),
        );
        let bundle = NewsBundle { global, tech, ai };
        if bundle.is_empty() {
            warn!("Every source came back empty");
        }

        self.cache.put(date, bundle.clone()).await?;
        info!(
            global = bundle.global.len(),
            tech = bundle.tech.len(),
            ai = bundle.ai.len(),
            "News sync completed"
        );
        Ok(bundle)
    }

    #[instrument(level = "info", skip_all, fields(%bucket))]
    async fn collect(&self, bucket: Bucket) -> Vec<NewsItem> {
        let source: &SourceSpec = self.plan.for_bucket(bucket);
        let url = match source.kind.query_url(&self.base_url, &source.query, &self.api_key) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, base_url = %self.base_url, "Invalid provider base URL; skipping source");
                return Vec::new();
            }
        };

        info!(kind = ?source.kind, query = %source.query, "Fetching source");
        let results = match self.fetcher.fetch_json(&url).await {
            Some(payload) => source.kind.results(&payload),
            None => Vec::new(),
        };

        let mut jitter = self.jitter.lock().unwrap_or_else(|poison| poison.into_inner());
        let items = normalize_results(&results, &source.labels, source.cap, &mut jitter);
        info!(raw = results.len(), kept = items.len(), "Normalized source");
        items
    }
}
