//! Date-keyed news cache persisted as a single JSON document.
//!
//! # File Format
//!
//! ```text
//! {
//!   "2025-05-06": { "global": [...], "tech": [...], "ai": [...] },
//!   "2025-05-07": { ... }
//! }
//! ```
//!
//! # Write Discipline
//!
//! The store owns the in-memory document. [`CacheStore::put`] merges one
//! date's bundle into it and rewrites the whole file while still holding the
//! document lock, so writes from one process are serialized. The file is
//! written to a sibling `.tmp` and renamed into place. Two processes sharing
//! a cache file still race: last writer wins.

use crate::models::{CacheDocument, NewsBundle};
use crate::utils::ensure_writable_dir;
use chrono::NaiveDate;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    doc: Mutex<CacheDocument>,
}

impl CacheStore {
    /// Load the cache at `path`.
    ///
    /// A missing, unreadable or malformed file yields an empty document.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let doc = match fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<CacheDocument>(&raw) {
                Ok(doc) => {
                    info!(dates = doc.len(), "Loaded news cache");
                    doc
                }
                Err(e) => {
                    warn!(error = %e, "Cache file is invalid; starting from an empty document");
                    CacheDocument::new()
                }
            },
            Err(e) => {
                warn!(error = %e, "Cache file not found or unreadable; starting from an empty document");
                CacheDocument::new()
            }
        };
        Self {
            path,
            doc: Mutex::new(doc),
        }
    }

    pub async fn get(&self, date: NaiveDate) -> Option<NewsBundle> {
        self.doc.lock().await.get(&date).cloned()
    }

    /// Dates with a cached bundle, ascending.
    pub async fn dates(&self) -> Vec<NaiveDate> {
        self.doc.lock().await.keys().copied().collect()
    }

    /// Replace `date`'s bundle and persist the whole document.
    ///
    /// Other dates are written back untouched. On error the in-memory
    /// document already holds the new bundle but the file may still hold the
    /// previous one.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), %date))]
    pub async fn put(&self, date: NaiveDate, bundle: NewsBundle) -> Result<(), Box<dyn Error>> {
        let mut doc = self.doc.lock().await;
        doc.insert(date, bundle);
        let json = serde_json::to_string_pretty(&*doc)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_writable_dir(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!(bytes = json.len(), "Wrote cache document");
        info!(dates = doc.len(), "Updated news cache");
        Ok(())
    }
}
