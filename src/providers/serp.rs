//! SerpApi JSON client.
//!
//! One GET per call, transport-default timeouts, no retries. The HTTP status
//! is not inspected: SerpApi reports failures (bad key, quota) as a JSON body
//! with an `error` field, which is checked instead.

use super::FetchJson;
use crate::utils::{redact_api_key, truncate_for_log};
use reqwest::Client;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;

/// Default SerpApi search endpoint.
pub const DEFAULT_BASE_URL: &str = "https://serpapi.com/search.json";

#[derive(Debug, Clone)]
pub struct SerpClient {
    http: Client,
    /// Redacted from every URL this client logs.
    api_key: String,
}

impl SerpClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
        }
    }
}

impl FetchJson for SerpClient {
    #[instrument(level = "info", skip_all, fields(url = %redact_api_key(url.as_str(), &self.api_key)))]
    async fn fetch_json(&self, url: &Url) -> Option<Value> {
        let t0 = Instant::now();
        let body = match self.http.get(url.clone()).send().await {
            Ok(resp) => match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, "Failed reading provider response body");
                    return None;
                }
            },
            Err(e) => {
                warn!(error = %e, "HTTP error reaching provider");
                return None;
            }
        };

        let parsed: Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    error = %e,
                    body_preview = %truncate_for_log(&body, 200),
                    "Provider returned non-JSON body"
                );
                return None;
            }
        };

        if let Some(err) = parsed.get("error") {
            warn!(provider_error = %err, "Provider reported an error");
            return None;
        }

        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Provider payload parsed");
        Some(parsed)
    }
}
