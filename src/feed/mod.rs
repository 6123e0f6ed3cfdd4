//! Client feed controller.
//!
//! [`FeedController`] owns everything a feed view needs: the selected date,
//! the loaded bundle, one page cursor per paginated bucket, and the loading
//! and connectivity flags. Rendering is a pure read of that state
//! ([`FeedController::render`]), so the controller is testable without any UI.
//!
//! # Load Lifecycle
//!
//! ```text
//! begin_load(date, refresh) ──► ticket(gen = N) ──► finish_load(ticket, result)
//!                                                     ├─ gen != latest  → Stale (dropped)
//!                                                     ├─ Ok(bundle)     → Live, connected
//!                                                     └─ Err(_)         → Fallback, disconnected
//! ```
//!
//! Only the most recently requested load may change what is shown; an older
//! response that arrives late is discarded. Applying any bundle resets every
//! page cursor to 1.
//!
//! # Pagination
//!
//! `global` and `tech` show `page × page_size` leading items and grow by one
//! page per scroll-near-bottom event until exhausted. `ai` always shows
//! everything.

pub mod fallback;
pub mod gauge;
pub mod render;
pub mod source;

use crate::models::{Bucket, NewsBundle, NewsItem};
use chrono::NaiveDate;
use fallback::fallback_bundle;
use source::{BundleSource, FeedError};
use tracing::{debug, info, instrument, warn};

/// Pixels from the bottom at which a scroll counts as "near bottom".
pub const SCROLL_THRESHOLD_PX: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Nothing has been loaded yet.
    Unknown,
    Connected,
    Disconnected,
}

impl Connectivity {
    pub fn label(self) -> &'static str {
        match self {
            Connectivity::Unknown => "Connecting",
            Connectivity::Connected => "Connected",
            Connectivity::Disconnected => "Disconnected",
        }
    }
}

/// Handle for one in-flight load; pass it back to [`FeedController::finish_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub date: NaiveDate,
    pub refresh: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The requested bundle is now showing.
    Live,
    /// The request failed; the embedded sample bundle is showing.
    Fallback,
    /// A newer load was started after this one; the response was dropped.
    Stale,
}

/// Scroll position of a column's scroll container.
#[derive(Debug, Clone, Copy)]
pub struct ScrollMetrics {
    pub top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollMetrics {
    pub fn near_bottom(&self) -> bool {
        self.top + self.client_height >= self.scroll_height - SCROLL_THRESHOLD_PX
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnState<'a> {
    Loading,
    /// No items for this date; shown as a "no data archived" placeholder.
    Empty,
    Items(&'a [NewsItem]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView<'a> {
    pub bucket: Bucket,
    pub state: ColumnState<'a>,
    /// `None` while loading.
    pub count_label: Option<String>,
}

#[derive(Debug)]
pub struct FeedController {
    selected: NaiveDate,
    available: Vec<NaiveDate>,
    bundle: Option<NewsBundle>,
    pages: [usize; 3],
    page_size: usize,
    loading: bool,
    connectivity: Connectivity,
    generation: u64,
}

fn slot(bucket: Bucket) -> usize {
    match bucket {
        Bucket::Global => 0,
        Bucket::Tech => 1,
        Bucket::Ai => 2,
    }
}

impl FeedController {
    pub fn new(today: NaiveDate, page_size: usize) -> Self {
        Self {
            selected: today,
            available: vec![today],
            bundle: None,
            pages: [1; 3],
            page_size: page_size.max(1),
            loading: false,
            connectivity: Connectivity::Unknown,
            generation: 0,
        }
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected
    }

    /// Dates the date picker may offer.
    pub fn available_dates(&self) -> &[NaiveDate] {
        &self.available
    }

    pub fn bundle(&self) -> Option<&NewsBundle> {
        self.bundle.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn page(&self, bucket: Bucket) -> usize {
        self.pages[slot(bucket)]
    }

    /// Start a load: select `date`, show loading placeholders, and supersede
    /// any load still in flight.
    pub fn begin_load(&mut self, date: NaiveDate, refresh: bool) -> LoadTicket {
        self.generation += 1;
        self.selected = date;
        self.loading = true;
        debug!(generation = self.generation, %date, refresh, "Load started");
        LoadTicket {
            generation: self.generation,
            date,
            refresh,
        }
    }

    /// Apply the result of a load started with [`begin_load`](Self::begin_load).
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<NewsBundle, FeedError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                latest = self.generation,
                date = %ticket.date,
                "Discarding stale response"
            );
            return LoadOutcome::Stale;
        }

        self.loading = false;
        self.pages = [1; 3];
        match result {
            Ok(bundle) => {
                info!(
                    date = %ticket.date,
                    refresh = ticket.refresh,
                    global = bundle.global.len(),
                    tech = bundle.tech.len(),
                    ai = bundle.ai.len(),
                    "Feed loaded"
                );
                self.bundle = Some(bundle);
                self.connectivity = Connectivity::Connected;
                LoadOutcome::Live
            }
            Err(e) => {
                warn!(date = %ticket.date, error = %e, "Failed to load news; showing sample data");
                self.bundle = Some(fallback_bundle());
                self.connectivity = Connectivity::Disconnected;
                LoadOutcome::Fallback
            }
        }
    }

    /// Load `date` from `source`, optionally bypassing the server cache.
    #[instrument(level = "info", skip(self, source))]
    pub async fn load(
        &mut self,
        source: &impl BundleSource,
        date: NaiveDate,
        refresh: bool,
    ) -> LoadOutcome {
        let ticket = self.begin_load(date, refresh);
        let result = source.fetch_bundle(date, refresh).await;
        self.finish_load(ticket, result)
    }

    /// Force-refresh the currently selected date.
    pub async fn sync(&mut self, source: &impl BundleSource) -> LoadOutcome {
        self.load(source, self.selected, true).await
    }

    /// Fetch the selectable dates, then load `today`.
    pub async fn init(&mut self, source: &impl BundleSource, today: NaiveDate) -> LoadOutcome {
        self.refresh_dates(source, today).await;
        self.load(source, today, false).await
    }

    /// Replace the selectable dates with the source's list.
    ///
    /// If the dates can't be fetched the picker only offers `today`.
    pub async fn refresh_dates(&mut self, source: &impl BundleSource, today: NaiveDate) {
        self.available = match source.fetch_dates().await {
            Ok(dates) => dates,
            Err(e) => {
                warn!(error = %e, "Failed to load historical dates");
                vec![today]
            }
        };
    }

    fn items(&self, bucket: Bucket) -> &[NewsItem] {
        self.bundle.as_ref().map(|b| b.bucket(bucket)).unwrap_or_default()
    }

    pub fn render(&self, bucket: Bucket) -> ColumnView<'_> {
        if self.loading {
            return ColumnView {
                bucket,
                state: ColumnState::Loading,
                count_label: None,
            };
        }

        let items = self.items(bucket);
        let state = if items.is_empty() {
            ColumnState::Empty
        } else if bucket.is_paginated() {
            let visible = (self.page(bucket) * self.page_size).min(items.len());
            ColumnState::Items(&items[..visible])
        } else {
            ColumnState::Items(items)
        };
        ColumnView {
            bucket,
            state,
            count_label: Some(bucket.count_label(items.len())),
        }
    }

    /// Reveal the next page of `bucket`. Returns whether anything changed.
    ///
    /// Always `false` for the unpaginated `ai` bucket and once every item is
    /// already visible.
    pub fn scroll_near_bottom(&mut self, bucket: Bucket) -> bool {
        if !bucket.is_paginated() || self.loading {
            return false;
        }
        let total = self.items(bucket).len();
        let page = &mut self.pages[slot(bucket)];
        if *page * self.page_size < total {
            *page += 1;
            debug!(%bucket, page = *page, "Advanced page");
            true
        } else {
            false
        }
    }

    /// Scroll event handler: pages in only when `metrics` is near the bottom.
    pub fn on_scroll(&mut self, bucket: Bucket, metrics: ScrollMetrics) -> bool {
        metrics.near_bottom() && self.scroll_near_bottom(bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NO_URL, UNKNOWN_SOURCE};
    use reqwest::StatusCode;
    use std::cell::RefCell;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn items(prefix: &str, n: usize) -> Vec<NewsItem> {
        (0..n)
            .map(|i| NewsItem {
                category: "WORLD".to_string(),
                headline: format!("{prefix} {i}"),
                timestamp: "2025-05-06T08:00:00.000Z".to_string(),
                viral_score: 9.9,
                url: NO_URL.to_string(),
                source: UNKNOWN_SOURCE.to_string(),
                viewers: None,
                thumbnail: None,
                description: None,
            })
            .collect()
    }

    fn bundle(global: usize, tech: usize, ai: usize) -> NewsBundle {
        NewsBundle {
            global: items("g", global),
            tech: items("t", tech),
            ai: items("a", ai),
        }
    }

    fn visible(view: &ColumnView<'_>) -> usize {
        match view.state {
            ColumnState::Items(items) => items.len(),
            _ => 0,
        }
    }

    fn loaded(b: NewsBundle) -> FeedController {
        let mut c = FeedController::new(date(6), 3);
        let t = c.begin_load(date(6), false);
        assert_eq!(c.finish_load(t, Ok(b)), LoadOutcome::Live);
        c
    }

    /// Replays queued responses in order and records every request.
    struct ScriptedSource {
        bundles: RefCell<Vec<Result<NewsBundle, FeedError>>>,
        dates: Option<Vec<NaiveDate>>,
        requests: RefCell<Vec<(NaiveDate, bool)>>,
    }

    impl ScriptedSource {
        fn new(bundles: Vec<Result<NewsBundle, FeedError>>) -> Self {
            Self {
                bundles: RefCell::new(bundles),
                dates: None,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl BundleSource for ScriptedSource {
        async fn fetch_bundle(&self, date: NaiveDate, refresh: bool) -> Result<NewsBundle, FeedError> {
            self.requests.borrow_mut().push((date, refresh));
            self.bundles.borrow_mut().remove(0)
        }

        async fn fetch_dates(&self) -> Result<Vec<NaiveDate>, FeedError> {
            self.dates
                .clone()
                .ok_or(FeedError::Status(StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    #[test]
    fn test_pagination_seven_items_page_size_three() {
        let mut c = loaded(bundle(7, 0, 0));
        assert_eq!(visible(&c.render(Bucket::Global)), 3);

        assert!(c.scroll_near_bottom(Bucket::Global));
        assert_eq!(visible(&c.render(Bucket::Global)), 6);

        assert!(c.scroll_near_bottom(Bucket::Global));
        assert_eq!(visible(&c.render(Bucket::Global)), 7);
        assert_eq!(c.page(Bucket::Global), 3);

        assert!(!c.scroll_near_bottom(Bucket::Global));
        assert_eq!(visible(&c.render(Bucket::Global)), 7);
        assert_eq!(c.page(Bucket::Global), 3);
    }

    #[test]
    fn test_visible_items_are_leading_items_in_order() {
        let mut c = loaded(bundle(0, 5, 0));
        c.scroll_near_bottom(Bucket::Tech);
        let ColumnState::Items(shown) = c.render(Bucket::Tech).state else {
            panic!("expected items");
        };
        let headlines: Vec<_> = shown.iter().map(|i| i.headline.as_str()).collect();
        assert_eq!(headlines, ["t 0", "t 1", "t 2", "t 3", "t 4"]);
    }

    #[test]
    fn test_buckets_paginate_independently() {
        let mut c = loaded(bundle(9, 9, 0));
        c.scroll_near_bottom(Bucket::Global);
        assert_eq!(visible(&c.render(Bucket::Global)), 6);
        assert_eq!(visible(&c.render(Bucket::Tech)), 3);
    }

    #[test]
    fn test_ai_bucket_renders_everything_and_ignores_scroll() {
        let mut c = loaded(bundle(0, 0, 10));
        assert_eq!(visible(&c.render(Bucket::Ai)), 10);
        assert!(!c.scroll_near_bottom(Bucket::Ai));
        assert_eq!(c.page(Bucket::Ai), 1);
    }

    #[test]
    fn test_empty_bucket_renders_placeholder() {
        let c = loaded(bundle(2, 0, 0));
        let view = c.render(Bucket::Tech);
        assert_eq!(view.state, ColumnState::Empty);
        assert_eq!(view.count_label.as_deref(), Some("00 LOCAL"));
    }

    #[test]
    fn test_count_label_uses_total_not_visible() {
        let c = loaded(bundle(7, 0, 0));
        assert_eq!(c.render(Bucket::Global).count_label.as_deref(), Some("7 REPORTS"));
    }

    #[test]
    fn test_loading_state_renders_placeholder_and_blocks_scroll() {
        let mut c = loaded(bundle(7, 0, 0));
        c.begin_load(date(7), false);
        assert!(c.is_loading());
        for bucket in Bucket::ALL {
            assert_eq!(c.render(bucket).state, ColumnState::Loading);
        }
        assert!(!c.scroll_near_bottom(Bucket::Global));
    }

    #[test]
    fn test_failure_shows_fallback_then_success_replaces_it() {
        let mut c = FeedController::new(date(6), 3);
        let t = c.begin_load(date(6), false);
        let err = FeedError::Status(StatusCode::BAD_GATEWAY);
        assert_eq!(c.finish_load(t, Err(err)), LoadOutcome::Fallback);
        assert_eq!(c.connectivity(), Connectivity::Disconnected);
        assert_eq!(c.bundle().unwrap().global.len(), 5);
        assert!(c.scroll_near_bottom(Bucket::Global));
        assert_eq!(c.page(Bucket::Global), 2);

        let t = c.begin_load(date(6), false);
        assert_eq!(c.finish_load(t, Ok(bundle(1, 1, 1))), LoadOutcome::Live);
        assert_eq!(c.connectivity(), Connectivity::Connected);
        assert_eq!(c.bundle(), Some(&bundle(1, 1, 1)));
        assert_eq!(c.page(Bucket::Global), 1);
    }

    #[test]
    fn test_new_bundle_resets_cursors() {
        let mut c = loaded(bundle(9, 9, 0));
        c.scroll_near_bottom(Bucket::Global);
        c.scroll_near_bottom(Bucket::Tech);
        let t = c.begin_load(date(7), false);
        c.finish_load(t, Ok(bundle(9, 9, 0)));
        assert_eq!(c.page(Bucket::Global), 1);
        assert_eq!(c.page(Bucket::Tech), 1);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut c = FeedController::new(date(6), 3);
        let older = c.begin_load(date(5), false);
        let newer = c.begin_load(date(6), false);

        assert_eq!(c.finish_load(newer, Ok(bundle(2, 0, 0))), LoadOutcome::Live);
        assert_eq!(c.finish_load(older, Ok(bundle(8, 8, 8))), LoadOutcome::Stale);
        assert_eq!(c.bundle(), Some(&bundle(2, 0, 0)));
        assert_eq!(c.selected_date(), date(6));
    }

    #[test]
    fn test_stale_failure_does_not_flip_connectivity() {
        let mut c = FeedController::new(date(6), 3);
        let older = c.begin_load(date(5), false);
        let newer = c.begin_load(date(6), false);
        let err = FeedError::Ingest("boom".to_string());
        assert_eq!(c.finish_load(older, Err(err)), LoadOutcome::Stale);
        assert!(c.is_loading());
        assert_eq!(c.connectivity(), Connectivity::Unknown);
        c.finish_load(newer, Ok(bundle(1, 0, 0)));
        assert_eq!(c.connectivity(), Connectivity::Connected);
    }

    #[test]
    fn test_on_scroll_respects_threshold() {
        let mut c = loaded(bundle(7, 0, 0));
        let far = ScrollMetrics { top: 0.0, client_height: 300.0, scroll_height: 600.0 };
        assert!(!c.on_scroll(Bucket::Global, far));
        let near = ScrollMetrics { top: 285.0, client_height: 300.0, scroll_height: 600.0 };
        assert!(c.on_scroll(Bucket::Global, near));
        assert_eq!(c.page(Bucket::Global), 2);
    }

    #[tokio::test]
    async fn test_sync_forces_refresh_of_selected_date() {
        let src = ScriptedSource::new(vec![Ok(bundle(1, 0, 0)), Ok(bundle(2, 0, 0))]);
        let mut c = FeedController::new(date(6), 3);
        c.load(&src, date(4), false).await;
        assert_eq!(c.sync(&src).await, LoadOutcome::Live);
        assert_eq!(*src.requests.borrow(), vec![(date(4), false), (date(4), true)]);
        assert_eq!(c.bundle().unwrap().global.len(), 2);
    }

    #[tokio::test]
    async fn test_init_falls_back_to_today_when_dates_fail() {
        let src = ScriptedSource::new(vec![Ok(bundle(1, 0, 0))]);
        let mut c = FeedController::new(date(6), 3);
        assert_eq!(c.init(&src, date(6)).await, LoadOutcome::Live);
        assert_eq!(c.available_dates(), &[date(6)]);
    }

    #[tokio::test]
    async fn test_init_uses_server_dates() {
        let mut src = ScriptedSource::new(vec![Err(FeedError::Ingest("down".to_string()))]);
        src.dates = Some(vec![date(4), date(5)]);
        let mut c = FeedController::new(date(6), 3);
        assert_eq!(c.init(&src, date(6)).await, LoadOutcome::Fallback);
        assert_eq!(c.available_dates(), &[date(4), date(5)]);
    }

    #[tokio::test]
    async fn test_open_past_date_requests_only_that_date() {
        let mut src = ScriptedSource::new(vec![Ok(bundle(2, 0, 0))]);
        src.dates = Some(vec![date(4), date(6)]);
        let mut c = FeedController::new(date(6), 3);

        c.refresh_dates(&src, date(6)).await;
        assert_eq!(c.load(&src, date(4), false).await, LoadOutcome::Live);

        assert_eq!(*src.requests.borrow(), vec![(date(4), false)]);
        assert_eq!(c.selected_date(), date(4));
        assert_eq!(c.available_dates(), &[date(4), date(6)]);
    }
}
