//! Map raw provider results onto canonical [`NewsItem`]s.
//!
//! Provider order is trusted as rank: the input is cut to the first `cap`
//! items, categories rotate through the bucket's labels by position, and the
//! viral score is a position-derived display heuristic:
//!
//! ```text
//! viralScore = round1(9.9 - 0.8 * i + 0.5 * jitter)    jitter in [0, 1)
//! ```
//!
//! The jitter is drawn from a [`Jitter`] so tests can pin it.

use crate::models::{NO_URL, NewsItem, UNKNOWN_SOURCE};
use crate::utils::now_iso;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

pub const DEFAULT_CAP: usize = 10;
pub const HEADLINE_PLACEHOLDER: &str = "News Update";
/// Category used when a bucket is configured with no labels.
pub const FALLBACK_CATEGORY: &str = "NEWS";

const TOP_SCORE: f64 = 9.9;
const SCORE_STEP: f64 = 0.8;
const JITTER_SPAN: f64 = 0.5;

/// Source of the `[0, 1)` values used for score and gauge jitter.
#[derive(Debug, Clone)]
pub enum Jitter {
    Random(StdRng),
    /// Always yields the same value. Used to pin scores in tests.
    Fixed(f64),
}

impl Jitter {
    pub fn from_os_rng() -> Self {
        Jitter::Random(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Jitter::Random(StdRng::seed_from_u64(seed))
    }

    pub fn sample(&mut self) -> f64 {
        match self {
            Jitter::Random(rng) => rng.random::<f64>(),
            Jitter::Fixed(v) => *v,
        }
    }
}

/// Deterministic part of the viral score for rank `index`.
pub fn base_score(index: usize) -> f64 {
    TOP_SCORE - index as f64 * SCORE_STEP
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Normalize up to `cap` provider results into canonical items.
pub fn normalize_results(
    results: &[Value],
    labels: &[String],
    cap: usize,
    jitter: &mut Jitter,
) -> Vec<NewsItem> {
    results
        .iter()
        .take(cap)
        .enumerate()
        .map(|(i, raw)| {
            let category = if labels.is_empty() {
                FALLBACK_CATEGORY.to_string()
            } else {
                labels[i % labels.len()].clone()
            };
            NewsItem {
                category,
                headline: first_text(raw, &["title", "snippet"])
                    .unwrap_or_else(|| HEADLINE_PLACEHOLDER.to_string()),
                timestamp: first_text(raw, &["date", "published_date"]).unwrap_or_else(now_iso),
                viral_score: round1(base_score(i) + jitter.sample() * JITTER_SPAN),
                url: first_text(raw, &["link"]).unwrap_or_else(|| NO_URL.to_string()),
                source: resolve_source(raw),
                viewers: raw.get("views").and_then(format_viewers),
                thumbnail: resolve_thumbnail(raw),
                description: None,
            }
        })
        .collect()
}

/// First non-empty string among `keys`, in order.
fn first_text(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| raw.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// `{"name": ".."}` objects or plain strings.
fn name_of(v: Option<&Value>) -> Option<String> {
    let v = v?;
    let s = v.as_str().or_else(|| v.get("name").and_then(Value::as_str))?;
    (!s.is_empty()).then(|| s.to_string())
}

fn resolve_source(raw: &Value) -> String {
    name_of(raw.get("source"))
        .or_else(|| name_of(raw.get("channel")))
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
}

fn resolve_thumbnail(raw: &Value) -> Option<String> {
    let thumb = raw.get("thumbnail")?;
    thumb
        .get("static")
        .and_then(Value::as_str)
        .or_else(|| thumb.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `22431` → `"22.4K"`. Zero or non-numeric counts produce no value.
fn format_viewers(views: &Value) -> Option<String> {
    let n = views.as_f64().filter(|n| *n > 0.0)?;
    Some(format!("{:.1}K", n / 1000.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn titled(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({"title": format!("story {i}")})).collect()
    }

    #[test]
    fn test_output_length_is_min_of_input_and_cap() {
        let l = labels(&["A"]);
        let mut j = Jitter::Fixed(0.0);
        assert_eq!(normalize_results(&titled(4), &l, 10, &mut j).len(), 4);
        assert_eq!(normalize_results(&titled(10), &l, 10, &mut j).len(), 10);
        assert_eq!(normalize_results(&titled(15), &l, 10, &mut j).len(), 10);
        assert!(normalize_results(&[], &l, 10, &mut j).is_empty());
    }

    #[test]
    fn test_truncation_keeps_first_n_in_order() {
        let out = normalize_results(&titled(5), &labels(&["A"]), 2, &mut Jitter::Fixed(0.0));
        assert_eq!(out[0].headline, "story 0");
        assert_eq!(out[1].headline, "story 1");
    }

    #[test]
    fn test_categories_rotate_by_position() {
        let l = labels(&["BREAKING", "WORLD", "POLITICS"]);
        let out = normalize_results(&titled(7), &l, 10, &mut Jitter::seeded(7));
        for (i, item) in out.iter().enumerate() {
            assert_eq!(item.category, l[i % l.len()]);
        }
    }

    #[test]
    fn test_empty_labels_fall_back() {
        let out = normalize_results(&titled(2), &[], 10, &mut Jitter::Fixed(0.0));
        assert!(out.iter().all(|i| i.category == FALLBACK_CATEGORY));
    }

    #[test]
    fn test_base_score_with_zero_jitter() {
        let out = normalize_results(&titled(10), &labels(&["A"]), 10, &mut Jitter::Fixed(0.0));
        let scores: Vec<f64> = out.iter().map(|i| i.viral_score).collect();
        assert_eq!(
            scores,
            [9.9, 9.1, 8.3, 7.5, 6.7, 5.9, 5.1, 4.3, 3.5, 2.7]
        );
    }

    #[test]
    fn test_jitter_is_bounded() {
        let mut j = Jitter::seeded(42);
        for _ in 0..20 {
            let out = normalize_results(&titled(10), &labels(&["A"]), 10, &mut j);
            for (i, item) in out.iter().enumerate() {
                let delta = item.viral_score - base_score(i);
                assert!((-0.05..=0.55).contains(&delta), "index {i} delta {delta}");
            }
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let a = normalize_results(&titled(5), &labels(&["A"]), 10, &mut Jitter::seeded(1));
        let b = normalize_results(&titled(5), &labels(&["A"]), 10, &mut Jitter::seeded(1));
        let sa: Vec<f64> = a.iter().map(|i| i.viral_score).collect();
        let sb: Vec<f64> = b.iter().map(|i| i.viral_score).collect();
        assert_eq!(sa, sb);
    }

    #[test]
    fn test_field_fallbacks_on_bare_item() {
        let out = normalize_results(&[json!({})], &labels(&["A"]), 10, &mut Jitter::Fixed(0.0));
        let item = &out[0];
        assert_eq!(item.headline, HEADLINE_PLACEHOLDER);
        assert_eq!(item.url, "#");
        assert_eq!(item.source, "Unknown");
        assert!(item.timestamp.ends_with('Z'));
        assert_eq!(item.viewers, None);
        assert_eq!(item.thumbnail, None);
        assert_eq!(item.description, None);
    }

    #[test]
    fn test_headline_prefers_title_then_snippet() {
        let raw = [
            json!({"title": "Title", "snippet": "Snippet"}),
            json!({"title": "", "snippet": "Snippet"}),
        ];
        let out = normalize_results(&raw, &labels(&["A"]), 10, &mut Jitter::Fixed(0.0));
        assert_eq!(out[0].headline, "Title");
        assert_eq!(out[1].headline, "Snippet");
    }

    #[test]
    fn test_google_news_item() {
        let raw = json!({
            "title": "Markets rally",
            "link": "https://example.com/rally",
            "date": "05/06/2025, 07:00 AM, +0000 UTC",
            "source": {"name": "Reuters", "icon": "https://example.com/i.png"},
            "thumbnail": "https://example.com/t.jpg"
        });
        let item = &normalize_results(&[raw], &labels(&["A"]), 10, &mut Jitter::Fixed(0.0))[0];
        assert_eq!(item.url, "https://example.com/rally");
        assert_eq!(item.timestamp, "05/06/2025, 07:00 AM, +0000 UTC");
        assert_eq!(item.source, "Reuters");
        assert_eq!(item.thumbnail.as_deref(), Some("https://example.com/t.jpg"));
    }

    #[test]
    fn test_youtube_item() {
        let raw = json!({
            "title": "Clip",
            "link": "https://youtube.com/watch?v=x",
            "published_date": "2 days ago",
            "channel": {"name": "Channel"},
            "views": 22431,
            "thumbnail": {"static": "https://i.ytimg.com/s.jpg", "rich": "https://i.ytimg.com/r.webp"}
        });
        let item = &normalize_results(&[raw], &labels(&["A"]), 10, &mut Jitter::Fixed(0.0))[0];
        assert_eq!(item.source, "Channel");
        assert_eq!(item.timestamp, "2 days ago");
        assert_eq!(item.viewers.as_deref(), Some("22.4K"));
        assert_eq!(item.thumbnail.as_deref(), Some("https://i.ytimg.com/s.jpg"));
    }

    #[test]
    fn test_thumbnail_object_without_static_is_absent() {
        let raw = json!({"thumbnail": {"rich": "https://i.ytimg.com/r.webp"}});
        let item = &normalize_results(&[raw], &labels(&["A"]), 10, &mut Jitter::Fixed(0.0))[0];
        assert_eq!(item.thumbnail, None);
    }

    #[test]
    fn test_viewers_absent_for_zero_or_text_counts() {
        assert_eq!(format_viewers(&json!(0)), None);
        assert_eq!(format_viewers(&json!("1,234 views")), None);
        assert_eq!(format_viewers(&json!(950)).as_deref(), Some("0.9K"));
        assert_eq!(format_viewers(&json!(1_500_000)).as_deref(), Some("1500.0K"));
    }
}
