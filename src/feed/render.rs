//! Plain-text rendering of feed columns for the terminal.

use super::{ColumnState, ColumnView};
use crate::models::NewsItem;
use chrono::DateTime;
use itertools::Itertools;

/// Score band used to highlight hot items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViralTier {
    High,
    Medium,
    Normal,
}

impl ViralTier {
    pub fn of(score: f64) -> Self {
        if score >= 9.0 {
            ViralTier::High
        } else if score >= 7.0 {
            ViralTier::Medium
        } else {
            ViralTier::Normal
        }
    }

    fn marker(self) -> &'static str {
        match self {
            ViralTier::High => " [high]",
            ViralTier::Medium => " [medium]",
            ViralTier::Normal => "",
        }
    }
}

/// `HH:MM UTC` for RFC 3339 strings; anything else is shown verbatim.
pub fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.to_utc().format("%H:%M UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn card(item: &NewsItem) -> String {
    let mut lines = Vec::new();
    let corner = match &item.viewers {
        Some(v) => format!("{v} WATCHING"),
        None => format_timestamp(&item.timestamp),
    };
    lines.push(format!("[{}] {}", item.category, corner));
    lines.push(format!("  {}", item.headline));
    if let Some(thumb) = &item.thumbnail {
        lines.push(format!("  img: {thumb}"));
    }
    if let Some(desc) = &item.description {
        lines.push(format!("  {desc}"));
    }
    lines.push(format!(
        "  VIRAL SCORE {}/10{}  {}  {}",
        item.viral_score,
        ViralTier::of(item.viral_score).marker(),
        item.source,
        item.url
    ));
    lines.join("\n")
}

pub fn column(view: &ColumnView<'_>) -> String {
    let header = match &view.count_label {
        Some(label) => format!("== {} ({label}) ==", view.bucket.as_str().to_uppercase()),
        None => format!("== {} ==", view.bucket.as_str().to_uppercase()),
    };
    let body = match view.state {
        ColumnState::Loading => "Loading intelligence...".to_string(),
        ColumnState::Empty => {
            "NO DATA ARCHIVED\nHistorical feed unavailable for this date".to_string()
        }
        ColumnState::Items(items) => items.iter().map(card).join("\n\n"),
    };
    format!("{header}\n{body}")
}
