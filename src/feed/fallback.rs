//! Embedded sample bundle shown when the live feed can't be reached.
//!
//! Timestamps are stamped at call time so the cards read as "today".

use crate::models::{NO_URL, NewsBundle, NewsItem, UNKNOWN_SOURCE};
use crate::utils::now_iso;

struct Sample {
    category: &'static str,
    headline: &'static str,
    description: Option<&'static str>,
    thumbnail: Option<&'static str>,
    viral_score: f64,
    viewers: Option<&'static str>,
}

const GLOBAL: &[Sample] = &[
    Sample {
        category: "BREAKING",
        headline: "Quantum Supremacy: Global Banking Protocol Breach Detected",
        description: Some(
            "Unprecedented anomalies detected across global financial networks. Intelligence agencies are investigating potential breaches in core cryptographic protocols.",
        ),
        thumbnail: Some("https://images.unsplash.com/photo-1639322537228-f710d846310a?auto=format&fit=crop&q=80&w=400"),
        viral_score: 9.8,
        viewers: None,
    },
    Sample {
        category: "POLITICS",
        headline: "Mars Colony Charter Signed by 140 Nations",
        description: Some(
            "Leaders from 140 nations signed the Mars Colony Charter, establishing sovereignty rules and resource sharing agreements for extra-planetary settlements.",
        ),
        thumbnail: Some("https://images.unsplash.com/photo-1614728263952-84ea256f9679?auto=format&fit=crop&q=80&w=400"),
        viral_score: 7.2,
        viewers: None,
    },
    Sample {
        category: "WORLD",
        headline: "Arctic Digital Infrastructure Hub Announced",
        description: Some(
            "A coalition of tech companies plans the largest cooling-efficient data center network in the Arctic circle.",
        ),
        thumbnail: Some("https://images.unsplash.com/photo-1541888045-8c764ee7119f?auto=format&fit=crop&q=80&w=400"),
        viral_score: 6.5,
        viewers: None,
    },
    Sample {
        category: "BREAKING",
        headline: "European Central Bank Transitions to Fully Digital Currency",
        description: Some(
            "The ECB has finalized its five-year transition, phasing out physical cash in favor of instant digital settlement.",
        ),
        thumbnail: Some("https://images.unsplash.com/photo-1621504450181-5d356f153325?auto=format&fit=crop&q=80&w=400"),
        viral_score: 8.9,
        viewers: None,
    },
    Sample {
        category: "WORLD",
        headline: "New Oceanic Clean-up Fleet Recovers 1 Million Tons of Plastic",
        description: Some(
            "Autonomous nautical drones deployed last year have cleared large garbage patches in the Pacific, recycling the material on board.",
        ),
        thumbnail: Some("https://images.unsplash.com/photo-1594514578842-feae2d89ae83?auto=format&fit=crop&q=80&w=400"),
        viral_score: 8.1,
        viewers: None,
    },
];

const TECH: &[Sample] = &[
    Sample {
        category: "ECONOMY",
        headline: "Kuala Lumpur Becomes Southeast Asia's Premier AI Hub",
        description: None,
        thumbnail: None,
        viral_score: 8.5,
        viewers: None,
    },
    Sample {
        category: "TECH",
        headline: "Penang Semiconductor Corridor Announces Next-Gen Neural Chips",
        description: None,
        thumbnail: None,
        viral_score: 6.9,
        viewers: None,
    },
    Sample {
        category: "TECH",
        headline: "OpenAI Releases GPT-5 with Multimodal Reasoning",
        description: None,
        thumbnail: None,
        viral_score: 9.2,
        viewers: None,
    },
];

const AI: &[Sample] = &[
    Sample {
        category: "LIVE STREAM",
        headline: "NVIDIA CEO Unveils 'Project Blackwell' - The Last Human-Designed Architecture?",
        description: None,
        thumbnail: Some("https://i.ytimg.com/vi/pGU1W-F7oD0/hq720.jpg"),
        viral_score: 9.9,
        viewers: Some("22.4K"),
    },
    Sample {
        category: "SYNTHETIC MEDIA",
        headline: "The Rise of AI YouTubers: Why Real Humans are Losing the Algorithm War",
        description: None,
        thumbnail: Some("https://i.ytimg.com/vi/-OKcDp2H4eU/hq720.jpg"),
        viral_score: 8.1,
        viewers: None,
    },
    Sample {
        category: "AI",
        headline: "Claude 4 Passes Medical Board Exam with 99.7% Accuracy",
        description: None,
        thumbnail: Some("https://i.ytimg.com/vi/KldVQBAkjuo/hq720.jpg"),
        viral_score: 9.4,
        viewers: None,
    },
];

fn stamp(samples: &[Sample], timestamp: &str) -> Vec<NewsItem> {
    samples
        .iter()
        .map(|s| NewsItem {
            category: s.category.to_string(),
            headline: s.headline.to_string(),
            timestamp: timestamp.to_string(),
            viral_score: s.viral_score,
            url: NO_URL.to_string(),
            source: UNKNOWN_SOURCE.to_string(),
            viewers: s.viewers.map(str::to_string),
            thumbnail: s.thumbnail.map(str::to_string),
            description: s.description.map(str::to_string),
        })
        .collect()
}

pub fn fallback_bundle() -> NewsBundle {
    let now = now_iso();
    NewsBundle {
        global: stamp(GLOBAL, &now),
        tech: stamp(TECH, &now),
        ai: stamp(AI, &now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let bundle = fallback_bundle();
        assert_eq!(bundle.global.len(), 5);
        assert_eq!(bundle.tech.len(), 3);
        assert_eq!(bundle.ai.len(), 3);
        assert!(bundle.global.iter().all(|i| i.description.is_some()));
        assert_eq!(bundle.ai[0].viewers.as_deref(), Some("22.4K"));
    }
}
