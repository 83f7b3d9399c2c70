//! The seven evidence categories. `Category::ALL` is the canonical order for
//! anything externally observed (contributors, breakdown).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Shipping,
    Quality,
    Influence,
    Complexity,
    Collaboration,
    Reliability,
    Novelty,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Shipping,
        Category::Quality,
        Category::Influence,
        Category::Complexity,
        Category::Collaboration,
        Category::Reliability,
        Category::Novelty,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Shipping => "shipping",
            Category::Quality => "quality",
            Category::Influence => "influence",
            Category::Complexity => "complexity",
            Category::Collaboration => "collaboration",
            Category::Reliability => "reliability",
            Category::Novelty => "novelty",
        }
    }

    /// Routing table for the dual-source path. `None` means the event type
    /// carries no scoring signal.
    pub fn for_event_type(kind: &str) -> Option<Category> {
        let c = match kind {
            "stars" | "forks" | "followers" | "total_stars" | "total_forks" => Category::Influence,
            "merged_pr" | "commit" => Category::Shipping,
            "language" => Category::Complexity,
            "twitter_followers"
            | "twitter_following"
            | "twitter_likes"
            | "twitter_retweets"
            | "twitter_mentions"
            | "twitter_engagement_rate"
            | "twitter_avg_retweets"
            | "twitter_hashtag_usage" => Category::Influence,
            "twitter_tweets" | "twitter_tweet" => Category::Novelty,
            "twitter_replies" | "twitter_avg_replies" => Category::Collaboration,
            "twitter_avg_likes" => Category::Quality,
            _ => return None,
        };
        Some(c)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
