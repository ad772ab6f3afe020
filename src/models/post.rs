use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Sentiment;

/// A single collected post. Never mutated after collection; cleaning builds a
/// new `Post` with the normalized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    /// Character length of the text as collected.
    pub len: usize,
    pub created_at: DateTime<Utc>,
    pub source: String,
    pub likes: u64,
    pub reposts: u64,
}

impl Post {
    pub fn with_text(&self, text: String) -> Self {
        Self {
            text,
            source: self.source.clone(),
            ..*self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPost {
    pub post: Post,
    pub probability: f64,
    pub sentiment: Sentiment,
}

impl ScoredPost {
    pub fn new(post: Post, probability: f64) -> Self {
        Self {
            post,
            probability,
            sentiment: Sentiment::from_probability(probability),
        }
    }
}
