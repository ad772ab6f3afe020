use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const POSITIVE_THRESHOLD: f64 = 0.5;
pub const NEGATIVE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Maps a positive-class probability to a label. Only an exact 0.5 is
    /// neutral.
    ///
    /// The probability must already be validated to lie in `[0, 1]`;
    /// `score_posts` rejects NaN and out-of-range scores before labeling.
    pub fn from_probability(probability: f64) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&probability),
            "probability {probability} outside [0, 1]"
        );
        if probability > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if probability < NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(Sentiment::Positive),
            "Neutral" => Ok(Sentiment::Neutral),
            "Negative" => Ok(Sentiment::Negative),
            other => Err(format!("unknown sentiment label: {}", other)),
        }
    }
}
