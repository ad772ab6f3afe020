use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::models::Sentiment;
use crate::pipeline::{CleaningReport, FrequencyTable, LabelCounts};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenCount {
    pub token: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentCount {
    pub sentiment: Sentiment,
    pub total: usize,
}

/// Summary of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub cleaning: CleaningReport,
    pub scored: usize,
    pub tokens: usize,
    pub vocabulary: usize,
    pub top_tokens: Vec<TokenCount>,
    pub sentiments: Vec<SentimentCount>,
}

impl Report {
    pub fn build(
        model: &str,
        cleaning: CleaningReport,
        frequency: &FrequencyTable,
        labels: &LabelCounts,
        top_k: usize,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            model: model.to_string(),
            cleaning,
            scored: labels.total(),
            tokens: frequency.total(),
            vocabulary: frequency.len(),
            top_tokens: frequency
                .top_k(top_k)
                .into_iter()
                .map(|(token, count)| TokenCount { token, count })
                .collect(),
            sentiments: labels
                .table()
                .into_iter()
                .map(|(sentiment, total)| SentimentCount { sentiment, total })
                .collect(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let c = &self.cleaning;
        let _ = writeln!(
            out,
            "Posts: {} read, {} kept ({} empty, {} with links, {} noise, {} duplicates dropped)",
            c.input,
            c.output,
            c.dropped_empty,
            c.dropped_links,
            c.dropped_noise,
            c.dropped_duplicates
        );
        let _ = writeln!(out, "Tokens: {} ({} distinct)", self.tokens, self.vocabulary);

        let _ = writeln!(out, "\nMost common words:");
        for (rank, entry) in self.top_tokens.iter().enumerate() {
            let _ = writeln!(out, "{:>4}. {:<24} {}", rank + 1, entry.token, entry.count);
        }

        let _ = writeln!(out, "\nSentiment of {} posts ({}):", self.scored, self.model);
        let _ = writeln!(out, "{:<10} {:>12}", "Sentiment", "Total Tweets");
        for row in &self.sentiments {
            let _ = writeln!(out, "{:<10} {:>12}", row.sentiment.as_str(), row.total);
        }
        out
    }
}
