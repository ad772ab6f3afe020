use std::collections::HashMap;

use crate::models::Sentiment;

/// Number of posts per sentiment label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCounts {
    counts: HashMap<Sentiment, usize>,
    total: usize,
}

impl LabelCounts {
    pub fn aggregate(labels: impl IntoIterator<Item = Sentiment>) -> Self {
        let mut aggregate = Self::default();
        for label in labels {
            *aggregate.counts.entry(label).or_insert(0) += 1;
            aggregate.total += 1;
        }
        aggregate
    }

    #[cfg(test)]
    pub fn get(&self, label: Sentiment) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Labels that occurred, most frequent first; ties fall back to
    /// Positive, Neutral, Negative.
    pub fn table(&self) -> Vec<(Sentiment, usize)> {
        let mut rows: Vec<(Sentiment, usize)> = self.counts.iter().map(|(l, c)| (*l, *c)).collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        rows
    }
}
