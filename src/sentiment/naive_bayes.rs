use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{AppError, Result};

use super::SentimentScorer;

/// Log-probabilities of one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassLogProb {
    pub negative: f64,
    pub positive: f64,
}

/// Binary multinomial naive Bayes over lowercased words.
///
/// Words missing from the vocabulary are ignored, so a text made only of
/// unknown words scores the prior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    pub name: String,
    pub log_prior: ClassLogProb,
    pub vocabulary: HashMap<String, ClassLogProb>,
}

impl NaiveBayesModel {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::ClassifierUnavailable(format!("cannot read model {}: {}", path.display(), e))
        })?;
        let model: NaiveBayesModel = serde_json::from_str(&content).map_err(|e| {
            AppError::ClassifierUnavailable(format!("invalid model {}: {}", path.display(), e))
        })?;
        tracing::info!(
            model = %model.name,
            words = model.vocabulary.len(),
            "Loaded sentiment model"
        );
        Ok(model)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Trains on `(text, is_positive)` pairs with additive smoothing `alpha`.
    pub fn fit<'a>(
        name: impl Into<String>,
        documents: impl IntoIterator<Item = (&'a str, bool)>,
        alpha: f64,
    ) -> Result<Self> {
        if alpha <= 0.0 {
            return Err(AppError::Classifier(format!("smoothing must be positive, got {}", alpha)));
        }

        let mut docs = [0usize; 2];
        let mut words = [0usize; 2];
        let mut counts: HashMap<String, [usize; 2]> = HashMap::new();

        for (text, positive) in documents {
            let class = usize::from(positive);
            docs[class] += 1;
            for word in words_of(text) {
                counts.entry(word).or_insert([0, 0])[class] += 1;
                words[class] += 1;
            }
        }

        if docs[0] == 0 || docs[1] == 0 {
            return Err(AppError::Classifier(
                "training needs both positive and negative examples".to_string(),
            ));
        }

        let total_docs = (docs[0] + docs[1]) as f64;
        let vocab_size = counts.len() as f64;
        let denominator = |class: usize| words[class] as f64 + alpha * vocab_size;

        let vocabulary = counts
            .into_iter()
            .map(|(word, [neg, pos])| {
                let probs = ClassLogProb {
                    negative: ((neg as f64 + alpha) / denominator(0)).ln(),
                    positive: ((pos as f64 + alpha) / denominator(1)).ln(),
                };
                (word, probs)
            })
            .collect::<HashMap<_, _>>();

        tracing::info!(
            negative = docs[0],
            positive = docs[1],
            words = vocabulary.len(),
            "Trained naive Bayes model"
        );

        Ok(Self {
            name: name.into(),
            log_prior: ClassLogProb {
                negative: (docs[0] as f64 / total_docs).ln(),
                positive: (docs[1] as f64 / total_docs).ln(),
            },
            vocabulary,
        })
    }

    /// Log-odds of the positive class.
    pub fn log_odds(&self, text: &str) -> f64 {
        words_of(text)
            .filter_map(|word| self.vocabulary.get(&word))
            .fold(self.log_prior.positive - self.log_prior.negative, |acc, p| {
                acc + p.positive - p.negative
            })
    }
}

impl SentimentScorer for NaiveBayesModel {
    fn score(&self, text: &str) -> Result<f64> {
        let log_odds = self.log_odds(text);
        if log_odds.is_nan() {
            return Err(AppError::Classifier(format!("{} produced NaN", self.name)));
        }
        Ok(logistic(log_odds))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn words_of(text: &str) -> impl Iterator<Item = String> + '_ {
    text.unicode_words().map(str::to_lowercase)
}

fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
