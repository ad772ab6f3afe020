mod naive_bayes;

pub use naive_bayes::NaiveBayesModel;

use crate::error::{AppError, Result};
use crate::models::{Post, ScoredPost};

/// A pretrained classifier returning the probability that a text is positive.
pub trait SentimentScorer {
    fn score(&self, text: &str) -> Result<f64>;

    fn name(&self) -> &str;
}

/// Scores every post on its cleaned text. The first failure aborts the whole
/// stage; no post is ever given a default label.
pub fn score_posts<S>(scorer: &S, posts: Vec<Post>) -> Result<Vec<ScoredPost>>
where
    S: SentimentScorer + ?Sized,
{
    let mut scored = Vec::with_capacity(posts.len());
    for post in posts {
        let probability = scorer.score(&post.text)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(AppError::Classifier(format!(
                "{} returned {} for post {}",
                scorer.name(),
                probability,
                post.id
            )));
        }
        tracing::debug!(id = post.id, probability, "Scored post");
        scored.push(ScoredPost::new(post, probability));
    }
    tracing::info!(posts = scored.len(), model = scorer.name(), "Scored sentiment");
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use chrono::Utc;

    struct FixedScorer(f64);

    impl SentimentScorer for FixedScorer {
        fn score(&self, _text: &str) -> Result<f64> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Unavailable;

    impl SentimentScorer for Unavailable {
        fn score(&self, _text: &str) -> Result<f64> {
            Err(AppError::ClassifierUnavailable("offline".to_string()))
        }

        fn name(&self) -> &str {
            "offline"
        }
    }

    fn post(id: i64) -> Post {
        Post {
            id,
            text: format!("texto {}", id),
            len: 7,
            created_at: Utc::now(),
            source: String::new(),
            likes: 0,
            reposts: 0,
        }
    }

    #[test]
    fn labels_follow_probability() {
        let scored = score_posts(&FixedScorer(0.5), vec![post(1), post(2)]).unwrap();
        assert!(scored.iter().all(|s| s.sentiment == Sentiment::Neutral));
        assert_eq!(scored[1].post.id, 2);
    }

    #[test]
    fn unavailable_classifier_fails_the_stage() {
        let err = score_posts(&Unavailable, vec![post(1)]).unwrap_err();
        assert!(matches!(err, AppError::ClassifierUnavailable(_)));
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        assert!(score_posts(&FixedScorer(1.5), vec![post(1)]).is_err());
        assert!(score_posts(&FixedScorer(f64::NAN), vec![post(1)]).is_err());
    }

    #[test]
    fn works_through_a_trait_object() {
        let scorer: Box<dyn SentimentScorer> = Box::new(FixedScorer(0.9));
        let scored = score_posts(scorer.as_ref(), vec![post(1)]).unwrap();
        assert_eq!(scored[0].sentiment, Sentiment::Positive);
    }
}
