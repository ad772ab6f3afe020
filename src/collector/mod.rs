mod twitter;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Post;

pub use twitter::TwitterSearch;

/// Date range in the `YYYYMMDDHHmm` form the search API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub topic: String,
    pub window: DateWindow,
    pub max_items: usize,
}

/// A service that returns at most `query.max_items` posts matching a topic.
pub trait PostSource {
    fn fetch(&self, query: &SearchQuery) -> impl Future<Output = Result<Vec<Post>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    struct CannedSource(Vec<Post>);

    impl PostSource for CannedSource {
        async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Post>> {
            Ok(self.0.iter().take(query.max_items).cloned().collect())
        }
    }

    #[test]
    fn stub_sources_honor_the_item_bound() {
        let posts: Vec<Post> = (0..5)
            .map(|id| Post {
                id,
                text: format!("post {}", id),
                len: 6,
                created_at: Utc::now(),
                source: "web".to_string(),
                likes: 0,
                reposts: 0,
            })
            .collect();
        let query = SearchQuery {
            topic: "#Elecciones4M".to_string(),
            window: DateWindow {
                from: "202105040900".to_string(),
                to: "202105042300".to_string(),
            },
            max_items: 3,
        };
        let fetched = tokio_test::block_on(CannedSource(posts).fetch(&query)).unwrap();
        assert_eq!(fetched.len(), 3);
    }
}
