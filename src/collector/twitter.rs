use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Post;

use super::{PostSource, SearchQuery};

const SEARCH_API_URL: &str = "https://api.twitter.com/1.1/tweets/search/30day";
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

// The 30-day endpoint rejects pages outside 10..=100 on sandbox environments.
const MIN_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;

const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);
const MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(15 * 60);

static SOURCE_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a[^>]*>([^<]*)</a>").expect("valid source anchor regex"));

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Tweet>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    id: i64,
    text: String,
    created_at: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    favorite_count: u64,
    #[serde(default)]
    retweet_count: u64,
}

impl Tweet {
    fn into_post(self) -> Result<Post> {
        let created_at = DateTime::parse_from_str(&self.created_at, CREATED_AT_FORMAT)?;
        Ok(Post {
            id: self.id,
            len: self.text.chars().count(),
            text: self.text,
            created_at: created_at.with_timezone(&Utc),
            source: client_name(&self.source),
            likes: self.favorite_count,
            reposts: self.retweet_count,
        })
    }
}

/// Premium 30-day search. Follows the `next` cursor and sleeps through rate
/// limiting.
pub struct TwitterSearch {
    client: Client,
    endpoint: Url,
    bearer_token: String,
}

impl TwitterSearch {
    pub fn new(bearer_token: String, environment: &str) -> Result<Self> {
        let endpoint = Url::parse(&format!("{}/{}.json", SEARCH_API_URL, environment))
            .map_err(|e| AppError::Config(format!("invalid search environment {:?}: {}", environment, e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("election-sentiment/1.0")
            .build()?;
        Ok(Self {
            client,
            endpoint,
            bearer_token,
        })
    }

    async fn fetch_page(
        &self,
        query: &SearchQuery,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<SearchResponse> {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("query", &query.topic)
                .append_pair("fromDate", &query.window.from)
                .append_pair("toDate", &query.window.to)
                .append_pair("maxResults", &page_size.to_string());
            if let Some(cursor) = cursor {
                pairs.append_pair("next", cursor);
            }
        }

        loop {
            let response = self
                .client
                .get(url.clone())
                .bearer_auth(&self.bearer_token)
                .send()
                .await?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                let wait = rate_limit_wait(response.headers(), Utc::now());
                tracing::warn!("Search rate limited, waiting {}s", wait.as_secs());
                tokio::time::sleep(wait).await;
                continue;
            }

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await?;
                return Err(AppError::SearchApi(format!("HTTP {}: {}", status, body)));
            }

            return Ok(response.json().await?);
        }
    }
}

impl PostSource for TwitterSearch {
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Post>> {
        let mut posts = Vec::with_capacity(query.max_items);
        let mut cursor: Option<String> = None;

        while posts.len() < query.max_items {
            let page_size = (query.max_items - posts.len()).clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
            let page = self.fetch_page(query, page_size, cursor.as_deref()).await?;
            let received = page.results.len();

            for tweet in page.results {
                posts.push(tweet.into_post()?);
            }
            tracing::debug!("Fetched {} posts ({} total)", received, posts.len());

            match page.next {
                Some(next) if received > 0 => cursor = Some(next),
                _ => break,
            }
        }

        posts.truncate(query.max_items);
        tracing::info!(topic = %query.topic, posts = posts.len(), "Collected posts");
        Ok(posts)
    }
}

/// `<a href="...">Twitter for Android</a>` becomes `Twitter for Android`.
fn client_name(source: &str) -> String {
    SOURCE_ANCHOR
        .captures(source)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| source.to_string())
}

/// Time to wait before retrying, from the `x-rate-limit-reset` epoch header.
fn rate_limit_wait(headers: &HeaderMap, now: DateTime<Utc>) -> Duration {
    headers
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .map(|reset| {
            let secs = (reset - now.timestamp() + 1).max(1) as u64;
            Duration::from_secs(secs).min(MAX_RATE_LIMIT_WAIT)
        })
        .unwrap_or(DEFAULT_RATE_LIMIT_WAIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reqwest::header::HeaderValue;

    #[test]
    fn search_page_maps_to_posts() {
        let body = r#"{
            "results": [{
                "id": 1389714191007854593,
                "text": "RT @elmundoes: Ayuso arrasa #Elecciones4M https://t.c…",
                "created_at": "Tue May 04 21:58:59 +0000 2021",
                "source": "<a href=\"http://twitter.com/download/android\" rel=\"nofollow\">Twitter for Android</a>",
                "favorite_count": 0,
                "retweet_count": 57,
                "truncated": false
            }],
            "next": "eyJtYXhJZCI6MTM4OTcxNDE5MTAwNzg1NDU5M30=",
            "requestParameters": {"maxResults": 100}
        }"#;
        let page: SearchResponse = serde_json::from_str(body).unwrap();
        assert!(page.next.is_some());

        let post = page.results.into_iter().next().unwrap().into_post().unwrap();
        assert_eq!(post.id, 1389714191007854593);
        assert_eq!(post.source, "Twitter for Android");
        assert_eq!(post.reposts, 57);
        assert_eq!(post.len, post.text.chars().count());
        assert_eq!(post.created_at, Utc.with_ymd_and_hms(2021, 5, 4, 21, 58, 59).unwrap());
    }

    #[test]
    fn last_page_has_no_cursor() {
        let page: SearchResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(page.results.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn plain_source_is_kept() {
        assert_eq!(client_name("TweetDeck"), "TweetDeck");
    }

    #[test]
    fn rate_limit_wait_uses_reset_header() {
        let now = Utc.with_ymd_and_hms(2021, 5, 4, 21, 0, 0).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-rate-limit-reset",
            HeaderValue::from_str(&(now.timestamp() + 30).to_string()).unwrap(),
        );
        assert_eq!(rate_limit_wait(&headers, now), Duration::from_secs(31));

        headers.insert("x-rate-limit-reset", HeaderValue::from_static("0"));
        assert_eq!(rate_limit_wait(&headers, now), Duration::from_secs(1));

        assert_eq!(rate_limit_wait(&HeaderMap::new(), now), DEFAULT_RATE_LIMIT_WAIT);
    }

    #[test]
    fn rate_limit_wait_is_capped() {
        let now = Utc.with_ymd_and_hms(2021, 5, 4, 21, 0, 0).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-rate-limit-reset",
            HeaderValue::from_str(&(now.timestamp() + 86_400).to_string()).unwrap(),
        );
        assert_eq!(rate_limit_wait(&headers, now), MAX_RATE_LIMIT_WAIT);
    }

    #[test]
    fn environment_builds_endpoint() {
        let search = TwitterSearch::new("token".to_string(), "dev").unwrap();
        assert_eq!(
            search.endpoint.as_str(),
            "https://api.twitter.com/1.1/tweets/search/30day/dev.json"
        );
    }
}
