use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Post, ScoredPost, Sentiment};

pub(super) const RAW_HEADER: [&str; 7] = ["Tweets", "len", "ID", "Date", "Source", "Likes", "RTs"];
pub(super) const PREPARED_HEADER: [&str; 7] = ["ID", "Tweets", "len", "Date", "Source", "Likes", "RTs"];
pub(super) const SCORED_HEADER: [&str; 9] = [
    "ID",
    "Tweets",
    "len",
    "Date",
    "Source",
    "Likes",
    "RTs",
    "sentiment_probability",
    "sentiment",
];

/// Raw collection layout. Reading goes by header name, so the prepared layout
/// with `ID` first parses too.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct PostRow {
    #[serde(rename = "Tweets")]
    pub text: Option<String>,
    pub len: Option<usize>,
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Source")]
    pub source: Option<String>,
    #[serde(rename = "Likes")]
    pub likes: u64,
    #[serde(rename = "RTs")]
    pub reposts: u64,
}

impl From<&Post> for PostRow {
    fn from(post: &Post) -> Self {
        Self {
            text: Some(post.text.clone()),
            len: Some(post.len),
            id: post.id,
            date: format_datetime(&post.created_at),
            source: Some(post.source.clone()),
            likes: post.likes,
            reposts: post.reposts,
        }
    }
}

/// Cleaned layout, indexed by `ID`.
#[derive(Debug, Serialize)]
pub(super) struct PreparedRow<'a> {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Tweets")]
    pub text: &'a str,
    pub len: usize,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Source")]
    pub source: &'a str,
    #[serde(rename = "Likes")]
    pub likes: u64,
    #[serde(rename = "RTs")]
    pub reposts: u64,
}

impl<'a> From<&'a Post> for PreparedRow<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            id: post.id,
            text: &post.text,
            len: post.len,
            date: format_datetime(&post.created_at),
            source: &post.source,
            likes: post.likes,
            reposts: post.reposts,
        }
    }
}

/// Cleaned layout plus the classifier output.
#[derive(Debug, Serialize)]
pub(super) struct ScoredRow<'a> {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Tweets")]
    pub text: &'a str,
    pub len: usize,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Source")]
    pub source: &'a str,
    #[serde(rename = "Likes")]
    pub likes: u64,
    #[serde(rename = "RTs")]
    pub reposts: u64,
    pub sentiment_probability: f64,
    pub sentiment: Sentiment,
}

impl<'a> From<&'a ScoredPost> for ScoredRow<'a> {
    fn from(scored: &'a ScoredPost) -> Self {
        let post = &scored.post;
        Self {
            id: post.id,
            text: &post.text,
            len: post.len,
            date: format_datetime(&post.created_at),
            source: &post.source,
            likes: post.likes,
            reposts: post.reposts,
            sentiment_probability: scored.probability,
            sentiment: scored.sentiment,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct LabeledRow {
    pub text: String,
    pub label: u8,
}

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S%:z").to_string()
}

pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // RFC3339 (e.g., "2021-05-04T21:00:00+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Spreadsheet export with offset (e.g., "2021-05-04 21:00:00+00:00")
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    // SQLite datetime format (e.g., "2021-05-04 21:00:00")
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}
