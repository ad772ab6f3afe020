use rusqlite::params;
use tokio_rusqlite::Connection;

use crate::dataset::format_datetime;
use crate::error::Result;
use crate::models::{Post, ScoredPost};

use super::schema::SCHEMA;

/// SQLite archive of collected posts and their latest sentiment.
pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Post operations

    /// Inserts or refreshes posts by id. Returns how many rows were written.
    pub async fn upsert_posts(&self, posts: Vec<Post>) -> Result<usize> {
        let written = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut written = 0;
                {
                    let mut stmt = tx.prepare(
                        r#"INSERT INTO posts (id, text, len, created_at, source, likes, reposts)
                           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                           ON CONFLICT(id) DO UPDATE SET
                               text = excluded.text,
                               len = excluded.len,
                               created_at = excluded.created_at,
                               source = excluded.source,
                               likes = excluded.likes,
                               reposts = excluded.reposts,
                               collected_at = datetime('now')"#,
                    )?;
                    for post in &posts {
                        written += stmt.execute(params![
                            post.id,
                            post.text,
                            post.len as i64,
                            format_datetime(&post.created_at),
                            post.source,
                            post.likes as i64,
                            post.reposts as i64,
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(written)
            })
            .await?;
        Ok(written)
    }

    pub async fn count_posts(&self) -> Result<usize> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count as usize)
    }

    // Sentiment operations

    pub async fn save_sentiments(&self, scored: Vec<ScoredPost>, model: String) -> Result<()> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        r#"INSERT INTO sentiments (post_id, cleaned_text, probability, label, model)
                           VALUES (?1, ?2, ?3, ?4, ?5)
                           ON CONFLICT(post_id) DO UPDATE SET
                               cleaned_text = excluded.cleaned_text,
                               probability = excluded.probability,
                               label = excluded.label,
                               model = excluded.model,
                               scored_at = datetime('now')"#,
                    )?;
                    for row in &scored {
                        stmt.execute(params![
                            row.post.id,
                            row.post.text,
                            row.probability,
                            row.sentiment.as_str(),
                            model,
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

/// Queries that read the archive back.
#[cfg(test)]
mod read_back {
    use rusqlite::{params, OptionalExtension, Row};

    use crate::dataset::parse_datetime;
    use crate::error::Result;
    use crate::models::{Post, Sentiment};

    use super::Repository;

    #[derive(Debug, Clone, PartialEq)]
    pub struct StoredSentiment {
        pub post_id: i64,
        pub cleaned_text: String,
        pub probability: f64,
        pub sentiment: Sentiment,
        pub model: String,
    }

    impl Repository {
        pub async fn get_all_posts(&self) -> Result<Vec<Post>> {
            let posts = self
                .conn
                .call(|conn| {
                    let mut stmt = conn.prepare(
                        "SELECT id, text, len, created_at, source, likes, reposts FROM posts ORDER BY created_at, id",
                    )?;
                    let posts = stmt
                        .query_map([], post_from_row)?
                        .collect::<std::result::Result<Vec<_>, _>>()?;
                    Ok(posts)
                })
                .await?;
            Ok(posts)
        }

        pub async fn get_sentiment(&self, post_id: i64) -> Result<Option<StoredSentiment>> {
            let stored = self
                .conn
                .call(move |conn| {
                    let mut stmt = conn.prepare(
                        "SELECT post_id, cleaned_text, probability, label, model FROM sentiments WHERE post_id = ?1",
                    )?;
                    let stored = stmt
                        .query_row(params![post_id], sentiment_from_row)
                        .optional()?;
                    Ok(stored)
                })
                .await?;
            Ok(stored)
        }
    }

    fn post_from_row(row: &Row) -> rusqlite::Result<Post> {
        let created_at: String = row.get(3)?;
        Ok(Post {
            id: row.get(0)?,
            text: row.get(1)?,
            len: row.get::<_, i64>(2)? as usize,
            created_at: parse_datetime(&created_at).ok_or_else(|| {
                rusqlite::Error::InvalidColumnType(3, created_at.clone(), rusqlite::types::Type::Text)
            })?,
            source: row.get(4)?,
            likes: row.get::<_, i64>(5)? as u64,
            reposts: row.get::<_, i64>(6)? as u64,
        })
    }

    fn sentiment_from_row(row: &Row) -> rusqlite::Result<StoredSentiment> {
        let label: String = row.get(3)?;
        Ok(StoredSentiment {
            post_id: row.get(0)?,
            cleaned_text: row.get(1)?,
            probability: row.get(2)?,
            sentiment: label.parse().map_err(|_| {
                rusqlite::Error::InvalidColumnType(3, label.clone(), rusqlite::types::Type::Text)
            })?,
            model: row.get(4)?,
        })
    }
}
