use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{Post, ScoredPost};

use super::rows::{
    parse_datetime, LabeledRow, PostRow, PreparedRow, ScoredRow, PREPARED_HEADER, RAW_HEADER,
    SCORED_HEADER,
};

/// Reads posts in the raw or prepared layout. A row without text or with an
/// unreadable field aborts the read.
pub fn read_posts(path: &Path) -> Result<Vec<Post>> {
    let posts = read_rows(path, |row: PostRow, location| {
        let text = row.text.ok_or_else(|| invalid(location.clone(), "missing Tweets"))?;
        let created_at = parse_datetime(&row.date)
            .ok_or_else(|| invalid(location, format!("unreadable Date {:?}", row.date)))?;
        Ok(Post {
            id: row.id,
            len: row.len.unwrap_or_else(|| text.chars().count()),
            text,
            created_at,
            source: row.source.unwrap_or_default(),
            likes: row.likes,
            reposts: row.reposts,
        })
    })?;
    tracing::info!(path = %path.display(), posts = posts.len(), "Read posts");
    Ok(posts)
}

/// Reads `text,label` training rows; label is `1` for positive, `0` for
/// negative.
pub fn read_labeled(path: &Path) -> Result<Vec<(String, bool)>> {
    read_rows(path, |row: LabeledRow, location| match row.label {
        0 => Ok((row.text, false)),
        1 => Ok((row.text, true)),
        other => Err(invalid(location, format!("label must be 0 or 1, got {}", other))),
    })
}

pub fn write_raw(path: &Path, posts: &[Post]) -> Result<()> {
    let mut writer = create_writer(path, &RAW_HEADER)?;
    for post in posts {
        writer.serialize(PostRow::from(post))?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), posts = posts.len(), "Wrote raw posts");
    Ok(())
}

pub fn write_prepared(path: &Path, posts: &[Post]) -> Result<()> {
    let mut writer = create_writer(path, &PREPARED_HEADER)?;
    for post in posts {
        writer.serialize(PreparedRow::from(post))?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), posts = posts.len(), "Wrote prepared posts");
    Ok(())
}

pub fn write_scored(path: &Path, scored: &[ScoredPost]) -> Result<()> {
    let mut writer = create_writer(path, &SCORED_HEADER)?;
    for row in scored {
        writer.serialize(ScoredRow::from(row))?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), posts = scored.len(), "Wrote scored posts");
    Ok(())
}

fn read_rows<R, T, F>(path: &Path, mut convert: F) -> Result<Vec<T>>
where
    R: DeserializeOwned,
    F: FnMut(R, String) -> Result<T>,
{
    let mut reader = ReaderBuilder::new().from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut out = Vec::new();
    for record in reader.records() {
        let record: StringRecord = record?;
        let location = format!(
            "{} line {}",
            path.display(),
            record.position().map(|p| p.line()).unwrap_or_default()
        );
        let row: R = record
            .deserialize(Some(&headers))
            .map_err(|e| invalid(location.clone(), e.to_string()))?;
        out.push(convert(row, location)?);
    }
    Ok(out)
}

fn create_writer(path: &Path, header: &[&str]) -> Result<Writer<File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(header)?;
    Ok(writer)
}

fn invalid(location: String, reason: impl Into<String>) -> AppError {
    AppError::InvalidRecord {
        location,
        reason: reason.into(),
    }
}
