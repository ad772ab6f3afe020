pub const SCHEMA: &str = r#"
-- posts table (every collected post, newest collection wins)
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY,
    text TEXT NOT NULL,
    len INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    source TEXT NOT NULL DEFAULT '',
    likes INTEGER NOT NULL DEFAULT 0,
    reposts INTEGER NOT NULL DEFAULT 0,
    collected_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at);

-- sentiments table (latest score per post)
CREATE TABLE IF NOT EXISTS sentiments (
    post_id INTEGER PRIMARY KEY,
    cleaned_text TEXT NOT NULL,
    probability REAL NOT NULL,
    label TEXT NOT NULL,
    model TEXT NOT NULL,
    scored_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_sentiments_label ON sentiments(label);
"#;
