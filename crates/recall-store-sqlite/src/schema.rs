//! SQL schema for the Recall SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS topics (
    topic_id    TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,   -- verified identity of the creator
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

-- A question belongs to exactly one topic and dies with it.
CREATE TABLE IF NOT EXISTS questions (
    question_id     TEXT PRIMARY KEY,
    topic_id        TEXT NOT NULL REFERENCES topics(topic_id) ON DELETE CASCADE,
    question_text   TEXT NOT NULL,
    answer_text     TEXT NOT NULL,
    revision_count  INTEGER NOT NULL DEFAULT 0 CHECK (revision_count >= 0),
    created_at      TEXT NOT NULL,
    last_revised_at TEXT
);

CREATE INDEX IF NOT EXISTS topics_owner_idx    ON topics(owner_id);
CREATE INDEX IF NOT EXISTS questions_topic_idx ON questions(topic_id);

PRAGMA user_version = 1;
";
