//! SQL schema for the greetbook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are inserted once. The only UPDATE ever issued touches `status`.
CREATE TABLE IF NOT EXISTS greetings (
    greeting_id TEXT PRIMARY KEY,
    message     TEXT NOT NULL,
    sender      TEXT NOT NULL,             -- Greeting.from
    recipient   TEXT NOT NULL,             -- Greeting.to
    email       TEXT NOT NULL DEFAULT '',
    photo       TEXT,
    created_at  TEXT NOT NULL,             -- ISO 8601 UTC; store-assigned
    status      TEXT                       -- 'pending' | 'approved'; NULL on rows from before moderation
);

CREATE INDEX IF NOT EXISTS greetings_created_idx ON greetings(created_at);

PRAGMA user_version = 1;
";
