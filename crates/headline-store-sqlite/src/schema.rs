//! SQL schema for the Headline SQLite store.

/// Applied on every pooled connection. `foreign_keys` is a per-connection
/// setting in SQLite, so it cannot live in [`SCHEMA`] alone.
pub const CONNECTION_PRAGMAS: &str = "
PRAGMA foreign_keys = ON;
";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
/// Executed once, on the first connection a pool opens.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Written only by ingestion; never updated or deleted.
CREATE TABLE IF NOT EXISTS stories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    url         TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    updated_at  TEXT NOT NULL
);

-- Append-only; one row per vote cast.
CREATE TABLE IF NOT EXISTS votes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    direction   TEXT NOT NULL CHECK (direction IN ('up', 'down')),
    story_id    INTEGER NOT NULL REFERENCES stories(id),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- The UNIQUE constraint is what makes concurrent tag upserts safe.
CREATE TABLE IF NOT EXISTS tags (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL UNIQUE   -- canonical title-case form
);

CREATE TABLE IF NOT EXISTS metadata (
    story_id    INTEGER NOT NULL REFERENCES stories(id),
    tag_id      INTEGER NOT NULL REFERENCES tags(id),
    PRIMARY KEY (story_id, tag_id)
);

CREATE INDEX IF NOT EXISTS votes_story_idx  ON votes(story_id);
CREATE INDEX IF NOT EXISTS metadata_tag_idx ON metadata(tag_id);

PRAGMA user_version = 1;
";
