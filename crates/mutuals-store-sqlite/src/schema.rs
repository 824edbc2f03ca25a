//! SQL schema for the Mutuals SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    account_id  TEXT PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,   -- case-sensitive
    created_at  TEXT NOT NULL
);

-- One row per friendship, endpoints in canonical order.
-- Hyphenated lowercase UUID text sorts the same way as the UUID bytes.
CREATE TABLE IF NOT EXISTS friendships (
    low_id      TEXT NOT NULL REFERENCES accounts(account_id),
    high_id     TEXT NOT NULL REFERENCES accounts(account_id),
    recorded_at TEXT NOT NULL,
    PRIMARY KEY (low_id, high_id),
    CHECK  (low_id <= high_id)
);

-- subscriber_id receives target_id's updates.
CREATE TABLE IF NOT EXISTS subscriptions (
    target_id     TEXT NOT NULL REFERENCES accounts(account_id),
    subscriber_id TEXT NOT NULL REFERENCES accounts(account_id),
    recorded_at   TEXT NOT NULL,
    PRIMARY KEY (target_id, subscriber_id)
);

CREATE TABLE IF NOT EXISTS blocks (
    blocker_id  TEXT NOT NULL REFERENCES accounts(account_id),
    blocked_id  TEXT NOT NULL REFERENCES accounts(account_id),
    recorded_at TEXT NOT NULL,
    PRIMARY KEY (blocker_id, blocked_id)
);

CREATE INDEX IF NOT EXISTS friendships_high_idx ON friendships(high_id);
CREATE INDEX IF NOT EXISTS blocks_blocked_idx   ON blocks(blocked_id);

PRAGMA user_version = 1;
";
