//! SQL schema for the Mushaf SQLite store.
//!
//! The schema version lives in `PRAGMA user_version`. Each entry in
//! [`MIGRATIONS`] moves the database up by one version and only ever adds
//! tables or indexes; existing rows are never rewritten.

use rusqlite::{Connection, TransactionBehavior};

/// The version a store is opened at unless told otherwise.
pub const SCHEMA_VERSION: u32 = 2;

/// Applied on every open of a file-backed store.
pub const FILE_PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = FULL;
";

/// `MIGRATIONS[n]` upgrades a database from version `n` to `n + 1`.
pub const MIGRATIONS: &[&str] = &[V1, V2];

const V1: &str = "
-- Full records are stored as JSON in `record`; the other columns are key and
-- index projections of it.
CREATE TABLE IF NOT EXISTS documents (
    document_id   INTEGER PRIMARY KEY,
    display_name  TEXT NOT NULL,
    record        TEXT NOT NULL
);

-- Bookmarks reference documents weakly; no foreign key.
CREATE TABLE IF NOT EXISTS bookmarks (
    bookmark_id   TEXT PRIMARY KEY,
    document_id   INTEGER NOT NULL,
    unit_number   INTEGER NOT NULL,
    created_at    INTEGER NOT NULL,   -- epoch milliseconds
    record        TEXT NOT NULL
);

-- Single row keyed by a fixed string.
CREATE TABLE IF NOT EXISTS preferences (
    key           TEXT PRIMARY KEY,
    record        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS documents_name_idx     ON documents(display_name);
CREATE INDEX IF NOT EXISTS bookmarks_document_idx ON bookmarks(document_id);
";

const V2: &str = "
CREATE INDEX IF NOT EXISTS bookmarks_created_idx ON bookmarks(created_at DESC);
";

/// Outcome of [`migrate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
  /// The database was already at the target version.
  Current,
  Applied { from: u32, to: u32 },
  /// The database is at a later version than the target.
  TooNew { stored: u32 },
}

pub fn user_version(conn: &Connection) -> rusqlite::Result<u32> {
  conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Bring the database up to `target`, which must be in
/// `1..=MIGRATIONS.len()`.
///
/// The version check and every step run in one IMMEDIATE transaction, so
/// concurrent openers of the same file serialize on the write lock and only
/// the first one applies the steps.
pub fn migrate(conn: &mut Connection, target: u32) -> rusqlite::Result<Migration> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let stored = user_version(&tx)?;
  if stored > target {
    return Ok(Migration::TooNew { stored });
  }
  if stored == target {
    return Ok(Migration::Current);
  }

  for step in &MIGRATIONS[stored as usize..target as usize] {
    tx.execute_batch(step)?;
  }
  tx.pragma_update(None, "user_version", target)?;
  tx.commit()?;

  Ok(Migration::Applied { from: stored, to: target })
}
