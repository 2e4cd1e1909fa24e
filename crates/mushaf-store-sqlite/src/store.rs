//! [`SqliteStore`] — the SQLite implementation of [`LocalStore`].

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use rusqlite::types::Value;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use mushaf_core::{
  bookmark::Bookmark,
  document::Document,
  preferences::Preferences,
  store::LocalStore,
};

use crate::{
  Cause, Collection, Error, Result,
  encode::{PREFERENCES_KEY, decode_records, encode_record, int, text},
  schema::{self, FILE_PRAGMAS, MIGRATIONS, Migration, SCHEMA_VERSION},
};

/// How long a write waits on a lock held by another connection before the
/// engine gives up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Options ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
  File(PathBuf),
  Memory,
}

/// Where to open a store and at which schema version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
  pub location:       Location,
  pub schema_version: u32,
}

impl StoreOptions {
  pub fn file(path: impl AsRef<Path>) -> Self {
    Self {
      location:       Location::File(path.as_ref().to_path_buf()),
      schema_version: SCHEMA_VERSION,
    }
  }

  pub fn in_memory() -> Self {
    Self { location: Location::Memory, schema_version: SCHEMA_VERSION }
  }

  pub fn schema_version(mut self, version: u32) -> Self {
    self.schema_version = version;
    self
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The local store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls go
/// through one connection thread, so operations issued in sequence are
/// applied in that order.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn:    tokio_rusqlite::Connection,
  schema_version:     u32,
  migrations_applied: u32,
}

impl SqliteStore {
  /// Open (or create) a store at `path` at the current schema version.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with(StoreOptions::file(path)).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    Self::open_with(StoreOptions::in_memory()).await
  }

  /// Open a store and bring its schema up to `options.schema_version`.
  ///
  /// Missing tables and indexes are created; existing data is kept. Fails if
  /// the database was written by a later schema version.
  pub async fn open_with(options: StoreOptions) -> Result<Self> {
    let target = options.schema_version;
    if target == 0 || target as usize > MIGRATIONS.len() {
      return Err(Error::Init(Cause::UnknownVersion(target)));
    }

    let conn = match &options.location {
      Location::File(path) => tokio_rusqlite::Connection::open(path).await,
      Location::Memory => tokio_rusqlite::Connection::open_in_memory().await,
    }
    .map_err(Error::init)?;

    let file_backed = matches!(options.location, Location::File(_));
    let migration = conn
      .call(move |conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        if file_backed {
          conn.execute_batch(FILE_PRAGMAS)?;
        }
        Ok(schema::migrate(conn, target)?)
      })
      .await
      .map_err(Error::init)?;

    let migrations_applied = match migration {
      Migration::Current => {
        debug!(version = target, "schema is current");
        0
      }
      Migration::Applied { from, to } => {
        info!(from, to, "migrated store schema");
        to - from
      }
      Migration::TooNew { stored } => {
        return Err(Error::Init(Cause::Downgrade { stored, supported: target }));
      }
    };

    Ok(Self { conn, schema_version: target, migrations_applied })
  }

  /// The schema version this handle was opened at.
  pub fn schema_version(&self) -> u32 { self.schema_version }

  /// How many migration steps this open applied; zero when an existing
  /// database was reused as is.
  pub fn migrations_applied(&self) -> u32 { self.migrations_applied }

  /// Names of the tables and indexes in the database, sorted.
  pub async fn schema_objects(&self) -> Result<Vec<String>> {
    self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT name FROM sqlite_master
           WHERE type IN ('table', 'index') AND name NOT LIKE 'sqlite_%'
           ORDER BY name",
        )?;
        let names = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
      })
      .await
      .map_err(Error::read(Collection::Schema))
  }

  /// Count of rows in one collection.
  pub async fn count(&self, collection: Collection) -> Result<u64> {
    let sql = match collection {
      Collection::Documents => "SELECT COUNT(*) FROM documents",
      Collection::Bookmarks => "SELECT COUNT(*) FROM bookmarks",
      Collection::Preferences => "SELECT COUNT(*) FROM preferences",
      Collection::Schema => "SELECT COUNT(*) FROM sqlite_master",
    };
    self
      .conn
      .call(move |conn| Ok(conn.query_row(sql, [], |row| row.get(0))?))
      .await
      .map_err(Error::read(collection))
  }

  /// Run a query whose single column is a JSON `record`, and decode each row.
  async fn select_records<T: DeserializeOwned>(
    &self,
    collection: Collection,
    sql: &'static str,
    args: Vec<Value>,
  ) -> Result<Vec<T>> {
    let raws: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(args), |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::read(collection))?;

    decode_records(&raws).map_err(Error::read(collection))
  }

  async fn select_record<T: DeserializeOwned>(
    &self,
    collection: Collection,
    sql: &'static str,
    args: Vec<Value>,
  ) -> Result<Option<T>> {
    Ok(self.select_records(collection, sql, args).await?.into_iter().next())
  }

  /// Run one write statement in its own transaction.
  async fn execute(
    &self,
    collection: Collection,
    sql: &'static str,
    args: Vec<Value>,
  ) -> Result<usize> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(sql, rusqlite::params_from_iter(args))?;
        tx.commit()?;
        Ok(changed)
      })
      .await
      .map_err(Error::write(collection))
  }
}

// ─── LocalStore impl ─────────────────────────────────────────────────────────

impl LocalStore for SqliteStore {
  type Error = Error;

  // ── Documents ─────────────────────────────────────────────────────────────

  async fn put_document(&self, document: &Document) -> Result<()> {
    document.validate().map_err(Error::write(Collection::Documents))?;
    let record = encode_record(document).map_err(Error::write(Collection::Documents))?;

    self
      .execute(
        Collection::Documents,
        "INSERT OR REPLACE INTO documents (document_id, display_name, record)
         VALUES (?1, ?2, ?3)",
        vec![
          int(document.document_id),
          text(document.display_name.as_str()),
          text(record),
        ],
      )
      .await?;

    debug!(document_id = document.document_id, "stored document");
    Ok(())
  }

  async fn get_document(&self, document_id: u32) -> Result<Option<Document>> {
    self
      .select_record(
        Collection::Documents,
        "SELECT record FROM documents WHERE document_id = ?1",
        vec![int(document_id)],
      )
      .await
  }

  async fn all_documents(&self) -> Result<Vec<Document>> {
    self
      .select_records(
        Collection::Documents,
        "SELECT record FROM documents ORDER BY document_id",
        vec![],
      )
      .await
  }

  async fn documents_by_name(&self) -> Result<Vec<Document>> {
    self
      .select_records(
        Collection::Documents,
        "SELECT record FROM documents ORDER BY display_name, document_id",
        vec![],
      )
      .await
  }

  async fn document_ids(&self) -> Result<Vec<u32>> {
    self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare_cached("SELECT document_id FROM documents ORDER BY document_id")?;
        let ids = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<u32>>>()?;
        Ok(ids)
      })
      .await
      .map_err(Error::read(Collection::Documents))
  }

  async fn delete_document(&self, document_id: u32) -> Result<()> {
    let removed = self
      .execute(
        Collection::Documents,
        "DELETE FROM documents WHERE document_id = ?1",
        vec![int(document_id)],
      )
      .await?;
    debug!(document_id, removed, "deleted document");
    Ok(())
  }

  // ── Bookmarks ─────────────────────────────────────────────────────────────

  async fn put_bookmark(&self, bookmark: &Bookmark) -> Result<()> {
    bookmark.validate().map_err(Error::write(Collection::Bookmarks))?;
    let record = encode_record(bookmark).map_err(Error::write(Collection::Bookmarks))?;

    self
      .execute(
        Collection::Bookmarks,
        "INSERT OR REPLACE INTO bookmarks
           (bookmark_id, document_id, unit_number, created_at, record)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        vec![
          text(bookmark.id.as_str()),
          int(bookmark.document_id),
          int(bookmark.unit_number),
          int(bookmark.created_at),
          text(record),
        ],
      )
      .await?;

    debug!(bookmark_id = %bookmark.id, "stored bookmark");
    Ok(())
  }

  async fn get_bookmark(&self, id: &str) -> Result<Option<Bookmark>> {
    self
      .select_record(
        Collection::Bookmarks,
        "SELECT record FROM bookmarks WHERE bookmark_id = ?1",
        vec![text(id)],
      )
      .await
  }

  async fn all_bookmarks(&self) -> Result<Vec<Bookmark>> {
    self
      .select_records(
        Collection::Bookmarks,
        "SELECT record FROM bookmarks ORDER BY created_at DESC, bookmark_id",
        vec![],
      )
      .await
  }

  async fn bookmarks_for_document(&self, document_id: u32) -> Result<Vec<Bookmark>> {
    self
      .select_records(
        Collection::Bookmarks,
        "SELECT record FROM bookmarks
         WHERE document_id = ?1
         ORDER BY created_at DESC, bookmark_id",
        vec![int(document_id)],
      )
      .await
  }

  async fn delete_bookmark(&self, id: &str) -> Result<()> {
    let removed = self
      .execute(
        Collection::Bookmarks,
        "DELETE FROM bookmarks WHERE bookmark_id = ?1",
        vec![text(id)],
      )
      .await?;
    debug!(bookmark_id = id, removed, "deleted bookmark");
    Ok(())
  }

  // ── Preferences ───────────────────────────────────────────────────────────

  async fn get_preferences(&self) -> Result<Preferences> {
    let stored = self
      .select_record(
        Collection::Preferences,
        "SELECT record FROM preferences WHERE key = ?1",
        vec![text(PREFERENCES_KEY)],
      )
      .await?;
    Ok(stored.unwrap_or_default())
  }

  async fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
    let record = encode_record(preferences).map_err(Error::write(Collection::Preferences))?;

    self
      .execute(
        Collection::Preferences,
        "INSERT OR REPLACE INTO preferences (key, record) VALUES (?1, ?2)",
        vec![text(PREFERENCES_KEY), text(record)],
      )
      .await?;

    debug!("stored preferences");
    Ok(())
  }
}
