//! Error type for `mushaf-store-sqlite`.
//!
//! Failures are sorted into three kinds: the store could not be opened, a
//! read failed, or a write failed. A missing key is not an error.

use std::fmt;

use thiserror::Error;

/// The table an operation was scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
  Documents,
  Bookmarks,
  Preferences,
  /// Schema introspection rather than a record collection.
  Schema,
}

impl fmt::Display for Collection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Collection::Documents => "documents",
      Collection::Bookmarks => "bookmarks",
      Collection::Preferences => "preferences",
      Collection::Schema => "schema",
    })
  }
}

/// What went wrong underneath an [`Error`].
#[derive(Debug, Error)]
pub enum Cause {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("invalid record: {0}")]
  Invalid(#[from] mushaf_core::Error),

  #[error("stored schema version {stored} is newer than supported version {supported}")]
  Downgrade { stored: u32, supported: u32 },

  #[error("unknown schema version {0}")]
  UnknownVersion(u32),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to open store: {0}")]
  Init(#[source] Cause),

  #[error("failed to read {collection}: {cause}")]
  Read {
    collection: Collection,
    #[source]
    cause:      Cause,
  },

  #[error("failed to write {collection}: {cause}")]
  Write {
    collection: Collection,
    #[source]
    cause:      Cause,
  },
}

impl Error {
  pub(crate) fn init<E: Into<Cause>>(e: E) -> Self { Error::Init(e.into()) }

  pub(crate) fn read<E: Into<Cause>>(collection: Collection) -> impl FnOnce(E) -> Self {
    move |e| Error::Read { collection, cause: e.into() }
  }

  pub(crate) fn write<E: Into<Cause>>(collection: Collection) -> impl FnOnce(E) -> Self {
    move |e| Error::Write { collection, cause: e.into() }
  }

  pub fn cause(&self) -> &Cause {
    match self {
      Error::Init(cause) => cause,
      Error::Read { cause, .. } | Error::Write { cause, .. } => cause,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
