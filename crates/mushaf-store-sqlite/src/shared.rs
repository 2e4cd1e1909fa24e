//! [`SharedStore`] — the process-wide store handle.
//!
//! Built explicitly and passed to whoever needs it. The database is opened
//! lazily on the first [`SharedStore::get`]; concurrent first callers wait on
//! that single open and its migration pass. The handle is never torn down.

use tokio::sync::OnceCell;

use crate::{Result, SqliteStore, StoreOptions};

pub struct SharedStore {
  options: StoreOptions,
  store:   OnceCell<SqliteStore>,
}

impl SharedStore {
  pub fn new(options: StoreOptions) -> Self {
    Self { options, store: OnceCell::new() }
  }

  /// Open the store on first use and return it.
  ///
  /// A failed open leaves the handle empty, so the next call tries again.
  pub async fn get(&self) -> Result<&SqliteStore> {
    self
      .store
      .get_or_try_init(|| SqliteStore::open_with(self.options.clone()))
      .await
  }

  /// `true` once a call to [`get`](Self::get) has succeeded.
  pub fn is_open(&self) -> bool { self.store.initialized() }

  pub fn options(&self) -> &StoreOptions { &self.options }
}
