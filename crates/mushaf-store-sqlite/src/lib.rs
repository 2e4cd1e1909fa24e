//! SQLite backend for the Mushaf local store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod shared;
mod store;

pub mod error;

pub use error::{Cause, Collection, Error, Result};
pub use schema::SCHEMA_VERSION;
pub use shared::SharedStore;
pub use store::{Location, SqliteStore, StoreOptions};
