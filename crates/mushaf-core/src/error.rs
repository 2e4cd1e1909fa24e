//! Error types for `mushaf-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid document {id}: {reason}")]
  InvalidDocument { id: u32, reason: String },

  #[error("invalid bookmark {id:?}: {reason}")]
  InvalidBookmark { id: String, reason: String },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
