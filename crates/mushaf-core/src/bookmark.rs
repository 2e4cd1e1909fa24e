//! Bookmarks — user markers pointing at a unit inside a document.
//!
//! The reference is weak: the store never checks that the document or unit
//! exists, and dangling bookmarks are tolerated.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
  /// Caller-generated; uniqueness is the caller's responsibility.
  pub id:          String,
  pub document_id: u32,
  pub unit_number: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note:        Option<String>,
  /// Milliseconds since the Unix epoch.
  pub created_at:  i64,
}

impl Bookmark {
  /// Build a bookmark with a fresh UUID and the current time.
  pub fn new(document_id: u32, unit_number: u32, note: Option<String>) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      document_id,
      unit_number,
      note,
      created_at: Utc::now().timestamp_millis(),
    }
  }

  pub fn validate(&self) -> Result<()> {
    let reason = if self.id.trim().is_empty() {
      "id must not be empty"
    } else if self.document_id == 0 {
      "documentId must be at least 1"
    } else if self.unit_number == 0 {
      "unitNumber must be at least 1"
    } else {
      return Ok(());
    };

    Err(Error::InvalidBookmark { id: self.id.clone(), reason: reason.into() })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_bookmarks_get_distinct_ids() {
    let a = Bookmark::new(1, 1, None);
    let b = Bookmark::new(1, 1, None);
    assert_ne!(a.id, b.id);
    assert!(a.created_at > 0);
    assert!(a.validate().is_ok());
  }

  #[test]
  fn blank_id_rejected() {
    let mut bookmark = Bookmark::new(2, 255, Some("ayat al-kursi".into()));
    bookmark.id = "  ".into();
    assert!(matches!(bookmark.validate(), Err(Error::InvalidBookmark { .. })));
  }

  #[test]
  fn zero_references_rejected() {
    let mut bookmark = Bookmark::new(0, 1, None);
    assert!(bookmark.validate().is_err());
    bookmark.document_id = 1;
    bookmark.unit_number = 0;
    assert!(bookmark.validate().is_err());
  }
}
