//! The built-in document list used when no source can supply one.

use crate::document::{Category, Document};

fn summary(
  document_id: u32,
  display_name: &str,
  localized_name: &str,
  canonical_name: &str,
  unit_count: u32,
  category: Category,
) -> Document {
  Document {
    document_id,
    display_name: display_name.into(),
    localized_name: localized_name.into(),
    canonical_name: canonical_name.into(),
    unit_count,
    category: Some(category),
    units: None,
    provenance: None,
  }
}

/// A short static list of document summaries, ordered by id.
pub fn builtin() -> Vec<Document> {
  vec![
    summary(1, "الفاتحة", "ফাতিহা", "Al-Faatiha", 7, Category::Makki),
    summary(2, "البقرة", "বাকারা", "Al-Baqara", 286, Category::Madani),
    summary(36, "يس", "ইয়াসিন", "Yaseen", 83, Category::Makki),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builtin_entries_are_valid_summaries() {
    let list = builtin();
    assert_eq!(list.len(), 3);
    for doc in &list {
      assert!(doc.validate().is_ok());
      assert!(!doc.is_complete());
    }
    assert!(list.windows(2).all(|w| w[0].document_id < w[1].document_id));
  }
}
