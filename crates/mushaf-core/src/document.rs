//! Documents — named chapters of source text, with their units and tokens.
//!
//! A document arrives either as a summary (list views; `units` absent) or as a
//! complete record once fully fetched. Units and tokens are owned by their
//! parent document and have no lifecycle of their own.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Classification ──────────────────────────────────────────────────────────

/// Revelation period of a document. The two classes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
  Makki,
  Madani,
}

/// Source attribution carried alongside a fully fetched document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
  pub source_text:        String,
  pub source_translation: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_annotation:  Option<String>,
  pub license:            String,
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// One lexical unit inside a [`Unit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
  /// 1-based, unique within the parent unit.
  pub position:     u32,
  pub source_text:  String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub romanization: Option<String>,
  pub gloss_text:   String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub grammar_tag:  Option<String>,
}

/// One verse-equivalent row inside a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
  /// 1-based, unique within the parent document.
  pub unit_number:      u32,
  pub source_text:      String,
  pub tokens:           Vec<Token>,
  pub translated_text:  String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub annotation_short: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub annotation_full:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub media_url:        Option<String>,
}

/// A named chapter of source text, keyed by `document_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
  /// Stable id assigned by the source corpus, starting at 1.
  pub document_id:    u32,
  pub display_name:   String,
  pub localized_name: String,
  pub canonical_name: String,
  pub unit_count:     u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category:       Option<Category>,
  /// Present only once the document has been fully fetched.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub units:          Option<Vec<Unit>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub provenance:     Option<Provenance>,
}

impl Document {
  /// `true` once the document carries its units.
  pub fn is_complete(&self) -> bool { self.units.is_some() }

  /// Strip the units, leaving the list-view summary.
  pub fn into_summary(mut self) -> Self {
    self.units = None;
    self
  }

  /// Offline search predicate.
  ///
  /// The canonical (romanized) name matches case-insensitively; the display
  /// and localized names are matched verbatim. The query is used as given,
  /// surrounding whitespace included; an empty query matches everything.
  pub fn matches(&self, query: &str) -> bool {
    if query.is_empty() {
      return true;
    }
    self.display_name.contains(query)
      || self.localized_name.contains(query)
      || self
        .canonical_name
        .to_lowercase()
        .contains(&query.to_lowercase())
  }

  /// Check the shape of the record before it is persisted.
  pub fn validate(&self) -> Result<()> {
    if self.document_id == 0 {
      return Err(self.invalid("documentId must be at least 1"));
    }

    let Some(units) = &self.units else {
      return Ok(());
    };

    let mut seen = HashSet::with_capacity(units.len());
    for unit in units {
      if unit.unit_number == 0 {
        return Err(self.invalid("unitNumber must be at least 1"));
      }
      if !seen.insert(unit.unit_number) {
        return Err(self.invalid(format!("duplicate unitNumber {}", unit.unit_number)));
      }
      unit.check_tokens().map_err(|reason| self.invalid(reason))?;
    }

    Ok(())
  }

  fn invalid(&self, reason: impl Into<String>) -> Error {
    Error::InvalidDocument { id: self.document_id, reason: reason.into() }
  }
}

impl Unit {
  fn check_tokens(&self) -> std::result::Result<(), String> {
    let mut seen = HashSet::with_capacity(self.tokens.len());
    for token in &self.tokens {
      if token.position == 0 {
        return Err(format!("unit {}: token position must be at least 1", self.unit_number));
      }
      if !seen.insert(token.position) {
        return Err(format!(
          "unit {}: duplicate token position {}",
          self.unit_number, token.position
        ));
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn token(position: u32) -> Token {
    Token {
      position,
      source_text:  "بِسْمِ".into(),
      romanization: Some("bis'mi".into()),
      gloss_text:   "In (the) name".into(),
      grammar_tag:  None,
    }
  }

  fn unit(unit_number: u32, tokens: Vec<Token>) -> Unit {
    Unit {
      unit_number,
      source_text: "بِسْمِ ٱللَّهِ".into(),
      tokens,
      translated_text: "In the name of Allah".into(),
      annotation_short: None,
      annotation_full: None,
      media_url: None,
    }
  }

  fn document(units: Option<Vec<Unit>>) -> Document {
    Document {
      document_id:    1,
      display_name:   "الفاتحة".into(),
      localized_name: "ফাতিহা".into(),
      canonical_name: "Al-Faatiha".into(),
      unit_count:     7,
      category:       Some(Category::Makki),
      units,
      provenance:     None,
    }
  }

  #[test]
  fn summary_is_valid() {
    assert!(document(None).validate().is_ok());
  }

  #[test]
  fn zero_document_id_rejected() {
    let mut doc = document(None);
    doc.document_id = 0;
    assert!(matches!(
      doc.validate(),
      Err(Error::InvalidDocument { id: 0, .. })
    ));
  }

  #[test]
  fn duplicate_unit_numbers_rejected() {
    let doc = document(Some(vec![unit(1, vec![]), unit(1, vec![])]));
    let err = doc.validate().unwrap_err();
    assert!(err.to_string().contains("duplicate unitNumber 1"));
  }

  #[test]
  fn duplicate_token_positions_rejected() {
    let doc = document(Some(vec![unit(1, vec![token(1), token(2), token(2)])]));
    let err = doc.validate().unwrap_err();
    assert!(err.to_string().contains("duplicate token position 2"));
  }

  #[test]
  fn zero_token_position_rejected() {
    let doc = document(Some(vec![unit(3, vec![token(0)])]));
    assert!(doc.validate().is_err());
  }

  #[test]
  fn search_matches_each_name() {
    let doc = document(None);
    assert!(doc.matches(""));
    assert!(doc.matches("faatiha"));
    assert!(doc.matches("AL-FAA"));
    assert!(doc.matches("الفاتحة"));
    assert!(doc.matches("ফাতিহা"));
    assert!(!doc.matches("baqara"));
  }

  #[test]
  fn search_query_is_not_trimmed() {
    let doc = document(None);
    assert!(doc.matches("Al-"));
    assert!(!doc.matches(" faatiha"));
    assert!(!doc.matches("ফাতিহা "));
  }

  #[test]
  fn json_uses_camel_case_and_omits_absent_fields() {
    let json = serde_json::to_value(document(None)).unwrap();
    assert_eq!(json["documentId"], 1);
    assert_eq!(json["unitCount"], 7);
    assert_eq!(json["category"], "Makki");
    assert!(json.get("units").is_none());
    assert!(json.get("provenance").is_none());
  }

  #[test]
  fn into_summary_drops_units() {
    let doc = document(Some(vec![unit(1, vec![token(1)])]));
    assert!(doc.is_complete());
    let summary = doc.into_summary();
    assert!(!summary.is_complete());
    assert_eq!(summary.unit_count, 7);
  }
}
