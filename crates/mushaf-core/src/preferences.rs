//! Reader preferences — a single record, always overwritten wholesale.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Font sizes the reader offers. Stores do not enforce this range.
pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 12..=32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
  pub font_size:                     u32,
  pub show_transliteration:          bool,
  pub show_word_meanings:            bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub selected_translation_id:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub selected_annotation_source_id: Option<String>,
}

/// What a store hands back when nothing has been saved yet.
impl Default for Preferences {
  fn default() -> Self {
    Self {
      font_size:                     16,
      show_transliteration:          false,
      show_word_meanings:            true,
      selected_translation_id:       None,
      selected_annotation_source_id: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let prefs = Preferences::default();
    assert_eq!(prefs.font_size, 16);
    assert!(!prefs.show_transliteration);
    assert!(prefs.show_word_meanings);
    assert!(prefs.selected_translation_id.is_none());
    assert!(prefs.selected_annotation_source_id.is_none());
    assert!(FONT_SIZE_RANGE.contains(&prefs.font_size));
  }

  #[test]
  fn missing_optional_fields_deserialize() {
    let prefs: Preferences = serde_json::from_str(
      r#"{"fontSize":20,"showTransliteration":true,"showWordMeanings":false}"#,
    )
    .unwrap();
    assert_eq!(prefs.font_size, 20);
    assert!(prefs.selected_translation_id.is_none());
  }
}
