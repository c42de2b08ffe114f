//! Script-based language detection for prompts.

use crate::types::FieldSelector;
use serde::{Deserialize, Serialize};

/// The language a prompt is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
  #[default]
  #[serde(rename = "en")]
  English,
  #[serde(rename = "ar")]
  Arabic,
}

impl Language {
  pub fn code(self) -> &'static str {
    match self {
      Language::English => "en",
      Language::Arabic => "ar",
    }
  }
}

/// Guesses the language of `text` by script.
///
/// Arabic when characters of the Arabic block (U+0600..=U+06FF) outnumber
/// ASCII letters; English otherwise, including for empty text.
pub fn detect_language(text: &str) -> Language {
  let (arabic, latin) = text.chars().fold((0usize, 0usize), |(ar, en), c| {
    if ('\u{0600}'..='\u{06FF}').contains(&c) {
      (ar + 1, en)
    } else if c.is_ascii_alphabetic() {
      (ar, en + 1)
    } else {
      (ar, en)
    }
  });

  if arabic > latin {
    Language::Arabic
  } else {
    Language::English
  }
}

impl From<Language> for FieldSelector {
  fn from(language: Language) -> Self {
    match language {
      Language::English => FieldSelector::Primary,
      Language::Arabic => FieldSelector::Secondary,
    }
  }
}
