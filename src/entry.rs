use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WordEntry {
    #[serde(alias = "word")]
    pub term: String,        // Source-language headword
    pub translation: String, // Target-language rendering
}

impl WordEntry {
    pub fn new(term: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            translation: translation.into(),
        }
    }

    pub fn display_term(&self) -> String {
        capitalize_first(&self.term)
    }

    pub fn display_translation(&self) -> String {
        capitalize_first(&self.translation)
    }
}

/// Uppercase the first character only; the rest of the value is left as stored.
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
