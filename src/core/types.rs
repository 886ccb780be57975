// src/core/types.rs
use serde::{Deserialize, Serialize};

/// The outcome of one engine call. Produced fresh every time, nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub output_text: String,
    /// True if at least one dictionary entry matched.
    pub changed: bool,
    pub source_text: String,
}

impl TranslationResult {
    pub fn unchanged(text: &str) -> Self {
        Self {
            output_text: text.to_string(),
            changed: false,
            source_text: text.to_string(),
        }
    }
}

/// One run of the word pass. Separators are passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Token(&'a str),
    Separator(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Token(s) | Segment::Separator(s) => s,
        }
    }
}
