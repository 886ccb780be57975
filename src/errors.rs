// File: src/errors.rs
use std::fmt;

/// Which dictionary table an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Phrases,
    Words,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Table::Phrases => write!(f, "phrase"),
            Table::Words => write!(f, "word"),
        }
    }
}

/// Errors surfaced by the translator library.
///
/// Dictionary variants are fatal at load time: a partially loaded dictionary
/// would give nondeterministic coverage. Everything that touches the host
/// tree is best-effort and never produces one of these.
#[derive(Debug)]
pub enum TranslatorError {
    /// An entry with an empty source or target.
    EmptyEntry { table: Table },

    /// Two entries share the same case-insensitive source.
    DuplicateEntry { table: Table, key: String },

    /// An entry's output would be picked up again by another entry, so a
    /// second translation pass would keep changing the text.
    ChainedEntry { key: String, value: String },

    /// A single-word key containing whitespace or punctuation can never match.
    SeparatorInKey { key: String },

    /// A phrase could not be compiled into a matcher.
    InvalidPattern(String),

    /// Settings or dictionary files could not be read or written.
    Storage(String),

    /// Runtime configuration could not be parsed.
    Config(String),
}

impl fmt::Display for TranslatorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TranslatorError::EmptyEntry { table } => {
                write!(f, "Malformed dictionary entry: empty {} entry", table)
            }
            TranslatorError::DuplicateEntry { table, key } => {
                write!(f, "Malformed dictionary entry: duplicate {} '{}'", table, key)
            }
            TranslatorError::ChainedEntry { key, value } => write!(
                f,
                "Malformed dictionary entry: '{}' -> '{}' feeds another entry",
                key, value
            ),
            TranslatorError::SeparatorInKey { key } => write!(
                f,
                "Malformed dictionary entry: word '{}' contains a separator",
                key
            ),
            TranslatorError::InvalidPattern(msg) => write!(f, "Invalid phrase pattern: {}", msg),
            TranslatorError::Storage(msg) => write!(f, "Storage Error: {}", msg),
            TranslatorError::Config(msg) => write!(f, "Config Error: {}", msg),
        }
    }
}

impl std::error::Error for TranslatorError {}

impl TranslatorError {
    /// True for the load-time dictionary faults.
    pub fn is_malformed_entry(&self) -> bool {
        matches!(
            self,
            TranslatorError::EmptyEntry { .. }
                | TranslatorError::DuplicateEntry { .. }
                | TranslatorError::ChainedEntry { .. }
                | TranslatorError::SeparatorInKey { .. }
        )
    }
}

impl From<std::io::Error> for TranslatorError {
    fn from(err: std::io::Error) -> Self {
        TranslatorError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TranslatorError {
    fn from(err: serde_json::Error) -> Self {
        TranslatorError::Storage(err.to_string())
    }
}

impl From<bincode::Error> for TranslatorError {
    fn from(err: bincode::Error) -> Self {
        TranslatorError::Storage(err.to_string())
    }
}

impl From<tempfile::PersistError> for TranslatorError {
    fn from(err: tempfile::PersistError) -> Self {
        TranslatorError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TranslatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_classification() {
        assert!(TranslatorError::EmptyEntry { table: Table::Words }.is_malformed_entry());
        assert!(TranslatorError::DuplicateEntry {
            table: Table::Phrases,
            key: "grüß gott".into()
        }
        .is_malformed_entry());
        assert!(!TranslatorError::Storage("disk".into()).is_malformed_entry());
    }

    #[test]
    fn test_display_names_the_key() {
        let err = TranslatorError::DuplicateEntry {
            table: Table::Words,
            key: "nicht".into(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed dictionary entry: duplicate word 'nicht'"
        );
    }
}
