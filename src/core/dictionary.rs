// File: src/core/dictionary.rs
use crate::core::engine::segments;
use crate::core::lexicon;
use crate::core::types::Segment;
use crate::errors::{Result, Table, TranslatorError};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The serialisable source form of a dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryData {
    pub phrases: Vec<(String, String)>,
    pub words: Vec<(String, String)>,
}

impl DictionaryData {
    pub fn builtin() -> Self {
        Self {
            phrases: to_owned_pairs(lexicon::PHRASES),
            words: to_owned_pairs(lexicon::WORDS),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn to_owned_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn tokens(text: &str) -> Vec<String> {
    segments(text)
        .filter_map(|s| match s {
            Segment::Token(t) => Some(t.to_lowercase()),
            Segment::Separator(_) => None,
        })
        .collect()
}

/// True when `target` laid over `source` at some offset agrees on every
/// shared position, i.e. a rewritten span plus its neighbours could spell
/// out `source`.
fn overlaps(target: &[String], source: &[String]) -> bool {
    if target.is_empty() || source.is_empty() {
        return false;
    }
    let (t_len, s_len) = (target.len() as isize, source.len() as isize);
    (1 - t_len..s_len).any(|offset| {
        let lo = offset.max(0);
        let hi = s_len.min(offset + t_len);
        (lo..hi).all(|i| source[i as usize] == target[(i - offset) as usize])
    })
}

/// A phrase entry compiled into a case-insensitive, word-bounded matcher.
#[derive(Debug, Clone)]
pub struct PhraseRule {
    pub source: String,
    pub target: String,
    pub pattern: Regex,
}

/// Immutable lookup tables. Only constructible through validation.
#[derive(Debug, Clone)]
pub struct Dictionary {
    phrases: Vec<PhraseRule>,
    words: HashMap<String, String>,
}

impl Dictionary {
    pub fn builtin() -> Result<Self> {
        Self::from_data(DictionaryData::builtin())
    }

    /// Validates and compiles. Any malformed entry rejects the whole set.
    pub fn from_data(data: DictionaryData) -> Result<Self> {
        let mut words = HashMap::with_capacity(data.words.len());
        for (key, value) in data.words {
            if key.is_empty() || value.is_empty() {
                return Err(TranslatorError::EmptyEntry { table: Table::Words });
            }
            if segments(&key).any(|s| matches!(s, Segment::Separator(_))) {
                return Err(TranslatorError::SeparatorInKey { key });
            }
            let key = key.to_lowercase();
            if words.contains_key(&key) {
                return Err(TranslatorError::DuplicateEntry { table: Table::Words, key });
            }
            words.insert(key, value);
        }

        let mut seen = HashSet::new();
        let mut phrases = Vec::with_capacity(data.phrases.len());
        for (source, target) in data.phrases {
            if source.trim().is_empty() || target.is_empty() {
                return Err(TranslatorError::EmptyEntry { table: Table::Phrases });
            }
            if !seen.insert(source.to_lowercase()) {
                return Err(TranslatorError::DuplicateEntry {
                    table: Table::Phrases,
                    key: source,
                });
            }
            let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(&source)))
                .case_insensitive(true)
                .build()
                .map_err(|e| TranslatorError::InvalidPattern(e.to_string()))?;
            phrases.push(PhraseRule { source, target, pattern });
        }

        let dictionary = Self { phrases, words };
        dictionary.check_chains()?;
        Ok(dictionary)
    }

    /// Rejects entries whose output could be rewritten again by a second
    /// pass. Identity word entries are tolerated.
    fn check_chains(&self) -> Result<()> {
        let mut outputs = HashSet::new();
        for (key, value) in &self.words {
            if &value.to_lowercase() == key {
                continue;
            }
            for token in tokens(value) {
                if self.is_rewritten_word(&token) {
                    return Err(TranslatorError::ChainedEntry {
                        key: key.clone(),
                        value: value.clone(),
                    });
                }
                outputs.insert(token);
            }
        }

        for rule in &self.phrases {
            let source = tokens(&rule.source);
            // word output completing a phrase on the next pass
            if let Some(token) = source.iter().find(|t| outputs.contains(*t)) {
                return Err(TranslatorError::ChainedEntry {
                    key: rule.source.clone(),
                    value: token.clone(),
                });
            }

            let target = tokens(&rule.target);
            let feeds_word = target.iter().any(|t| self.is_rewritten_word(t));
            let feeds_phrase = self.phrases.iter().any(|other| {
                other.pattern.is_match(&rule.target)
                    || overlaps(&target, &tokens(&other.source))
            });
            if feeds_word || feeds_phrase {
                return Err(TranslatorError::ChainedEntry {
                    key: rule.source.clone(),
                    value: rule.target.clone(),
                });
            }
        }
        Ok(())
    }

    fn is_rewritten_word(&self, token: &str) -> bool {
        self.words
            .get(token)
            .is_some_and(|v| v.to_lowercase() != token)
    }

    pub fn phrases(&self) -> &[PhraseRule] {
        &self.phrases
    }

    /// Case-insensitive single-word lookup.
    pub fn lookup_word(&self, token: &str) -> Option<&str> {
        self.words.get(&token.to_lowercase()).map(String::as_str)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    /// Back to the source form, phrases in their original order.
    pub fn to_data(&self) -> DictionaryData {
        let mut words: Vec<(String, String)> = self
            .words
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        words.sort();
        DictionaryData {
            phrases: self
                .phrases
                .iter()
                .map(|r| (r.source.clone(), r.target.clone()))
                .collect(),
            words,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(phrases: &[(&str, &str)], words: &[(&str, &str)]) -> DictionaryData {
        DictionaryData {
            phrases: to_owned_pairs(phrases),
            words: to_owned_pairs(words),
        }
    }

    #[test]
    fn test_builtin_passes_validation() {
        let dict = Dictionary::builtin().expect("built-in dictionary must validate");
        assert_eq!(dict.word_count(), lexicon::WORDS.len());
        assert_eq!(dict.phrase_count(), lexicon::PHRASES.len());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dict = Dictionary::from_data(data(&[], &[("Nicht", "net")])).unwrap();
        assert_eq!(dict.lookup_word("NICHT"), Some("net"));
        assert_eq!(dict.lookup_word("nicht"), Some("net"));
        assert_eq!(dict.lookup_word("nichts"), None);
    }

    #[test]
    fn test_empty_entries_rejected() {
        let err = Dictionary::from_data(data(&[], &[("", "x")])).unwrap_err();
        assert!(matches!(err, TranslatorError::EmptyEntry { table: Table::Words }));

        let err = Dictionary::from_data(data(&[("grüß gott", "")], &[])).unwrap_err();
        assert!(matches!(err, TranslatorError::EmptyEntry { table: Table::Phrases }));
    }

    #[test]
    fn test_duplicate_keys_rejected_after_lowercasing() {
        let err = Dictionary::from_data(data(&[], &[("ist", "is"), ("IST", "is")])).unwrap_err();
        assert!(matches!(err, TranslatorError::DuplicateEntry { table: Table::Words, .. }));

        let err = Dictionary::from_data(data(&[("Bis bald", "a"), ("bis BALD", "b")], &[]))
            .unwrap_err();
        assert!(matches!(err, TranslatorError::DuplicateEntry { table: Table::Phrases, .. }));
    }

    #[test]
    fn test_word_key_with_separator_rejected() {
        let err = Dictionary::from_data(data(&[], &[("guten tag", "servus")])).unwrap_err();
        assert!(matches!(err, TranslatorError::SeparatorInKey { .. }));
    }

    #[test]
    fn test_chained_word_rejected() {
        let err = Dictionary::from_data(data(&[], &[("nicht", "net"), ("net", "nett")]))
            .unwrap_err();
        assert!(matches!(err, TranslatorError::ChainedEntry { .. }));
    }

    #[test]
    fn test_identity_word_allowed() {
        let dict = Dictionary::from_data(data(&[], &[("sehr", "sehr")])).unwrap();
        assert_eq!(dict.lookup_word("Sehr"), Some("sehr"));
    }

    #[test]
    fn test_phrase_target_feeding_word_rejected() {
        let err = Dictionary::from_data(data(&[("bis bald", "baba ich")], &[("ich", "i")]))
            .unwrap_err();
        assert!(matches!(err, TranslatorError::ChainedEntry { .. }));
    }

    #[test]
    fn test_phrase_target_feeding_phrase_rejected() {
        let err = Dictionary::from_data(data(
            &[("guten tag", "griaß di"), ("griaß di", "servus")],
            &[],
        ))
        .unwrap_err();
        assert!(matches!(err, TranslatorError::ChainedEntry { .. }));
    }

    #[test]
    fn test_phrase_completed_by_word_output_rejected() {
        let err = Dictionary::from_data(data(&[("na klar", "eh kloa")], &[("nein", "na")]))
            .unwrap_err();
        assert!(matches!(err, TranslatorError::ChainedEntry { .. }));
    }

    #[test]
    fn test_multi_word_value_feeding_word_rejected() {
        let err = Dictionary::from_data(data(&[], &[("nicht", "gar net"), ("gar", "voll")]))
            .unwrap_err();
        assert!(matches!(err, TranslatorError::ChainedEntry { .. }));

        // a value repeating its own key grows on every pass
        let err = Dictionary::from_data(data(&[], &[("gar", "gar net")])).unwrap_err();
        assert!(matches!(err, TranslatorError::ChainedEntry { .. }));
    }

    #[test]
    fn test_multi_word_value_inside_phrase_rejected() {
        let err = Dictionary::from_data(data(&[("eh kloa", "passt")], &[("sicher", "eh gut")]))
            .unwrap_err();
        assert!(matches!(err, TranslatorError::ChainedEntry { .. }));
    }

    #[test]
    fn test_phrase_target_spilling_into_phrase_rejected() {
        let err = Dictionary::from_data(data(
            &[("wurscht und", "egal"), ("ist mir egal", "is ma wurscht")],
            &[],
        ))
        .unwrap_err();
        assert!(matches!(err, TranslatorError::ChainedEntry { .. }));

        // target landing in the middle of a longer source
        let err = Dictionary::from_data(data(&[("so a depp", "oida"), ("ein depp", "a depp")], &[]))
            .unwrap_err();
        assert!(matches!(err, TranslatorError::ChainedEntry { .. }));
    }

    #[test]
    fn test_unrelated_phrases_accepted() {
        let dict = Dictionary::from_data(data(
            &[("ist mir egal", "is ma wurscht"), ("viel spaß", "vü spaß")],
            &[("nicht", "gar net")],
        ))
        .unwrap();
        assert_eq!(dict.phrase_count(), 2);
    }

    #[test]
    fn test_token_overlap() {
        let t = |s: &str| tokens(s);
        assert!(overlaps(&t("is ma wurscht"), &t("wurscht und")));
        assert!(overlaps(&t("und so"), &t("so weiter")));
        assert!(overlaps(&t("a"), &t("so a depp")));
        assert!(!overlaps(&t("wie geht's dir"), &t("wie geht es dir")));
        assert!(!overlaps(&[], &t("egal")));
    }

    #[test]
    fn test_json_source_form() {
        let json = r#"{"phrases": [["wie geht es dir", "wie geht's dir"]], "words": [["nicht", "net"]]}"#;
        let parsed = DictionaryData::from_json_str(json).unwrap();
        let dict = Dictionary::from_data(parsed.clone()).unwrap();
        assert_eq!(dict.to_data(), parsed);
    }
}
