use crate::core::dictionary::Dictionary;
use crate::core::types::{Segment, TranslationResult};
use crate::errors::Result;
use tracing::trace;

/// Characters that split tokens in the word pass, next to whitespace.
pub const PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '\'', '"', '(', ')', '[', ']', '{', '}'];

fn is_separator(c: char) -> bool {
    c.is_whitespace() || PUNCTUATION.contains(&c)
}

/// Splits text into alternating token and separator runs. Concatenating the
/// runs always gives back the input.
pub fn segments(text: &str) -> Segments<'_> {
    Segments { rest: text }
}

pub struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let separator = is_separator(first);
        let end = self
            .rest
            .char_indices()
            .find(|&(_, c)| is_separator(c) != separator)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if separator {
            Segment::Separator(run)
        } else {
            Segment::Token(run)
        })
    }
}

/// Re-cases `replacement` after the matched `original`: all caps stays all
/// caps, a leading capital is kept, anything else is lowercased.
pub fn match_case(original: &str, replacement: &str) -> String {
    let Some(first) = original.chars().next() else {
        return replacement.to_string();
    };
    if original == original.to_uppercase() {
        return replacement.to_uppercase();
    }
    if first.to_uppercase().eq(std::iter::once(first)) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(head) => head.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    replacement.to_lowercase()
}

/// Dictionary-driven lexical substitution. Stateless apart from the
/// immutable dictionary, so one engine serves every call site.
pub struct TranslationEngine {
    dictionary: Dictionary,
}

impl TranslationEngine {
    pub fn new(dictionary: Dictionary) -> Self {
        Self { dictionary }
    }

    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Dictionary::builtin()?))
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Absent input is a pass-through, not an error.
    pub fn translate_optional(&self, input: Option<&str>) -> TranslationResult {
        match input {
            Some(text) => self.translate(text),
            None => TranslationResult::unchanged(""),
        }
    }

    pub fn translate(&self, input: &str) -> TranslationResult {
        if input.is_empty() {
            return TranslationResult::unchanged(input);
        }

        let mut changed = false;
        let mut working = input.to_string();

        // 1. Phrases, in dictionary order, over the cumulative text
        for rule in self.dictionary.phrases() {
            if !rule.pattern.is_match(&working) {
                continue;
            }
            changed = true;
            working = rule
                .pattern
                .replace_all(&working, |caps: &regex::Captures| {
                    match_case(&caps[0], &rule.target)
                })
                .into_owned();
            trace!(phrase = %rule.source, "phrase matched");
        }

        // 2. Single words; separators are copied verbatim
        let mut output = String::with_capacity(working.len());
        for segment in segments(&working) {
            match segment {
                Segment::Token(token) => match self.dictionary.lookup_word(token) {
                    Some(target) => {
                        changed = true;
                        output.push_str(&match_case(token, target));
                    }
                    None => output.push_str(token),
                },
                Segment::Separator(sep) => output.push_str(sep),
            }
        }

        TranslationResult {
            output_text: output,
            changed,
            source_text: input.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dictionary::DictionaryData;

    fn engine(phrases: &[(&str, &str)], words: &[(&str, &str)]) -> TranslationEngine {
        let data = DictionaryData {
            phrases: phrases
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            words: words
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        TranslationEngine::new(Dictionary::from_data(data).unwrap())
    }

    #[test]
    fn test_segments_cover_input() {
        let text = "Hallo, wie geht's?  Gut!";
        let joined: String = segments(text).map(|s| s.as_str()).collect();
        assert_eq!(joined, text);

        let parts: Vec<Segment> = segments("geht's?").collect();
        assert_eq!(
            parts,
            vec![
                Segment::Token("geht"),
                Segment::Separator("'"),
                Segment::Token("s"),
                Segment::Separator("?"),
            ]
        );
    }

    #[test]
    fn test_match_case() {
        assert_eq!(match_case("SERVUS", "servas"), "SERVAS");
        assert_eq!(match_case("Servus", "servas"), "Servas");
        assert_eq!(match_case("servus", "Servas"), "servas");
        assert_eq!(match_case("sErVuS", "servas"), "servas");
        assert_eq!(match_case("", "servas"), "servas");
        // only the first letter is touched when capitalising
        assert_eq!(match_case("Wie geht es dir", "wie geht's dir"), "Wie geht's dir");
    }

    #[test]
    fn test_empty_and_absent_input() {
        let engine = TranslationEngine::builtin().unwrap();
        let result = engine.translate("");
        assert!(!result.changed);
        assert_eq!(result.output_text, "");

        let result = engine.translate_optional(None);
        assert!(!result.changed);
        assert_eq!(result.output_text, "");
        assert_eq!(result.source_text, "");
    }

    #[test]
    fn test_case_preservation() {
        let engine = engine(&[], &[("servus", "servas")]);
        assert_eq!(engine.translate("SERVUS").output_text, "SERVAS");
        assert_eq!(engine.translate("Servus").output_text, "Servas");
        assert_eq!(engine.translate("servus").output_text, "servas");
    }

    #[test]
    fn test_word_boundary_safety() {
        let engine = engine(&[], &[("ist", "is")]);
        let result = engine.translate("Das ist eine Liste");
        assert!(result.changed);
        assert_eq!(result.output_text, "Das is eine Liste");
    }

    #[test]
    fn test_phrase_boundary_safety() {
        let engine = engine(&[("bis bald", "servas")], &[]);
        assert!(!engine.translate("Gibt's bis baldrian?").changed);
        assert_eq!(engine.translate("Bis bald!").output_text, "Servas!");
    }

    #[test]
    fn test_punctuation_fidelity() {
        let engine = TranslationEngine::builtin().unwrap();
        let result = engine.translate("Hallo, wie geht's?");
        assert!(result.changed);
        assert_eq!(result.output_text, "Servus, wie geht's?");
        assert_eq!(result.source_text, "Hallo, wie geht's?");
    }

    #[test]
    fn test_scenario_phrase_then_words() {
        let engine = engine(
            &[("wie geht es dir", "wie geht's dir")],
            &[("nicht", "net"), ("sehr", "sehr")],
        );
        let result = engine.translate("Wie geht es dir? Ich bin nicht sehr müde.");
        assert!(result.changed);
        assert_eq!(result.output_text, "Wie geht's dir? Ich bin net sehr müde.");
    }

    #[test]
    fn test_earlier_phrase_wins_overlap() {
        let engine = engine(
            &[("das ist mir egal", "des is ma wurscht"), ("mir egal", "wurscht")],
            &[],
        );
        assert_eq!(
            engine.translate("Das ist mir egal").output_text,
            "Des is ma wurscht"
        );
    }

    #[test]
    fn test_every_match_recased_independently() {
        let engine = engine(&[], &[("nicht", "net")]);
        assert_eq!(
            engine.translate("NICHT nicht Nicht").output_text,
            "NET net Net"
        );
    }

    #[test]
    fn test_unmatched_text_is_unchanged() {
        let engine = TranslationEngine::builtin().unwrap();
        let result = engine.translate("Pog 123 KEKW");
        assert!(!result.changed);
        assert_eq!(result.output_text, "Pog 123 KEKW");
    }

    #[test]
    fn test_idempotent_with_builtin_dictionary() {
        let engine = TranslationEngine::builtin().unwrap();
        let samples = [
            "Hallo, wie geht es dir?",
            "Das ist mir egal, ich weiß nicht.",
            "Nein, ich habe KEINE Ahnung was los ist!",
            "Guten Morgen, wir haben Tomaten und Kartoffeln.",
            "Bis bald und viel Spaß!",
            "Ein bisschen Sahne auf den Pfannkuchen, bitte.",
            "Das Mädchen und der Junge gehen jetzt schnell.",
            "Auf Wiedersehen, tschüss!",
        ];
        for sample in samples {
            let first = engine.translate(sample);
            assert!(first.changed, "expected a change for: {}", sample);
            let second = engine.translate(&first.output_text);
            assert!(!second.changed, "second pass changed: {}", first.output_text);
            assert_eq!(second.output_text, first.output_text);
        }
    }
}
