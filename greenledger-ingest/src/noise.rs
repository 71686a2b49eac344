//! Noise classification for extracted statement lines.
//!
//! Transaction rows always open with an `MM/DD` date, so anything starting
//! with a letter is a header. The phrase denylist catches boilerplate that
//! starts with a digit or symbol (page markers, addresses, legal footers).

use crate::parsers::collapse_whitespace;

const BUILTIN_PHRASES: &str = include_str!("../data/noise_phrases.txt");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseFilter {
    /// Lowercased phrases, matched on word boundaries
    phrases: Vec<String>,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::from_phrase_list(BUILTIN_PHRASES)
    }
}

impl NoiseFilter {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|p| collapse_whitespace(p.as_ref()).to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases }
    }

    /// Parse a phrase list: one phrase per line, `#` starts a comment line.
    pub fn from_phrase_list(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    pub fn with_extra_phrases<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.phrases.extend(Self::new(extra).phrases);
        self
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn is_noise(&self, line: &str) -> bool {
        let line = collapse_whitespace(line);
        let Some(first) = line.chars().next() else {
            return true;
        };
        if first.is_alphabetic() {
            return true;
        }

        let lowered = line.to_lowercase();
        self.phrases
            .iter()
            .any(|phrase| contains_on_word_boundary(&lowered, phrase))
    }
}

/// Substring match that refuses to split a word on either edge, so a short
/// phrase cannot fire inside a merchant name.
fn contains_on_word_boundary(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(start, m)| {
        let end = start + m.len();
        let before_ok = !starts_word(phrase)
            || haystack[..start]
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = !ends_word(phrase)
            || haystack[end..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

fn starts_word(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_alphanumeric)
}

fn ends_word(s: &str) -> bool {
    s.chars().next_back().is_some_and(char::is_alphanumeric)
}
