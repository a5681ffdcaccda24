//! Text normalization and tokenization shared by keyword extraction and scoring

use regex::Regex;
use std::collections::HashSet;

/// Characters that separate candidate phrases in a job description
pub const PHRASE_DELIMITERS: [char; 4] = [',', ':', ';', '\n'];

#[derive(Debug, Clone)]
pub struct TextProcessor {
    word_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        // Unicode-aware: letters, digits and underscore runs
        let word_regex = Regex::new(r"\w+").expect("Invalid word regex");

        Self { word_regex }
    }

    /// Lowercase the whole text
    pub fn normalize(&self, text: &str) -> String {
        text.to_lowercase()
    }

    /// Split text into raw candidate phrases on the phrase delimiters.
    /// Pieces are returned untrimmed; empty pieces are kept.
    pub fn split_phrases<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> {
        text.split(&PHRASE_DELIMITERS[..])
    }

    /// Word tokens in order of appearance
    pub fn tokenize<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.word_regex.find_iter(text).map(|m| m.as_str())
    }

    /// Deduplicated set of lowercase word tokens
    pub fn token_set(&self, text: &str) -> HashSet<String> {
        let normalized = self.normalize(text);
        self.tokenize(&normalized).map(str::to_string).collect()
    }

    /// Normalize one candidate phrase: tokenize, drop stop words, rejoin with
    /// single spaces. Returns `None` when nothing survives.
    pub fn normalize_phrase(&self, phrase: &str, stop_words: &HashSet<String>) -> Option<String> {
        let trimmed = phrase.trim();
        if trimmed.is_empty() {
            return None;
        }

        let words: Vec<&str> = self
            .tokenize(trimmed)
            .filter(|token| !stop_words.contains(*token))
            .collect();

        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    }
}
