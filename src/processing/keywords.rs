//! Keyword extraction from job descriptions
//!
//! A job description is split into delimiter-separated phrases ("3+ years
//! experience", "python"), each phrase is normalized and stop-word filtered,
//! and the phrases are ranked by how often they occur. Text without any
//! delimiter collapses into a single phrase; that is expected behavior.

use crate::processing::stop_words::english_stop_words;
use crate::processing::text_processor::TextProcessor;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default number of keywords shown to the user
pub const DISPLAY_TOP_N: usize = 15;

/// A normalized phrase and how many times it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedKeyword {
    pub phrase: String,
    pub frequency: usize,
}

#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    processor: TextProcessor,
    stop_words: HashSet<String>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    /// Extractor using the pinned English stop-word list
    pub fn new() -> Self {
        Self::with_stop_words(english_stop_words())
    }

    pub fn with_stop_words(stop_words: HashSet<String>) -> Self {
        Self {
            processor: TextProcessor::new(),
            stop_words,
        }
    }

    pub fn stop_words(&self) -> &HashSet<String> {
        &self.stop_words
    }

    /// Rank every distinct phrase by descending frequency. Ties keep the
    /// order in which the phrases first appeared.
    pub fn rank_phrases(&self, text: &str) -> Vec<RankedKeyword> {
        let normalized = self.processor.normalize(text);

        let mut ranked: Vec<RankedKeyword> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for candidate in self.processor.split_phrases(&normalized) {
            let Some(phrase) = self.processor.normalize_phrase(candidate, &self.stop_words) else {
                continue;
            };

            match index.get(&phrase) {
                Some(&position) => ranked[position].frequency += 1,
                None => {
                    index.insert(phrase.clone(), ranked.len());
                    ranked.push(RankedKeyword { phrase, frequency: 1 });
                }
            }
        }

        // sort_by is stable, which preserves first-seen order on ties
        ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));

        debug!("Ranked {} distinct phrases", ranked.len());
        ranked
    }

    /// Top `top_n` phrases, most frequent first
    pub fn extract(&self, text: &str, top_n: usize) -> Vec<String> {
        self.rank_phrases(text)
            .into_iter()
            .take(top_n)
            .map(|keyword| keyword.phrase)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_on_ties() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.extract("Python, SQL, Communication skills", DISPLAY_TOP_N);

        assert_eq!(keywords, vec!["python", "sql", "communication skills"]);
    }

    #[test]
    fn test_duplicates_collapse_case_insensitively() {
        let extractor = KeywordExtractor::new();
        let ranked = extractor.rank_phrases("Docker, Python, python, PYTHON");

        assert_eq!(ranked[0], RankedKeyword { phrase: "python".to_string(), frequency: 3 });
        assert_eq!(ranked[1], RankedKeyword { phrase: "docker".to_string(), frequency: 1 });
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_more_frequent_phrase_overtakes_earlier_one() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.extract("Java; Rust; Kubernetes\nRust; Kubernetes: Rust", 10);

        assert_eq!(keywords, vec!["rust", "kubernetes", "java"]);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        let extractor = KeywordExtractor::new();

        assert!(extractor.extract("", 15).is_empty());
        assert!(extractor.extract("   \n\t  ", 15).is_empty());
        assert!(extractor.extract(",,;;::\n", 15).is_empty());
    }

    #[test]
    fn test_stop_word_only_phrases_are_dropped() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.extract("and the, of, Rust", 15);

        assert_eq!(keywords, vec!["rust"]);
    }

    #[test]
    fn test_multi_word_phrases_keep_word_order() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.extract("3+ years of experience with the AWS cloud", 15);

        assert_eq!(keywords, vec!["3 years experience aws cloud"]);
    }

    #[test]
    fn test_text_without_delimiters_is_one_phrase() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.extract("We are looking for a backend engineer who loves Rust", 15);

        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0], "looking backend engineer loves rust");
    }

    #[test]
    fn test_top_n_truncation() {
        let extractor = KeywordExtractor::new();
        let text = "a1, b2, c3, d4, e5, f6";

        assert_eq!(extractor.extract(text, 3), vec!["a1", "b2", "c3"]);
        assert!(extractor.extract(text, 0).is_empty());
        assert_eq!(extractor.extract(text, 100).len(), 6);
    }

    #[test]
    fn test_custom_stop_words() {
        let stop_words: HashSet<String> = ["skills"].iter().map(|s| s.to_string()).collect();
        let extractor = KeywordExtractor::with_stop_words(stop_words);
        let keywords = extractor.extract("Communication skills, the team", 15);

        assert_eq!(keywords, vec!["communication", "the team"]);
    }
}
