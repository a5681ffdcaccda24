//! ATS (Applicant Tracking System) keyword scoring
//!
//! A keyword phrase counts as matched when every one of its words occurs
//! somewhere in the resume, in any order. This is not phrase matching.

use crate::processing::keywords::KeywordExtractor;
use crate::processing::text_processor::TextProcessor;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Number of job keywords considered when scoring
pub const SCORING_TOP_N: usize = 50;

/// Maximum score
pub const MAX_SCORE: u8 = 100;

/// Result of scoring one resume against one job description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ATSScore {
    /// 0..=100
    pub score: u8,
    /// Scoring keywords in rank order
    pub keywords: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

impl ATSScore {
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    pub fn matched_count(&self) -> usize {
        self.matched_keywords.len()
    }
}

#[derive(Debug, Clone)]
pub struct ATSScorer {
    extractor: KeywordExtractor,
    processor: TextProcessor,
    scoring_top_n: usize,
}

impl Default for ATSScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ATSScorer {
    pub fn new() -> Self {
        Self::with_extractor(KeywordExtractor::new(), SCORING_TOP_N)
    }

    pub fn with_extractor(extractor: KeywordExtractor, scoring_top_n: usize) -> Self {
        Self {
            extractor,
            processor: TextProcessor::new(),
            scoring_top_n,
        }
    }

    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    pub fn scoring_top_n(&self) -> usize {
        self.scoring_top_n
    }

    /// Score a resume against a job description
    pub fn score(&self, resume_text: &str, job_description: &str) -> u8 {
        self.analyze(resume_text, job_description).score
    }

    /// Score with the matched / missing keyword breakdown
    pub fn analyze(&self, resume_text: &str, job_description: &str) -> ATSScore {
        let job = self.processor.normalize(job_description);
        let keywords = self.extractor.extract(&job, self.scoring_top_n);
        let resume_words = self.resume_words(resume_text);

        let (matched_keywords, missing_keywords): (Vec<String>, Vec<String>) = keywords
            .iter()
            .cloned()
            .partition(|keyword| Self::is_match(keyword, &resume_words));

        let score = Self::percentage(matched_keywords.len(), keywords.len());

        debug!(
            "ATS score {}: {}/{} keywords matched",
            score,
            matched_keywords.len(),
            keywords.len()
        );

        ATSScore {
            score,
            keywords,
            matched_keywords,
            missing_keywords,
        }
    }

    /// Lowercase word set of a resume, as used for matching
    pub fn resume_words(&self, resume_text: &str) -> HashSet<String> {
        self.processor.token_set(resume_text)
    }

    /// True when every word of the phrase is in the resume's word set
    pub fn is_match(keyword: &str, resume_words: &HashSet<String>) -> bool {
        keyword
            .split_whitespace()
            .all(|word| resume_words.contains(word))
    }

    /// `round(100 * matched / total)` capped at 100. Zero keywords score zero.
    ///
    /// Exact halves round up, not to even: 1 of 8 is 12.5 and scores 13,
    /// 3 of 8 is 37.5 and scores 38.
    fn percentage(matched: usize, total: usize) -> u8 {
        if total == 0 {
            return 0;
        }
        let rounded = (200 * matched + total) / (2 * total);
        rounded.min(MAX_SCORE as usize) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_match_rounds() {
        let scorer = ATSScorer::new();
        let result = scorer.analyze(
            "Experienced in Python and SQL development",
            "Python, SQL, Communication skills",
        );

        assert_eq!(result.score, 67);
        assert_eq!(result.matched_keywords, vec!["python", "sql"]);
        assert_eq!(result.missing_keywords, vec!["communication skills"]);
    }

    #[test]
    fn test_empty_job_description_scores_zero() {
        let scorer = ATSScorer::new();

        assert_eq!(scorer.score("Rust, Python, anything at all", ""), 0);
        assert_eq!(scorer.score("", ""), 0);
        assert_eq!(scorer.score("Rust", "the, and, of"), 0);
    }

    #[test]
    fn test_tokens_need_not_be_adjacent() {
        let scorer = ATSScorer::new();
        let score = scorer.score(
            "Skills: strong written communication. Leadership skills.",
            "Communication skills",
        );

        assert_eq!(score, 100);
    }

    #[test]
    fn test_substrings_do_not_match() {
        let scorer = ATSScorer::new();

        assert_eq!(scorer.score("JavaScript developer", "Java"), 0);
    }

    #[test]
    fn test_case_insensitive() {
        let scorer = ATSScorer::new();

        assert_eq!(scorer.score("PYTHON and sql", "python, SQL"), 100);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(ATSScorer::percentage(0, 3), 0);
        assert_eq!(ATSScorer::percentage(1, 3), 33);
        assert_eq!(ATSScorer::percentage(2, 3), 67);
        assert_eq!(ATSScorer::percentage(1, 8), 13);
        assert_eq!(ATSScorer::percentage(3, 8), 38);
        assert_eq!(ATSScorer::percentage(5, 8), 63);
        assert_eq!(ATSScorer::percentage(5, 5), 100);
        assert_eq!(ATSScorer::percentage(0, 0), 0);
    }

    #[test]
    fn test_scoring_list_is_truncated() {
        let scorer = ATSScorer::with_extractor(KeywordExtractor::new(), 2);
        let result = scorer.analyze("rust", "rust, python, java");

        assert_eq!(result.keywords, vec!["rust", "python"]);
        assert_eq!(result.score, 50);
    }

    #[test]
    fn test_adding_matching_words_never_lowers_score() {
        let scorer = ATSScorer::new();
        let job = "Rust, Kubernetes, distributed systems, PostgreSQL";
        let mut resume = String::from("Backend engineer");
        let mut last = scorer.score(&resume, job);

        for word in ["rust", "distributed", "kubernetes", "systems", "postgresql"] {
            resume.push(' ');
            resume.push_str(word);
            let score = scorer.score(&resume, job);
            assert!(score >= last);
            last = score;
        }

        assert_eq!(last, 100);
    }
}
