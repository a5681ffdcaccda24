//! ATS keyword extraction and scoring

pub mod stop_words;
pub mod text_processor;
pub mod keywords;
pub mod ats_scorer;

pub use ats_scorer::{ATSScore, ATSScorer, SCORING_TOP_N};
pub use keywords::{KeywordExtractor, RankedKeyword, DISPLAY_TOP_N};

/// Top `top_n` keyword phrases of a job description, using the default stop words
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<String> {
    KeywordExtractor::new().extract(text, top_n)
}

/// 0..=100 match score of a resume against a job description, using defaults
pub fn score_resume(resume_text: &str, job_description: &str) -> u8 {
    ATSScorer::new().score(resume_text, job_description)
}
