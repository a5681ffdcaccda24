//! ATS report model

use crate::processing::{ATSScore, ATSScorer, KeywordExtractor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ATSReport {
    pub ats: ATSScore,
    /// Display keywords, ranked independently of the scoring list
    pub suggested_keywords: Vec<SuggestedKeyword>,
    pub verdict: String,
    pub metadata: ReportMetadata,
}

/// A display keyword checked against the resume on its own, whether or not
/// it made the scoring list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedKeyword {
    pub phrase: String,
    pub frequency: usize,
    pub matched: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub resume_source: Option<String>,
    pub job_source: Option<String>,
}

impl ATSReport {
    pub fn build(
        resume_text: &str,
        job_description: &str,
        scorer: &ATSScorer,
        extractor: &KeywordExtractor,
        display_top_n: usize,
    ) -> Self {
        let ats = scorer.analyze(resume_text, job_description);
        let resume_words = scorer.resume_words(resume_text);
        let suggested_keywords = extractor
            .rank_phrases(job_description)
            .into_iter()
            .take(display_top_n)
            .map(|ranked| SuggestedKeyword {
                matched: ATSScorer::is_match(&ranked.phrase, &resume_words),
                phrase: ranked.phrase,
                frequency: ranked.frequency,
            })
            .collect();

        Self {
            verdict: Self::verdict_for(ats.score).to_string(),
            ats,
            suggested_keywords,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                resume_source: None,
                job_source: None,
            },
        }
    }

    pub fn with_sources(mut self, resume_source: Option<String>, job_source: Option<String>) -> Self {
        self.metadata.resume_source = resume_source;
        self.metadata.job_source = job_source;
        self
    }

    pub fn score(&self) -> u8 {
        self.ats.score
    }

    /// Suggested keywords the resume does not cover yet
    pub fn keywords_to_add(&self) -> Vec<&str> {
        self.suggested_keywords
            .iter()
            .filter(|k| !k.matched)
            .map(|k| k.phrase.as_str())
            .collect()
    }

    fn verdict_for(score: u8) -> &'static str {
        match score {
            80..=100 => "Strong keyword match",
            60..=79 => "Good keyword match",
            40..=59 => "Partial keyword match",
            1..=39 => "Weak keyword match",
            _ => "No keyword match",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_report() {
        let report = ATSReport::build(
            "Experienced in Python and SQL development",
            "Python, SQL, Communication skills",
            &ATSScorer::new(),
            &KeywordExtractor::new(),
            15,
        );

        assert_eq!(report.score(), 67);
        assert_eq!(report.verdict, "Good keyword match");
        assert_eq!(report.suggested_keywords.len(), 3);
        assert_eq!(report.keywords_to_add(), vec!["communication skills"]);
    }

    #[test]
    fn test_display_and_scoring_lists_are_independent() {
        let job = "a1, b2, c3, d4";
        let report = ATSReport::build("a1", job, &ATSScorer::new(), &KeywordExtractor::new(), 2);

        assert_eq!(report.suggested_keywords.len(), 2);
        assert_eq!(report.ats.keyword_count(), 4);
        assert_eq!(report.score(), 25);
    }

    #[test]
    fn test_display_keywords_beyond_scoring_list_are_checked() {
        let scorer = ATSScorer::with_extractor(KeywordExtractor::new(), 1);
        let report = ATSReport::build("nothing relevant", "rust, python", &scorer, &KeywordExtractor::new(), 15);

        assert_eq!(report.ats.keywords, vec!["rust"]);
        assert_eq!(report.suggested_keywords.len(), 2);
        assert!(report.suggested_keywords.iter().all(|k| !k.matched));
        assert_eq!(report.keywords_to_add(), vec!["rust", "python"]);

        let covered = ATSReport::build("python developer", "rust, python", &scorer, &KeywordExtractor::new(), 15);
        assert!(covered.suggested_keywords[1].matched);
        assert_eq!(covered.keywords_to_add(), vec!["rust"]);
    }

    #[test]
    fn test_empty_job() {
        let report = ATSReport::build("anything", "", &ATSScorer::new(), &KeywordExtractor::new(), 15);

        assert_eq!(report.score(), 0);
        assert!(report.suggested_keywords.is_empty());
        assert_eq!(report.verdict, "No keyword match");
    }
}
