//! Resume assistant: parsing, tailoring, chat edits and cover letters

use crate::config::GeneratorConfig;
use crate::error::{Result, ResumeTailorError};
use crate::llm::cleanup::ResponseCleaner;
use crate::llm::generator::TextGenerator;
use crate::llm::prompts::PromptTemplates;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured resume fields as returned by the model. Field shapes vary
/// between models, so values are kept as loose JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResume {
    pub personal_info: Value,
    #[serde(alias = "Summary")]
    pub summary: Value,
    pub education: Value,
    pub experience: Value,
    pub skills: Value,
    pub projects: Value,
    pub achievements: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl ParsedResume {
    /// Empty structure that only carries the unparsed resume text
    pub fn fallback(resume_text: &str) -> Self {
        Self {
            personal_info: serde_json::json!({ "name": "", "contact": "" }),
            summary: Value::Array(Vec::new()),
            education: Value::Array(Vec::new()),
            experience: Value::Array(Vec::new()),
            skills: Value::Array(Vec::new()),
            projects: Value::Array(Vec::new()),
            achievements: Value::Array(Vec::new()),
            raw_text: Some(resume_text.to_string()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.raw_text.is_some()
    }
}

/// Sampling temperature per task
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperatures {
    pub parse: f32,
    pub tailor: f32,
    pub edit: f32,
    pub cover_letter: f32,
}

impl Default for Temperatures {
    fn default() -> Self {
        Self {
            parse: 0.1,
            tailor: 0.5,
            edit: 0.3,
            cover_letter: 0.3,
        }
    }
}

impl From<&GeneratorConfig> for Temperatures {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            parse: config.parse_temperature,
            tailor: config.tailor_temperature,
            edit: config.edit_temperature,
            cover_letter: config.cover_letter_temperature,
        }
    }
}

pub struct ResumeAssistant<G: TextGenerator> {
    generator: G,
    templates: PromptTemplates,
    cleaner: ResponseCleaner,
    temperatures: Temperatures,
}

impl<G: TextGenerator> ResumeAssistant<G> {
    pub fn new(generator: G, temperatures: Temperatures) -> Self {
        Self {
            generator,
            templates: PromptTemplates::default(),
            cleaner: ResponseCleaner::new(),
            temperatures,
        }
    }

    pub fn with_templates(mut self, templates: PromptTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Parse resume text into fields. Output that is not valid JSON falls back
    /// to an empty structure carrying the raw text; generation failures propagate.
    pub async fn parse_resume(&self, resume_text: &str) -> Result<ParsedResume> {
        info!("Parsing resume with {}", self.generator.model_name());
        let prompt = self.templates.render_parse_resume(resume_text);
        let response = self.generator.generate(&prompt, self.temperatures.parse).await?;

        let json = self.cleaner.strip_code_fence(&response);
        match serde_json::from_str::<ParsedResume>(json) {
            Ok(parsed) => {
                debug!("Resume parsed into structured fields");
                Ok(parsed)
            }
            Err(e) => {
                warn!("Failed to parse resume JSON ({}); falling back to raw text", e);
                Ok(ParsedResume::fallback(resume_text))
            }
        }
    }

    /// Rewrite a parsed resume for a job description
    pub async fn tailor_resume(&self, resume: &ParsedResume, job_description: &str) -> Result<String> {
        if job_description.trim().is_empty() {
            return Err(ResumeTailorError::InvalidInput(
                "Please provide a job description".to_string(),
            ));
        }

        let resume_json = serde_json::to_string(resume)?;
        let prompt = self.templates.render_tailor_resume(&resume_json, job_description);
        let response = self.generator.generate(&prompt, self.temperatures.tailor).await?;

        self.non_empty(self.cleaner.clean_resume(&response), "tailored resume")
    }

    /// Apply a free-form edit instruction to resume text
    pub async fn chat_edit(&self, resume_text: &str, instruction: &str) -> Result<String> {
        if instruction.trim().is_empty() {
            return Err(ResumeTailorError::InvalidInput(
                "Edit instruction must not be empty".to_string(),
            ));
        }

        let prompt = self.templates.render_chat_edit(resume_text, instruction.trim());
        let response = self.generator.generate(&prompt, self.temperatures.edit).await?;

        self.non_empty(self.cleaner.clean_resume(&response), "edited resume")
    }

    pub async fn cover_letter(&self, resume_text: &str, job_description: &str) -> Result<String> {
        if job_description.trim().is_empty() {
            return Err(ResumeTailorError::InvalidInput(
                "Please provide a job description".to_string(),
            ));
        }

        let prompt = self.templates.render_cover_letter(resume_text, job_description);
        let response = self
            .generator
            .generate(&prompt, self.temperatures.cover_letter)
            .await?;

        self.non_empty(response.trim().to_string(), "cover letter")
    }

    fn non_empty(&self, text: String, what: &str) -> Result<String> {
        if text.trim().is_empty() {
            Err(ResumeTailorError::Generation(format!(
                "{} returned an empty {}",
                self.generator.model_name(),
                what
            )))
        } else {
            Ok(text)
        }
    }
}
