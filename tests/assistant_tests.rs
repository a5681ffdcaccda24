//! Resume assistant tests against a canned text generator

use resume_tailor::llm::{ParsedResume, ResumeAssistant, Temperatures, TextGenerator};
use resume_tailor::{Result, ResumeTailorError};
use std::sync::Mutex;

struct CannedGenerator {
    response: String,
    calls: Mutex<Vec<(String, f32)>>,
}

impl CannedGenerator {
    fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, f32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl TextGenerator for CannedGenerator {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        self.calls.lock().unwrap().push((prompt.to_string(), temperature));
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

struct FailingGenerator;

impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str, _temperature: f32) -> Result<String> {
        Err(ResumeTailorError::Generation("model offline".to_string()))
    }

    fn model_name(&self) -> &str {
        "offline"
    }
}

fn assistant(response: &str) -> ResumeAssistant<CannedGenerator> {
    ResumeAssistant::new(CannedGenerator::new(response), Temperatures::default())
}

#[tokio::test]
async fn test_parse_resume_json_in_code_fence() {
    let assistant = assistant(
        "```json\n{\"personal_info\": {\"name\": \"Jane Doe\"}, \"Summary\": \"Rust engineer\", \"skills\": [\"Rust\", \"SQL\"]}\n```",
    );

    let parsed = assistant.parse_resume("Jane Doe\nRust engineer").await.unwrap();

    assert!(!parsed.is_fallback());
    assert_eq!(parsed.personal_info["name"], "Jane Doe");
    assert_eq!(parsed.summary, "Rust engineer");
    assert_eq!(parsed.skills[1], "SQL");
    assert!(parsed.projects.is_null());

    let calls = assistant.generator().calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.contains("Jane Doe\nRust engineer"));
    assert_eq!(calls[0].1, 0.1);
}

#[tokio::test]
async fn test_parse_resume_falls_back_on_invalid_json() {
    let assistant = assistant("Sure! Here is the parsed resume: name is Jane");

    let parsed = assistant.parse_resume("Jane Doe resume").await.unwrap();

    assert!(parsed.is_fallback());
    assert_eq!(parsed, ParsedResume::fallback("Jane Doe resume"));
    assert_eq!(parsed.raw_text.as_deref(), Some("Jane Doe resume"));
}

#[tokio::test]
async fn test_parse_resume_propagates_generation_errors() {
    let assistant = ResumeAssistant::new(FailingGenerator, Temperatures::default());

    let result = assistant.parse_resume("Jane Doe").await;
    assert!(matches!(result, Err(ResumeTailorError::Generation(_))));
}

#[tokio::test]
async fn test_tailor_resume_cleans_output() {
    let assistant = assistant(
        "Here is your resume tailored for the role:\n\n**Jane Doe**\n\nSkills\n* Rust\n- Kubernetes\n\nTo further refine this resume, quantify results.",
    );
    let parsed = ParsedResume::fallback("Jane Doe\nSkills: Rust");

    let tailored = assistant.tailor_resume(&parsed, "Rust, Kubernetes").await.unwrap();

    assert_eq!(tailored, "Jane Doe\nSkills\nRust\nKubernetes");

    let calls = assistant.generator().calls();
    assert!(calls[0].0.contains("Job description: Rust, Kubernetes"));
    assert!(calls[0].0.contains("\"raw_text\":\"Jane Doe\\nSkills: Rust\""));
    assert_eq!(calls[0].1, 0.5);
}

#[tokio::test]
async fn test_tailor_resume_requires_job_description() {
    let assistant = assistant("unused");

    let result = assistant.tailor_resume(&ParsedResume::default(), "   ").await;

    assert!(matches!(result, Err(ResumeTailorError::InvalidInput(_))));
    assert!(assistant.generator().calls().is_empty());
}

#[tokio::test]
async fn test_chat_edit() {
    let assistant = assistant("Jane Doe\n\n__Summary__\nRust engineer");

    let edited = assistant
        .chat_edit("Jane Doe\nSummary\nEngineer", "  mention Rust  ")
        .await
        .unwrap();

    assert_eq!(edited, "Jane Doe\nSummary\nRust engineer");
    let calls = assistant.generator().calls();
    assert!(calls[0].0.contains("Instruction: mention Rust\n"));
    assert_eq!(calls[0].1, 0.3);
}

#[tokio::test]
async fn test_chat_edit_rejects_empty_instruction() {
    let assistant = assistant("unused");

    let result = assistant.chat_edit("Jane Doe", "").await;
    assert!(matches!(result, Err(ResumeTailorError::InvalidInput(_))));
}

#[tokio::test]
async fn test_cover_letter_is_trimmed_not_cleaned() {
    let assistant = assistant("\n  Dear Hiring Manager,\n\n* I build **Rust** services.\n  ");

    let letter = assistant.cover_letter("Jane Doe", "Rust role").await.unwrap();

    assert_eq!(letter, "Dear Hiring Manager,\n\n* I build **Rust** services.");
}

#[tokio::test]
async fn test_empty_generation_is_an_error() {
    let assistant = assistant("   \n  ");

    let result = assistant.cover_letter("Jane Doe", "Rust role").await;
    assert!(matches!(result, Err(ResumeTailorError::Generation(_))));
}
