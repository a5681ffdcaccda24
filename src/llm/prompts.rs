//! Prompt templates for resume parsing, tailoring, editing and cover letters

use regex::{Captures, Regex};

/// Section headers a generated resume may use, in Proper Case
pub const ALLOWED_HEADERS: [&str; 7] = [
    "Summary",
    "Experience",
    "Education",
    "Skills",
    "Projects",
    "Achievements",
    "Interests / Hobbies",
];

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub parse_resume: String,
    pub tailor_resume: String,
    pub chat_edit: String,
    pub cover_letter: String,
    placeholder: Regex,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        let headers = ALLOWED_HEADERS.join(", ");

        Self {
            parse_resume: PARSE_RESUME_TEMPLATE.to_string(),
            tailor_resume: TAILOR_RESUME_TEMPLATE.replace("{headers}", &headers),
            chat_edit: CHAT_EDIT_TEMPLATE.replace("{headers}", &headers),
            cover_letter: COVER_LETTER_TEMPLATE.to_string(),
            placeholder: Regex::new(r"\{(\w+)\}").expect("Invalid placeholder regex"),
        }
    }
}

impl PromptTemplates {
    pub fn render_parse_resume(&self, resume_text: &str) -> String {
        self.fill(&self.parse_resume, &[("resume", resume_text)])
    }

    pub fn render_tailor_resume(&self, resume_json: &str, job_description: &str) -> String {
        self.fill(
            &self.tailor_resume,
            &[("resume_json", resume_json), ("job", job_description)],
        )
    }

    pub fn render_chat_edit(&self, resume_text: &str, instruction: &str) -> String {
        self.fill(
            &self.chat_edit,
            &[("resume", resume_text), ("instruction", instruction)],
        )
    }

    pub fn render_cover_letter(&self, resume_text: &str, job_description: &str) -> String {
        self.fill(
            &self.cover_letter,
            &[("resume", resume_text), ("job", job_description)],
        )
    }

    /// Substitute `{name}` placeholders in a single pass, so inserted user text is
    /// never scanned for placeholders. Unknown placeholders are left as-is.
    fn fill(&self, template: &str, params: &[(&str, &str)]) -> String {
        self.placeholder
            .replace_all(template, |caps: &Captures| {
                params
                    .iter()
                    .find(|(name, _)| *name == &caps[1])
                    .map(|(_, value)| value.to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

const PARSE_RESUME_TEMPLATE: &str = r#"You are an AI resume parser. Extract the following fields in strict JSON format:
- personal_info
- summary
- education
- experience
- skills
- projects
- achievements

Resume text:
"""{resume}"""

Return ONLY valid JSON. If some fields are missing, leave them empty."#;

const TAILOR_RESUME_TEMPLATE: &str = r#"You are an AI assistant that rewrites resumes to match the given job description.

Resume JSON: {resume_json}
Job description: {job}

Return a plain text resume that meets the following rules:
- Only include these headers if there is content: {headers}
- Headers must appear exactly in Proper Case.
- Omit any section that has no content.
- Highlight relevant skills, experience, and education.
- Preserve personal_info (name and contact info) at the top.
- Do NOT add commentary or explanations.
- Format clearly and professionally."#;

const CHAT_EDIT_TEMPLATE: &str = r#"You are an AI assistant that edits resumes.
Resume text: {resume}
Instruction: {instruction}

Return the edited resume in plain text following these rules:
- Keep headers consistent with Proper Case: {headers}.
- Only include sections that have content; omit empty sections.
- Preserve personal_info (name and contact info) at the top.
- Do not include any commentary or suggestions, only the resume content."#;

const COVER_LETTER_TEMPLATE: &str = r#"You are an AI assistant that writes professional cover letters.
Resume content: {resume}
Job description: {job}

Return a concise, professional cover letter that highlights relevant skills and experience.
Do NOT include explanations, just the cover letter content."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tailor_rendering() {
        let templates = PromptTemplates::default();
        let prompt = templates.render_tailor_resume(r#"{"skills":["Rust"]}"#, "Senior Rust Engineer");

        assert!(prompt.contains(r#"Resume JSON: {"skills":["Rust"]}"#));
        assert!(prompt.contains("Job description: Senior Rust Engineer"));
        assert!(prompt.contains("Interests / Hobbies"));
        assert!(!prompt.contains("{headers}"));
    }

    #[test]
    fn test_user_text_is_not_rescanned() {
        let templates = PromptTemplates::default();
        let prompt = templates.render_chat_edit("Jane Doe {instruction}", "Shorten the summary");

        assert!(prompt.contains("Resume text: Jane Doe {instruction}"));
        assert!(prompt.contains("Instruction: Shorten the summary"));
    }

    #[test]
    fn test_fill_leaves_unknown_placeholders() {
        let templates = PromptTemplates::default();
        assert_eq!(templates.fill("{a} {b} {c}", &[("a", "{b}"), ("b", "2")]), "{b} 2 {c}");
    }

    #[test]
    fn test_parse_and_cover_letter_rendering() {
        let templates = PromptTemplates::default();

        let parse = templates.render_parse_resume("Jane Doe, Rust developer");
        assert!(parse.contains(r#""""Jane Doe, Rust developer""""#));
        assert!(parse.contains("Return ONLY valid JSON"));

        let letter = templates.render_cover_letter("Jane Doe", "Backend role");
        assert!(letter.contains("Resume content: Jane Doe"));
        assert!(letter.contains("Job description: Backend role"));
    }
}
