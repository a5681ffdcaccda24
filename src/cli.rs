//! CLI interface for the resume tailor

use crate::config::OutputFormat;
use crate::output::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-tailor")]
#[command(version)]
#[command(about = "ATS keyword scoring and LLM-assisted resume tailoring")]
#[command(long_about = "Extract ATS keywords from job descriptions, score resumes against them, and tailor resumes or write cover letters with a local Ollama model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the top ATS keywords of a job description
    Keywords {
        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// Number of keywords to show (defaults to ats.display_keywords)
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Score a resume against a job description
    Score {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show matched and missing keywords
        #[arg(short, long)]
        detailed: bool,
    },

    /// Rewrite a resume for a job description
    Tailor {
        #[arg(short, long)]
        resume: PathBuf,

        #[arg(short, long)]
        job: PathBuf,

        /// Save the tailored resume as text (file or directory)
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Export the tailored resume as PDF
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Export the tailored resume as DOCX
        #[arg(long)]
        docx: Option<PathBuf>,
    },

    /// Apply a free-form edit instruction to a resume
    Edit {
        #[arg(short, long)]
        resume: PathBuf,

        /// What to change, e.g. "shorten the summary to two lines"
        #[arg(short, long)]
        instruction: String,

        /// Job description to re-score the edited resume against
        #[arg(short, long)]
        job: Option<PathBuf>,

        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Write a cover letter for a job description
    CoverLetter {
        #[arg(short, long)]
        resume: PathBuf,

        #[arg(short, long)]
        job: PathBuf,

        #[arg(short, long)]
        save: Option<PathBuf>,

        #[arg(long)]
        pdf: Option<PathBuf>,

        #[arg(long)]
        docx: Option<PathBuf>,
    },

    /// Export a text document as PDF, DOCX or plain text
    Export {
        /// Text or Markdown file to export
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Export format: pdf, docx, text (defaults to the output extension)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}

pub fn parse_export_format(format: &str) -> Result<ExportFormat, String> {
    match format.to_lowercase().as_str() {
        "pdf" => Ok(ExportFormat::Pdf),
        "docx" | "word" => Ok(ExportFormat::Docx),
        "text" | "txt" => Ok(ExportFormat::Text),
        _ => Err(format!("Invalid export format: {}. Supported: pdf, docx, text", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_score_command() {
        let cli = Cli::parse_from([
            "resume-tailor", "score", "--resume", "cv.pdf", "--job", "job.txt", "--output", "json", "--detailed",
        ]);

        match cli.command {
            Commands::Score { resume, output, detailed, .. } => {
                assert_eq!(resume, PathBuf::from("cv.pdf"));
                assert_eq!(output.as_deref(), Some("json"));
                assert!(detailed);
            }
            _ => panic!("expected score command"),
        }
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(parse_output_format("MD"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("pdf").is_err());
        assert_eq!(parse_export_format("txt"), Ok(ExportFormat::Text));
        assert_eq!(parse_export_format("DOCX"), Ok(ExportFormat::Docx));
        assert!(parse_export_format("odt").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("resume.PDF"), &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(Path::new("resume.docx"), &["pdf", "txt"]).is_err());
        assert!(validate_file_extension(Path::new("resume"), &["pdf"]).is_err());
    }
}
