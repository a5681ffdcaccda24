//! Output formatters for ATS reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::export::ExportFormat;
use crate::output::report::ATSReport;
use askama::Template;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for formatting ATS reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ATSReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>ATS Keyword Report</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; color: #333; }
        .score { font-size: 2em; font-weight: bold; color: #4a07f2; }
        .matched { color: #28a745; }
        .missing { color: #dc3545; }
        table { border-collapse: collapse; width: 100%; }
        td, th { border-bottom: 1px solid #e9ecef; padding: 6px; text-align: left; }
        .metadata { font-size: 0.9em; color: #6c757d; margin-top: 30px; }
    </style>
    {% endif %}
</head>
<body>
    <h1>ATS Keyword Report</h1>
    <p class="score">{{ score }}/100</p>
    <p><strong>Verdict:</strong> {{ verdict }}</p>
    <p>{{ matched_count }} of {{ keyword_count }} job keywords found in the resume.</p>

    {% if !suggested.is_empty() %}
    <h2>Suggested Keywords</h2>
    <table>
        <tr><th>Keyword</th><th>Mentions</th><th>In resume</th></tr>
        {% for keyword in suggested %}
        <tr>
            <td>{{ keyword.phrase }}</td>
            <td>{{ keyword.frequency }}</td>
            {% if keyword.matched %}<td class="matched">yes</td>{% else %}<td class="missing">no</td>{% endif %}
        </tr>
        {% endfor %}
    </table>
    {% endif %}

    {% if !missing.is_empty() %}
    <h2>Missing Keywords</h2>
    <ul>
        {% for phrase in missing %}<li class="missing">{{ phrase }}</li>{% endfor %}
    </ul>
    {% endif %}

    <div class="metadata">
        <p>Generated {{ generated_at }} by resume-tailor v{{ version }}</p>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    score: u8,
    verdict: String,
    matched_count: usize,
    keyword_count: usize,
    suggested: Vec<HtmlKeyword>,
    missing: Vec<String>,
    generated_at: String,
    version: String,
}

struct HtmlKeyword {
    phrase: String,
    frequency: usize,
    matched: bool,
}

fn format_timestamp(report: &ATSReport) -> String {
    report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "▓".color(Color::Blue).bold(), title.color(Color::Blue).bold())
        } else {
            format!("\n▓ {}\n", title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            80..=100 => ("STRONG", Color::Green),
            60..=79 => ("GOOD", Color::BrightGreen),
            40..=59 => ("PARTIAL", Color::Yellow),
            _ => ("WEAK", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ATSReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 ATS KEYWORD REPORT"));
        output.push_str(&format!(
            "ATS Score: {}/100 {}\n",
            report.score(),
            self.format_score_badge(report.score())
        ));
        output.push_str(&format!("Verdict: {}\n", self.colorize(&report.verdict, Color::Cyan)));
        output.push_str(&format!(
            "Keywords matched: {}/{}\n",
            report.ats.matched_count(),
            report.ats.keyword_count()
        ));

        if !report.suggested_keywords.is_empty() {
            output.push_str(&self.format_header("💡 Suggested Keywords for ATS"));
            for (i, keyword) in report.suggested_keywords.iter().enumerate() {
                let (marker, color) = if keyword.matched {
                    ("✓", Color::Green)
                } else {
                    ("✗", Color::Red)
                };
                output.push_str(&format!(
                    "  {}. {} {}\n",
                    i + 1,
                    self.colorize(marker, color),
                    keyword.phrase
                ));
            }
        }

        if self.detailed {
            if !report.ats.matched_keywords.is_empty() {
                output.push_str(&self.format_header("✅ Matched Keywords"));
                for phrase in &report.ats.matched_keywords {
                    output.push_str(&format!("  • {}\n", self.colorize(phrase, Color::Green)));
                }
            }

            if !report.ats.missing_keywords.is_empty() {
                output.push_str(&self.format_header("⚠️  Missing Keywords"));
                for phrase in &report.ats.missing_keywords {
                    output.push_str(&format!("  • {}\n", self.colorize(phrase, Color::Yellow)));
                }
            }
        }

        output.push_str(&format!(
            "\n{} Generated {} by resume-tailor v{}\n",
            self.colorize("ℹ️", Color::Blue),
            format_timestamp(report),
            report.metadata.tool_version
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ATSReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ATSReport) -> Result<String> {
        let mut content = String::new();

        content.push_str("# ATS Keyword Report\n\n");
        content.push_str(&format!("**ATS Score:** {}/100\n\n", report.score()));
        content.push_str(&format!("**Verdict:** {}\n\n", report.verdict));
        content.push_str(&format!(
            "{} of {} job keywords found in the resume.\n\n",
            report.ats.matched_count(),
            report.ats.keyword_count()
        ));

        if !report.suggested_keywords.is_empty() {
            content.push_str("## Suggested Keywords\n\n");
            content.push_str("| # | Keyword | Mentions | In resume |\n");
            content.push_str("|---|---------|----------|-----------|\n");
            for (i, keyword) in report.suggested_keywords.iter().enumerate() {
                content.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    i + 1,
                    keyword.phrase,
                    keyword.frequency,
                    if keyword.matched { "yes" } else { "no" }
                ));
            }
            content.push('\n');
        }

        if !report.ats.missing_keywords.is_empty() {
            content.push_str("## Missing Keywords\n\n");
            for phrase in &report.ats.missing_keywords {
                content.push_str(&format!("- {}\n", phrase));
            }
            content.push('\n');
        }

        if self.include_metadata {
            content.push_str("---\n\n");
            content.push_str(&format!(
                "*Generated {} by resume-tailor v{}*\n",
                format_timestamp(report),
                report.metadata.tool_version
            ));
            if let Some(resume) = &report.metadata.resume_source {
                content.push_str(&format!("\n*Resume: {}*\n", resume));
            }
            if let Some(job) = &report.metadata.job_source {
                content.push_str(&format!("\n*Job description: {}*\n", job));
            }
        }

        Ok(content)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &ATSReport) -> HtmlTemplate {
        HtmlTemplate {
            include_styles: self.include_styles,
            score: report.score(),
            verdict: report.verdict.clone(),
            matched_count: report.ats.matched_count(),
            keyword_count: report.ats.keyword_count(),
            suggested: report
                .suggested_keywords
                .iter()
                .map(|k| HtmlKeyword {
                    phrase: k.phrase.clone(),
                    frequency: k.frequency,
                    matched: k.matched,
                })
                .collect(),
            missing: report.ats.missing_keywords.clone(),
            generated_at: format_timestamp(report),
            version: report.metadata.tool_version.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &ATSReport) -> Result<String> {
        Ok(self.create_template_data(report).render()?)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &ATSReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// What a suggested file will hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Report(OutputFormat),
    TailoredResume(ExportFormat),
    EditedResume(ExportFormat),
    CoverLetter(ExportFormat),
}

pub fn suggest_filename(kind: FileKind, source_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(source_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match kind {
        FileKind::Report(OutputFormat::Console) => format!("{}_ats{}.txt", base_name, timestamp_suffix),
        FileKind::Report(OutputFormat::Json) => format!("{}_ats{}.json", base_name, timestamp_suffix),
        FileKind::Report(OutputFormat::Markdown) => format!("{}_ats{}.md", base_name, timestamp_suffix),
        FileKind::Report(OutputFormat::Html) => format!("{}_ats{}.html", base_name, timestamp_suffix),
        FileKind::TailoredResume(format) => {
            format!("{}_tailored{}.{}", base_name, timestamp_suffix, format.extension())
        }
        FileKind::EditedResume(format) => {
            format!("{}_edited{}.{}", base_name, timestamp_suffix, format.extension())
        }
        FileKind::CoverLetter(format) => {
            format!("{}_cover_letter{}.{}", base_name, timestamp_suffix, format.extension())
        }
    }
}

/// Output target for `--save` style options. An existing directory gets a
/// generated, timestamped file name derived from the source document.
pub fn resolve_output_path(path: PathBuf, kind: FileKind, source: &Path) -> PathBuf {
    if !path.is_dir() {
        return path;
    }

    let source_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    path.join(suggest_filename(kind, &source_name, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{ATSScorer, KeywordExtractor};

    fn sample_report() -> ATSReport {
        ATSReport::build(
            "Experienced in Python and SQL development",
            "Python, SQL, Communication skills <team>",
            &ATSScorer::new(),
            &KeywordExtractor::new(),
            15,
        )
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, true).format_report(&sample_report()).unwrap();

        assert!(output.contains("ATS Score: 67/100 [GOOD]"));
        assert!(output.contains("1. ✓ python"));
        assert!(output.contains("3. ✗ communication skills team"));
        assert!(output.contains("Missing Keywords"));
    }

    #[test]
    fn test_console_marks_unscored_display_keywords() {
        let report = ATSReport::build(
            "nothing relevant",
            "rust, python",
            &ATSScorer::with_extractor(KeywordExtractor::new(), 1),
            &KeywordExtractor::new(),
            15,
        );
        let output = ConsoleFormatter::new(false, false).format_report(&report).unwrap();

        assert!(output.contains("1. ✗ rust"));
        assert!(output.contains("2. ✗ python"));
    }

    #[test]
    fn test_json_round_trip() {
        let output = JsonFormatter::new(false).format_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["ats"]["score"], 67);
        assert_eq!(value["suggested_keywords"][0]["phrase"], "python");
        assert_eq!(value["suggested_keywords"][0]["matched"], true);
    }

    #[test]
    fn test_markdown_table() {
        let output = MarkdownFormatter::new(false).format_report(&sample_report()).unwrap();

        assert!(output.contains("**ATS Score:** 67/100"));
        assert!(output.contains("| 1 | python | 1 | yes |"));
        assert!(output.contains("- communication skills team"));
        assert!(!output.contains("Generated"));
    }

    #[test]
    fn test_html_render() {
        let output = HtmlFormatter::new(false).format_report(&sample_report()).unwrap();

        assert!(output.contains("67/100"));
        assert!(output.contains("<li class=\"missing\">communication skills team</li>"));
        assert!(!output.contains("<style>"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(
            suggest_filename(FileKind::Report(OutputFormat::Json), "docs/jane.pdf", false),
            "jane_ats.json"
        );
        assert_eq!(
            suggest_filename(FileKind::CoverLetter(ExportFormat::Pdf), "jane.txt", false),
            "jane_cover_letter.pdf"
        );
        assert_eq!(
            suggest_filename(FileKind::EditedResume(ExportFormat::Text), "jane.docx", false),
            "jane_edited.txt"
        );
        assert_eq!(
            suggest_filename(FileKind::TailoredResume(ExportFormat::Docx), "cv/jane.md", false),
            "jane_tailored.docx"
        );
    }

    #[test]
    fn test_resolve_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let source = Path::new("resumes/jane.pdf");

        let generated = resolve_output_path(
            dir.path().to_path_buf(),
            FileKind::TailoredResume(ExportFormat::Text),
            source,
        );
        assert_eq!(generated.parent(), Some(dir.path()));
        let name = generated.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("jane_tailored_"));
        assert!(name.ends_with(".txt"));

        let explicit = dir.path().join("letter.txt");
        assert_eq!(
            resolve_output_path(explicit.clone(), FileKind::CoverLetter(ExportFormat::Text), source),
            explicit
        );
    }
}
