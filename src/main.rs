//! resume-tailor: ATS keyword scoring and LLM-assisted resume tailoring

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info};
use resume_tailor::cli::{self, Cli, Commands, ConfigAction};
use resume_tailor::input::InputManager;
use resume_tailor::llm::cleanup::truncate_text;
use resume_tailor::llm::{OllamaGenerator, ResumeAssistant, Temperatures, TextGenerator};
use resume_tailor::output::{
    resolve_output_path, save_report_to_file, ATSReport, DocumentExporter, ExportFormat, FileKind,
    ReportGenerator,
};
use resume_tailor::{Config, Result, ResumeTailorError};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

const RESUME_EXTENSIONS: [&str; 5] = ["pdf", "txt", "md", "markdown", "docx"];
const JOB_EXTENSIONS: [&str; 5] = ["txt", "md", "markdown", "pdf", "docx"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            Config::load_from(path)
        }
        None => Config::load(),
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Keywords { job, top } => {
            check_extension(&job, &JOB_EXTENSIONS, "Job description")?;
            let top_n = top.unwrap_or(config.ats.display_keywords);

            let mut input_manager = InputManager::new();
            let job_text = input_manager.extract_text(&job).await?;

            let extractor = config.keyword_extractor();
            let keywords = extractor.rank_phrases(&job_text);

            if keywords.is_empty() {
                println!("⚠️  No keywords found in {}", job.display());
                return Ok(());
            }

            println!("💡 Top ATS keywords in {}:\n", job.display());
            for (i, keyword) in keywords.iter().take(top_n).enumerate() {
                println!("  {}. {} ({}x)", i + 1, keyword.phrase, keyword.frequency);
            }
        }

        Commands::Score {
            resume,
            job,
            output,
            save,
            detailed,
        } => {
            check_extension(&resume, &RESUME_EXTENSIONS, "Resume")?;
            check_extension(&job, &JOB_EXTENSIONS, "Job description")?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeTailorError::InvalidInput)?,
                None => config.output.format,
            };
            let detailed = detailed || config.output.detailed;

            println!("📊 Scoring resume against job description");
            println!("📄 Resume: {}", resume.display());
            println!("💼 Job Description: {}", job.display());

            let mut input_manager = InputManager::new();
            let resume_text = input_manager.extract_text(&resume).await?;
            let job_text = input_manager.extract_text(&job).await?;

            if detailed {
                println!("\n📄 Resume Content Preview:");
                println!("{}", truncate_text(&resume_text, 300));
            }

            let report = build_report(&config, &resume_text, &job_text)
                .with_sources(Some(display_name(&resume)), Some(display_name(&job)));
            info!("ATS score: {}/100", report.score());

            let use_colors = config.output.color_output && save.is_none();
            let generator = ReportGenerator::with_options(use_colors, detailed);
            let content = generator.generate_report(&report, &output_format)?;

            match save {
                Some(path) => {
                    let path = resolve_output_path(path, FileKind::Report(output_format), &resume);
                    save_report_to_file(&content, &path)?;
                    println!("\n✅ Report saved to {}", path.display());
                }
                None => println!("{}", content),
            }
        }

        Commands::Tailor {
            resume,
            job,
            save,
            pdf,
            docx,
        } => {
            check_extension(&resume, &RESUME_EXTENSIONS, "Resume")?;
            check_extension(&job, &JOB_EXTENSIONS, "Job description")?;

            let mut input_manager = InputManager::new();
            let resume_text = input_manager.extract_text(&resume).await?;
            let job_text = input_manager.extract_text(&job).await?;

            let before = build_report(&config, &resume_text, &job_text);
            println!("📊 Current ATS score: {}/100", before.score());

            let assistant = build_assistant(&config)?;
            let parsed = with_spinner("🧠 Parsing resume", assistant.parse_resume(&resume_text)).await?;
            if parsed.is_fallback() {
                println!("⚠️  Could not parse the resume into sections; tailoring from raw text");
            }

            let tailored = with_spinner(
                "✍️  Tailoring resume",
                assistant.tailor_resume(&parsed, &job_text),
            )
            .await?;

            println!("\n📄 Tailored Resume:\n");
            println!("{}", tailored);

            let after = build_report(&config, &tailored, &job_text);
            print_score_change(&before, &after);
            print_keywords_to_add(&after);

            write_outputs(&tailored, &resume, FileKind::TailoredResume, [save, pdf, docx])?;
        }

        Commands::Edit {
            resume,
            instruction,
            job,
            save,
        } => {
            check_extension(&resume, &RESUME_EXTENSIONS, "Resume")?;

            let mut input_manager = InputManager::new();
            let resume_text = input_manager.extract_text(&resume).await?;

            let assistant = build_assistant(&config)?;
            let edited = with_spinner("✍️  Applying edit", assistant.chat_edit(&resume_text, &instruction)).await?;

            println!("\n📄 Edited Resume:\n");
            println!("{}", edited);

            if let Some(job) = job {
                check_extension(&job, &JOB_EXTENSIONS, "Job description")?;
                let job_text = input_manager.extract_text(&job).await?;
                let before = build_report(&config, &resume_text, &job_text);
                let after = build_report(&config, &edited, &job_text);
                print_score_change(&before, &after);
                print_keywords_to_add(&after);
            }

            write_outputs(&edited, &resume, FileKind::EditedResume, [save, None, None])?;
        }

        Commands::CoverLetter {
            resume,
            job,
            save,
            pdf,
            docx,
        } => {
            check_extension(&resume, &RESUME_EXTENSIONS, "Resume")?;
            check_extension(&job, &JOB_EXTENSIONS, "Job description")?;

            let mut input_manager = InputManager::new();
            let resume_text = input_manager.extract_text(&resume).await?;
            let job_text = input_manager.extract_text(&job).await?;

            let assistant = build_assistant(&config)?;
            let letter = with_spinner(
                "✉️  Writing cover letter",
                assistant.cover_letter(&resume_text, &job_text),
            )
            .await?;

            println!("\n✉️  Cover Letter:\n");
            println!("{}", letter);

            write_outputs(&letter, &resume, FileKind::CoverLetter, [save, pdf, docx])?;
        }

        Commands::Export { input, output, format } => {
            let format = match format {
                Some(format) => cli::parse_export_format(&format).map_err(ResumeTailorError::InvalidInput)?,
                None => ExportFormat::from_path(&output),
            };

            let mut input_manager = InputManager::new();
            let text = input_manager.extract_text(&input).await?;

            DocumentExporter::new()?.export(&text, &output, format)?;
            println!("✅ Exported {} to {}", input.display(), output.display());
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("ATS:");
                println!("  Suggested keywords: {}", config.ats.display_keywords);
                println!("  Scoring keywords: {}", config.ats.scoring_keywords);
                println!("  Default stop words: {}", config.ats.use_default_stop_words);
                if !config.ats.extra_stop_words.is_empty() {
                    println!("  Extra stop words: {}", config.ats.extra_stop_words.join(", "));
                }
                println!("\nGenerator:");
                println!("  Endpoint: {}", config.generator.base_url);
                println!("  Model: {}", config.generator.model);
                println!("  Timeout: {}s (max {} attempts)", config.generator.timeout_secs, config.generator.max_retries);
                println!(
                    "  Temperatures: parse {:.1}, tailor {:.1}, edit {:.1}, cover letter {:.1}",
                    config.generator.parse_temperature,
                    config.generator.tailor_temperature,
                    config.generator.edit_temperature,
                    config.generator.cover_letter_temperature
                );
                println!("\nOutput:");
                println!("  Format: {:?}", config.output.format);
                println!("  Detailed: {}", config.output.detailed);
                println!("  Colors: {}", config.output.color_output);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save()?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }
        },
    }

    Ok(())
}

fn check_extension(path: &Path, allowed: &[&str], what: &str) -> Result<()> {
    cli::validate_file_extension(path, allowed)
        .map_err(|e| ResumeTailorError::InvalidInput(format!("{} file: {}", what, e)))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn build_report(config: &Config, resume_text: &str, job_text: &str) -> ATSReport {
    ATSReport::build(
        resume_text,
        job_text,
        &config.ats_scorer(),
        &config.keyword_extractor(),
        config.ats.display_keywords,
    )
}

fn build_assistant(config: &Config) -> Result<ResumeAssistant<OllamaGenerator>> {
    let generator = OllamaGenerator::from_config(&config.generator)?;
    println!("🤖 Model: {} ({})", generator.model_name(), config.generator.base_url);
    Ok(ResumeAssistant::new(generator, Temperatures::from(&config.generator)))
}

async fn with_spinner<T>(message: &'static str, task: impl Future<Output = Result<T>>) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{msg} {spinner:.green} {elapsed}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = task.await;
    spinner.finish_and_clear();
    result
}

fn print_score_change(before: &ATSReport, after: &ATSReport) {
    let delta = after.score() as i16 - before.score() as i16;
    println!("\n📊 ATS score: {} → {} ({:+})", before.score(), after.score(), delta);
}

fn print_keywords_to_add(report: &ATSReport) {
    let missing = report.keywords_to_add();
    if !missing.is_empty() {
        println!("\n💡 Keywords still missing:");
        for keyword in missing {
            println!("  • {}", keyword);
        }
    }
}

/// Write `text` to the `[text, pdf, docx]` targets that were requested
fn write_outputs(
    text: &str,
    source: &Path,
    kind: fn(ExportFormat) -> FileKind,
    targets: [Option<PathBuf>; 3],
) -> Result<()> {
    let exporter = DocumentExporter::new()?;
    let formats = [ExportFormat::Text, ExportFormat::Pdf, ExportFormat::Docx];

    for (target, format) in targets.into_iter().zip(formats) {
        if let Some(path) = target {
            let path = resolve_output_path(path, kind(format), source);
            exporter.export(text, &path, format)?;
            println!("✅ Saved {} to {}", format.extension().to_uppercase(), path.display());
        }
    }

    Ok(())
}
