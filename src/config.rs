//! Configuration management for the resume tailor

use crate::error::{Result, ResumeTailorError};
use crate::processing::stop_words::build_stop_words;
use crate::processing::{ATSScorer, KeywordExtractor, DISPLAY_TOP_N, SCORING_TOP_N};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Missing sections and keys fall back to their defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ats: AtsConfig,
    pub generator: GeneratorConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtsConfig {
    /// Keywords suggested to the user
    pub display_keywords: usize,
    /// Keywords the score is computed over
    pub scoring_keywords: usize,
    pub use_default_stop_words: bool,
    pub extra_stop_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub parse_temperature: f32,
    pub tailor_temperature: f32,
    pub edit_temperature: f32,
    pub cover_letter_temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for AtsConfig {
    fn default() -> Self {
        Self {
            display_keywords: DISPLAY_TOP_N,
            scoring_keywords: SCORING_TOP_N,
            use_default_stop_words: true,
            extra_stop_words: Vec::new(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "gemma3:4b".to_string(),
            timeout_secs: 120,
            max_retries: 3,
            parse_temperature: 0.1,
            tailor_temperature: 0.5,
            edit_temperature: 0.3,
            cover_letter_temperature: 0.3,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load an explicit config file; it must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            ResumeTailorError::Configuration(format!("Failed to parse config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeTailorError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-tailor")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.ats.display_keywords == 0 || self.ats.scoring_keywords == 0 {
            return Err(ResumeTailorError::Configuration(
                "ats.display_keywords and ats.scoring_keywords must be greater than zero".to_string(),
            ));
        }

        let temperatures = [
            ("parse_temperature", self.generator.parse_temperature),
            ("tailor_temperature", self.generator.tailor_temperature),
            ("edit_temperature", self.generator.edit_temperature),
            ("cover_letter_temperature", self.generator.cover_letter_temperature),
        ];
        for (name, value) in temperatures {
            if !(0.0..=2.0).contains(&value) {
                return Err(ResumeTailorError::Configuration(format!(
                    "generator.{} must be between 0.0 and 2.0, got {}",
                    name, value
                )));
            }
        }

        if self.generator.base_url.trim().is_empty() {
            return Err(ResumeTailorError::Configuration(
                "generator.base_url must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Keyword extractor built from the configured stop words
    pub fn keyword_extractor(&self) -> KeywordExtractor {
        KeywordExtractor::with_stop_words(build_stop_words(
            self.ats.use_default_stop_words,
            &self.ats.extra_stop_words,
        ))
    }

    pub fn ats_scorer(&self) -> ATSScorer {
        ATSScorer::with_extractor(self.keyword_extractor(), self.ats.scoring_keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ats.display_keywords, 15);
        assert_eq!(config.ats.scoring_keywords, 50);
        assert_eq!(config.ats_scorer().scoring_top_n(), 50);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.generator.model = "llama3".to_string();
        config.ats.extra_stop_words = vec!["Skills".to_string()];
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.keyword_extractor().stop_words().contains("skills"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[generator]\nmodel = \"llama3\"\n\n[ats]\nextra_stop_words = [\"remote\"]\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.generator.model, "llama3");
        assert_eq!(loaded.generator.base_url, "http://localhost:11434");
        assert_eq!(loaded.generator.tailor_temperature, 0.5);
        assert_eq!(loaded.ats.scoring_keywords, 50);
        assert_eq!(loaded.ats.extra_stop_words, vec!["remote"]);
        assert_eq!(loaded.output, OutputConfig::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.ats.scoring_keywords = 0;
        assert!(matches!(config.validate(), Err(ResumeTailorError::Configuration(_))));

        let mut config = Config::default();
        config.generator.tailor_temperature = 3.5;
        assert!(matches!(config.validate(), Err(ResumeTailorError::Configuration(_))));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "ats = 3").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ResumeTailorError::Configuration(_))));
    }
}
