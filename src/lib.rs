//! Resume tailor library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod llm;
pub mod output;

pub use error::{Result, ResumeTailorError};
pub use config::Config;
pub use processing::{extract_keywords, score_resume};
