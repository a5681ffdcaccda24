//! Language model collaborators: generation backends, prompts and the resume assistant

pub mod assistant;
pub mod cleanup;
pub mod generator;
pub mod prompts;

pub use assistant::{ParsedResume, ResumeAssistant, Temperatures};
pub use generator::{OllamaGenerator, TextGenerator};
