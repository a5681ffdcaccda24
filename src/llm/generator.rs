//! Text generation backends
//!
//! Everything that talks to a language model goes through [`TextGenerator`],
//! so callers receive the backend explicitly instead of building one.

use crate::config::GeneratorConfig;
use crate::error::{Result, ResumeTailorError};
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

pub trait TextGenerator {
    /// Produce free text for a prompt. Output is not deterministic.
    fn generate(&self, prompt: &str, temperature: f32) -> impl Future<Output = Result<String>> + Send;

    /// Name shown in logs and reports
    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OllamaErrorBody {
    error: String,
}

/// Client for a local Ollama server (`/api/generate`, non-streaming)
#[derive(Clone)]
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
    max_retries: u32,
}

impl OllamaGenerator {
    pub fn new(base_url: &str, model: &str, timeout: Duration, max_retries: u32) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            max_retries: max_retries.max(1),
        })
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            &config.model,
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

impl TextGenerator for OllamaGenerator {
    /// Retries connection failures, 429 and 5xx with exponential backoff.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions { temperature },
        };

        let mut last_error: Option<ResumeTailorError> = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                // 500ms, 1s, 2s, ...
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "Generation attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(self.endpoint()).json(&request).send().await {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(ResumeTailorError::Generation(format!(
                        "Request to {} failed: {}",
                        self.base_url, e
                    )));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Model server returned {}: {}", status, body);
                last_error = Some(ResumeTailorError::Generation(format!(
                    "Model server returned {}: {}",
                    status, body
                )));
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<OllamaErrorBody>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(ResumeTailorError::Generation(format!(
                    "Model server returned {}: {}",
                    status, message
                )));
            }

            let body: GenerateResponse = response.json().await.map_err(|e| {
                ResumeTailorError::Generation(format!("Malformed model response: {}", e))
            })?;

            debug!(
                "Generation succeeded: model={}, output_tokens={:?}",
                self.model, body.eval_count
            );
            return Ok(body.response);
        }

        Err(last_error.unwrap_or_else(|| {
            ResumeTailorError::Generation(format!("No response after {} attempts", self.max_retries))
        }))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
