//! Ollama integration for episode copy
//!
//! Calls the Ollama REST API to draft bilingual YouTube descriptions.

use crate::config::OllamaConfig;
use crate::error::AppError;
use crate::store::models::EpisodeDetails;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DESCRIPTION_SYSTEM: &str = "You are the head of communications for GN AI Authority, a civic reform organization. Write clear, warm, publication-ready copy.";

/// Ollama client for making API calls
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &OllamaConfig) -> Self {
        Self::new(
            &config.base_url,
            &config.model,
            Duration::from_secs(config.timeout_secs.max(1)),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check if Ollama is running and the model is available
    pub async fn health_check(&self) -> Result<OllamaStatus, AppError> {
        let tags_url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&tags_url)
            .send()
            .await
            .map_err(|e| AppError::Http(format!("Ollama not running: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Http("Ollama server returned error".to_string()));
        }

        let tags: TagsResponse = response.json().await?;

        let family = self.model.split(':').next().unwrap_or(&self.model);
        let model_available = tags.models.iter().any(|m| m.name.starts_with(family));

        Ok(OllamaStatus {
            running: true,
            model: self.model.clone(),
            model_available,
            available_models: tags.models.iter().map(|m| m.name.clone()).collect(),
        })
    }

    /// Generate a completion from Ollama
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AppError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            system: system.map(|s| s.to_string()),
            stream: false,
            options: Some(GenerateOptions {
                temperature: 0.7,
                num_predict: 1024,
            }),
        };

        log::info!(
            "Sending request to Ollama: model={}, prompt_len={}",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Http(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Http(format!("Ollama returned {}: {}", status, body)));
        }

        let result: GenerateResponse = response.json().await?;

        log::info!(
            "Ollama response received: {} chars, eval_duration={:?}ms",
            result.response.len(),
            result.eval_duration.map(|d| d / 1_000_000)
        );

        let text = result.response.trim();
        if text.is_empty() {
            return Err(AppError::Service("Ollama returned an empty response".to_string()));
        }
        Ok(text.to_string())
    }

    pub async fn describe_episode(&self, details: &EpisodeDetails) -> Result<String, AppError> {
        self.generate(&description_prompt(details), Some(DESCRIPTION_SYSTEM)).await
    }
}

/// Prompt for a bilingual description: English paragraph, Bangla
/// translation, diaspora call to action, then hashtag legacy tags.
pub fn description_prompt(details: &EpisodeDetails) -> String {
    format!(
        "Your task is to write a YouTube video description for an upcoming episode.\n\
         The description must be bilingual (English and Bangla), contain \"encrypted\" legacy tags, \
         and have a call to action for the diaspora.\n\
         Follow this structure:\n\
         1. Start with a compelling English paragraph about the episode's theme.\n\
         2. Follow with a Bangla translation of that paragraph.\n\
         3. Include a call to action for diaspora engagement.\n\
         4. End with a list of \"legacy tags\" in hashtag format.\n\n\
         Episode Details:\n\
         - Episode Number: {}\n\
         - Title: {}\n\
         - Theme: {}\n\
         - Language Focus: {}\n\
         - Relevant Tags to include: {}\n\n\
         Generate the description now.",
        details.ep_number,
        details.title,
        details.theme,
        details.lang,
        details.tags.join(", ")
    )
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: i32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    eval_duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

// ============================================================================
// Public Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaStatus {
    pub running: bool,
    pub model: String,
    pub model_available: bool,
    pub available_models: Vec<String>,
}
