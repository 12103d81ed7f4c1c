//! Gemini API completion adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{CompletionClient, CompletionError};
use crate::domain::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::domain::duration::Duration;
use crate::domain::prompt::CoachPrompt;

/// Sampling temperature for coaching replies
const TEMPERATURE: f32 = 0.7;

/// Upper bound on reply length
const MAX_OUTPUT_TOKENS: u32 = 1024;

/// Longest upstream error body kept in an error message
const MAX_ERROR_BODY_CHARS: usize = 300;

// Request types for Gemini API

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

// Response types for Gemini API

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Outcome of one model attempt
enum Attempt {
    Done(String),
    ModelNotFound(String),
}

/// Gemini API completion client.
///
/// Tries the primary model, then each fallback model, moving on only when
/// the model itself is unavailable (HTTP 404). Every other failure is
/// returned immediately.
pub struct GeminiClient {
    api_key: String,
    model: String,
    fallback_models: Vec<String>,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            fallback_models: Vec::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::default_timeout(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_fallback_models(mut self, models: Vec<String>) -> Self {
        self.fallback_models = models;
        self
    }

    /// Override the API base URL (used by tests against a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bounded wait for each request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Primary model followed by distinct fallbacks
    fn models(&self) -> Vec<&str> {
        let mut models = vec![self.model.as_str()];
        for model in &self.fallback_models {
            if !models.contains(&model.as_str()) {
                models.push(model);
            }
        }
        models
    }

    /// Build the API URL for `model`
    fn api_url(&self, model: &str) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    /// Build the request body
    fn build_request(prompt: &CoachPrompt) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![TextPart {
                    text: prompt.content().to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            }),
        }
    }

    /// Extract text from response
    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let parts: Vec<&str> = response
            .candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(""))
        }
    }

    /// Whether the service withheld the reply on safety grounds
    fn is_blocked(response: &GenerateContentResponse) -> bool {
        let prompt_blocked = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
            .is_some();

        let candidate_blocked = response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.finish_reason.as_deref())
            .is_some_and(|reason| reason == "SAFETY");

        prompt_blocked || candidate_blocked
    }

    fn map_send_error(&self, e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            CompletionError::Timeout {
                after: self.timeout,
            }
        } else {
            // Drop the URL: it carries the API key
            CompletionError::upstream(e.without_url().to_string())
        }
    }

    async fn attempt(&self, model: &str, prompt: &CoachPrompt) -> Result<Attempt, CompletionError> {
        let body = Self::build_request(prompt);

        let response = self
            .client
            .post(self.api_url(model))
            .timeout(self.timeout.as_std())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(CompletionError::Auth);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if status == reqwest::StatusCode::NOT_FOUND {
                return Ok(Attempt::ModelNotFound(error_text));
            }

            if status == reqwest::StatusCode::BAD_REQUEST
                && (error_text.contains("API_KEY_INVALID") || error_text.contains("API key not valid"))
            {
                return Err(CompletionError::Auth);
            }

            let snippet: String = error_text.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(CompletionError::upstream(format!("HTTP {}: {}", status, snippet)));
        }

        // Parse response
        let response: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CompletionError::Timeout {
                    after: self.timeout,
                }
            } else {
                CompletionError::upstream(format!("malformed response: {}", e.without_url()))
            }
        })?;

        // Check for API error in response body
        if let Some(error) = &response.error {
            return Err(CompletionError::upstream(error.message.clone()));
        }

        match Self::extract_text(&response) {
            Some(text) => Ok(Attempt::Done(text.trim().to_string())),
            None if Self::is_blocked(&response) => {
                tracing::warn!(model, "completion withheld by upstream safety filter");
                Ok(Attempt::Done(String::new()))
            }
            None => Err(CompletionError::upstream("response contained no text")),
        }
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &CoachPrompt) -> Result<String, CompletionError> {
        if self.api_key.trim().is_empty() {
            return Err(CompletionError::Auth);
        }

        let mut last_not_found = String::new();

        for model in self.models() {
            match self.attempt(model, prompt).await? {
                Attempt::Done(text) => {
                    tracing::debug!(model, chars = text.chars().count(), "completion received");
                    return Ok(text);
                }
                Attempt::ModelNotFound(body) => {
                    tracing::warn!(model, "model not available, trying next fallback");
                    last_not_found = body;
                }
            }
        }

        let snippet: String = last_not_found.chars().take(MAX_ERROR_BODY_CHARS).collect();
        Err(CompletionError::upstream(format!(
            "no configured model is available: {}",
            snippet
        )))
    }
}
