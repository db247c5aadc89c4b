//! Text generation collaborator
//!
//! The console only needs "text in, text out". [`TextGenerator`] is that
//! seam; [`GeminiClient`] implements it over the `generateContent` REST
//! endpoint, and [`Assistant`] adds the input checks and field-filling rules
//! shared by every caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::types::Lead;

/// Kind of generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    /// Polish existing copy
    Rewrite,
    /// Summary plus follow-up actions for a lead
    SummarizeLead,
    /// Short marketing blurb for a service name
    ServiceDescription,
}

impl PromptKind {
    pub const ALL: [PromptKind; 3] = [
        PromptKind::Rewrite,
        PromptKind::SummarizeLead,
        PromptKind::ServiceDescription,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PromptKind::Rewrite => "rewrite",
            PromptKind::SummarizeLead => "summarize_lead",
            PromptKind::ServiceDescription => "service_description",
        }
    }

    /// User prompt wrapping `input`
    #[must_use]
    pub fn render(self, input: &str) -> String {
        match self {
            PromptKind::Rewrite => {
                format!("Rewrite the following text to be more professional and engaging:\n\n{input}")
            }
            PromptKind::SummarizeLead => {
                format!("Summarize this lead and provide 3 key follow-up action points:\n\n{input}")
            }
            PromptKind::ServiceDescription => {
                format!("Generate a compelling, 2-sentence marketing description for a service called: {input}")
            }
        }
    }

    /// System instruction sent with the prompt
    #[must_use]
    pub const fn instruction(self) -> &'static str {
        match self {
            PromptKind::Rewrite => {
                "You are a professional copywriter. Your goal is to improve the tone and clarity of internal admin dashboard content."
            }
            PromptKind::SummarizeLead => "You are a sales assistant helping an admin manage business leads.",
            PromptKind::ServiceDescription => {
                "You are a creative marketer focused on high-conversion service descriptions."
            }
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form text generation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce text for `input`; the result is never parsed
    async fn generate(&self, kind: PromptKind, input: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

impl<'a> GenerateRequest<'a> {
    fn new(kind: PromptKind, prompt: &'a str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: [Part {
                    text: kind.instruction(),
                }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: prompt }],
            }],
        }
    }
}

/// Client for the Gemini `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build with an explicit key
    ///
    /// # Errors
    /// `GenerationError::MissingApiKey` for a blank key, `GenerationError::Http`
    /// if the HTTP client cannot be built
    pub fn new(config: &GenerationConfig, api_key: impl Into<String>) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey(config.api_key_env.clone()));
        }
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Build with the key taken from the configured environment variable
    ///
    /// # Errors
    /// `GenerationError::MissingApiKey` if the variable is unset or blank
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| GenerationError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    /// Model requests are sent to
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, kind: PromptKind, input: &str) -> Result<String, GenerationError> {
        tracing::debug!(%kind, model = %self.model, chars = input.len(), "generation request");
        let prompt = kind.render(input);
        let request = GenerateRequest::new(kind, &prompt);
        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%kind, status = status.as_u16(), "generation API error");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.json::<GenerateResponse>().await?.text();
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Input checks and field-filling on top of a [`TextGenerator`]
#[derive(Clone)]
pub struct Assistant {
    generator: Arc<dyn TextGenerator>,
}

impl fmt::Debug for Assistant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assistant").finish_non_exhaustive()
    }
}

impl Assistant {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Generate text for non-blank `input`
    ///
    /// # Errors
    /// - `GenerationError::EmptyInput` before any call if `input` is blank
    /// - `GenerationError::EmptyResponse` if the collaborator returned only whitespace
    /// - whatever the collaborator failed with
    pub async fn run(&self, kind: PromptKind, input: &str) -> Result<String, GenerationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        match self.generator.generate(kind, input).await {
            Ok(text) if text.trim().is_empty() => Err(GenerationError::EmptyResponse),
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) => {
                tracing::warn!(%kind, error = %e, "generation failed");
                Err(e)
            }
        }
    }

    /// Rewrite copy in a more professional tone
    ///
    /// # Errors
    /// As [`Self::run`]
    pub async fn rewrite(&self, text: &str) -> Result<String, GenerationError> {
        self.run(PromptKind::Rewrite, text).await
    }

    /// Summary with three follow-up actions
    ///
    /// # Errors
    /// As [`Self::run`]
    pub async fn summarize_lead(&self, lead: &Lead) -> Result<String, GenerationError> {
        self.run(PromptKind::SummarizeLead, &lead.summary_context()).await
    }

    /// Two-sentence marketing description for a service title
    ///
    /// # Errors
    /// As [`Self::run`]
    pub async fn describe_service(&self, title: &str) -> Result<String, GenerationError> {
        self.run(PromptKind::ServiceDescription, title).await
    }

    /// Replace `field` with generated text; on failure `field` is untouched
    ///
    /// # Errors
    /// As [`Self::run`]
    pub async fn fill_field(&self, kind: PromptKind, input: &str, field: &mut String) -> Result<(), GenerationError> {
        let text = self.run(kind, input).await?;
        *field = text;
        Ok(())
    }
}
