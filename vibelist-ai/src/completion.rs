//! Chat-completion client
//!
//! Request/response types for an OpenAI-compatible `/chat/completions`
//! endpoint, the [`CompletionProvider`] seam used by every pipeline stage, and
//! the reqwest-backed implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use vibelist_common::config::{is_valid_key, CompletionConfig};
use vibelist_common::{Error, Result};

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// Image reference inside a multi-part message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// One part of a multi-part message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    /// Inline JPEG payload as a data URL part
    pub fn jpeg_base64(base64: &str) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: format!("data:image/jpeg;base64,{base64}"),
            },
        }
    }
}

/// Message content: plain text or mixed text/image parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        }
    }
}

/// Completion request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Concatenated text of all messages, image parts skipped
    pub fn text(&self) -> String {
        self.messages
            .iter()
            .flat_map(|m| match &m.content {
                MessageContent::Text(t) => vec![t.as_str()],
                MessageContent::Parts(parts) => parts
                    .iter()
                    .filter_map(|p| match p {
                        ContentPart::Text { text } => Some(text.as_str()),
                        ContentPart::ImageUrl { .. } => None,
                    })
                    .collect(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any message carries an image part
    pub fn has_image(&self) -> bool {
        self.messages.iter().any(|m| match &m.content {
            MessageContent::Parts(parts) => parts
                .iter()
                .any(|p| matches!(p, ContentPart::ImageUrl { .. })),
            MessageContent::Text(_) => false,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Models used for text-only and image completions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChoice {
    pub text: String,
    pub vision: String,
}

impl Default for ModelChoice {
    fn default() -> Self {
        Self::from(&CompletionConfig::default())
    }
}

impl From<&CompletionConfig> for ModelChoice {
    fn from(config: &CompletionConfig) -> Self {
        Self {
            text: config.text_model.clone(),
            vision: config.vision_model.clone(),
        }
    }
}

/// Text-completion capability
///
/// Returns the first choice's content, trimmed. A missing content field is
/// returned as an empty string; callers decide whether that is an error.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// reqwest-backed client for an OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ChatCompletionClient {
    /// Create a client for `<base_url>/chat/completions`
    ///
    /// # Errors
    /// `Error::Config` for a blank key, `Error::Internal` if the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if !is_valid_key(&api_key) {
            return Err(Error::Config("completion API key is missing".to_string()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
        })
    }

    /// Create a client from configuration, resolving the key ENV → TOML
    pub fn from_config(config: &CompletionConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        Self::new(
            &config.base_url,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            max_tokens = request.max_tokens,
            has_image = request.has_image(),
            "Sending completion request"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Completion response status");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Completion request failed");
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Network(format!("unreadable completion response: {}", e)))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default())
    }
}
