//! Ollama-compatible HTTP client.
//!
//! Talks to the runtime's `/api/generate` endpoint for text tasks and
//! `/api/chat` for image description. Requests are never streamed; the
//! whole completion is awaited and returned in one piece.

use std::time::Duration;

use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use edapt_session::{
    Config, GenOptions, GenerationErrorKind, Generator, ModelConfig, ModelRole, Result,
    SessionError,
};

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenOptions>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for an Ollama-compatible model runtime.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    models: ModelConfig,
}

impl OllamaClient {
    /// Creates a client for the given endpoint with the given per-request
    /// timeout.
    pub fn new(endpoint: &str, models: ModelConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                SessionError::generation(
                    GenerationErrorKind::Other,
                    format!("failed to build HTTP client: {e}"),
                )
            })?;

        Ok(Self {
            client,
            base_url: endpoint.trim_end_matches('/').to_string(),
            models,
        })
    }

    /// Creates a client from the session configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.endpoint,
            config.models.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Resolves a model role to the configured model identifier.
    #[must_use]
    pub fn model_for(&self, role: ModelRole) -> &str {
        match role {
            ModelRole::Fast => &self.models.fast,
            ModelRole::Accurate => &self.models.accurate,
            ModelRole::Vision => &self.models.vision,
        }
    }

    fn classify_transport(e: &reqwest::Error) -> GenerationErrorKind {
        if e.is_connect() {
            GenerationErrorKind::Unavailable
        } else if e.is_timeout() {
            GenerationErrorKind::Network
        } else if e.is_decode() {
            GenerationErrorKind::Malformed
        } else {
            GenerationErrorKind::Network
        }
    }

    fn transport_error(e: reqwest::Error) -> SessionError {
        SessionError::generation(Self::classify_transport(&e), e.to_string())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let kind = if status.is_server_error() {
            GenerationErrorKind::Server
        } else {
            GenerationErrorKind::Other
        };
        let body = response.text().await.unwrap_or_default();
        Err(SessionError::generation(
            kind,
            format!("runtime returned HTTP {status}: {body}"),
        ))
    }
}

impl Generator for OllamaClient {
    async fn generate(
        &self,
        role: ModelRole,
        prompt: &str,
        options: GenOptions,
    ) -> Result<String> {
        let model = self.model_for(role);
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: if options.is_empty() {
                None
            } else {
                Some(options)
            },
        };

        debug!(model, url = %url, prompt_len = prompt.len(), "Sending generate request");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(Self::transport_error)?;
        let response = Self::check_status(response).await?;

        let body: GenerateResponse = response.json().await.map_err(Self::transport_error)?;
        Ok(body.response)
    }

    async fn describe(&self, prompt: &str, image: &[u8]) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let request = ChatRequest {
            model: &self.models.vision,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
                images: Some(vec![encoded]),
            }],
            stream: false,
        };

        debug!(model = %self.models.vision, image_len = image.len(), "Sending vision request");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(Self::transport_error)?;
        let response = Self::check_status(response).await?;

        let body: ChatResponse = response.json().await.map_err(Self::transport_error)?;
        Ok(body.message.content)
    }
}
