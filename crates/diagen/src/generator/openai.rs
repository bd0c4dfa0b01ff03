//! OpenAI-compatible chat completions client
//!
//! Works against any endpoint that speaks the `/chat/completions` protocol
//! (OpenAI, Azure-style proxies, local servers) by changing the base URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn, Instrument};

use super::{extract_markup, prompt, MarkupGenerator};
use crate::core::{DiagramError, DiagramMarkup, DiagramType, GeneratorConfig};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

impl ChatMessage {
    fn system(content: String) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content),
        }
    }

    fn user(content: String) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Markup generator backed by an OpenAI-compatible API
pub struct OpenAiGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
}

impl OpenAiGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, DiagramError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DiagramError::generation_failed(format!("HTTP client setup: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Use a caller-provided HTTP client (shared connection pool)
    pub fn with_client(client: reqwest::Client, config: GeneratorConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn request_completion(
        &self,
        diagram_type: DiagramType,
        prompt_text: &str,
    ) -> Result<String, DiagramError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage::system(prompt::system_instruction(diagram_type)),
                ChatMessage::user(prompt::user_message(prompt_text)),
            ],
            temperature: self.config.temperature,
        };

        trace!(endpoint = %self.endpoint(), "Sending chat completion request");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DiagramError::generation_failed(format!("request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DiagramError::generation_failed(format!("reading response: {}", e)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            warn!(status = status.as_u16(), "Text model returned an error");
            return Err(DiagramError::generation_failed(format!(
                "text model returned {}: {}",
                status, detail
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            DiagramError::generation_failed(format!("unparsable response: {}", e))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DiagramError::generation_failed("response contained no choices"))?;
        debug!(finish_reason = ?choice.finish_reason, "Completion received");

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl MarkupGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        diagram_type: DiagramType,
        prompt_text: &str,
    ) -> Result<DiagramMarkup, DiagramError> {
        let span = tracing::info_span!(
            "generate_markup",
            diagram_type = %diagram_type,
            model = %self.config.model,
            prompt_len = prompt_text.len()
        );

        async move {
            let reply = self.request_completion(diagram_type, prompt_text).await?;
            let markup = extract_markup(&reply)
                .ok_or_else(|| DiagramError::generation_failed("text model returned empty markup"))?;

            if !diagram_type.matches_header(&markup) {
                warn!(
                    expected = diagram_type.header(),
                    "Generated markup does not start with the expected keyword"
                );
            }

            info!(markup_len = markup.len(), "Markup generated");
            Ok(DiagramMarkup::new(markup))
        }
        .instrument(span)
        .await
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
