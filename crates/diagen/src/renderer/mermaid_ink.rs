//! Renderer backed by the mermaid.ink HTTP service

use std::path::Path;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use tracing::{debug, info, warn, Instrument};

use super::DiagramRenderer;
use crate::core::{DiagramError, DiagramMarkup};

/// Renders through `GET {base_url}/img/{base64(markup)}?type=png`
pub struct MermaidInkRenderer {
    client: reqwest::Client,
    base_url: String,
}

impl MermaidInkRenderer {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DiagramError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| DiagramError::render_failed(format!("HTTP client setup: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// URL that renders `markup` as PNG
    pub fn image_url(&self, markup: &DiagramMarkup) -> String {
        format!(
            "{}/img/{}?type=png",
            self.base_url.trim_end_matches('/'),
            URL_SAFE.encode(markup.as_str())
        )
    }
}

#[async_trait]
impl DiagramRenderer for MermaidInkRenderer {
    async fn render(&self, markup: &DiagramMarkup, output_path: &Path) -> Result<bool, DiagramError> {
        let span = tracing::info_span!(
            "render_markup",
            backend = "mermaid-ink",
            output = %output_path.display()
        );

        async move {
            let response = match self.client.get(self.image_url(markup)).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!(error = %e, "Rendering service unreachable");
                    return Ok(false);
                }
            };

            let status = response.status();
            if !status.is_success() {
                warn!(status = status.as_u16(), "Rendering service rejected markup");
                return Ok(false);
            }

            let bytes = match response.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(error = %e, "Failed to read rendered image");
                    return Ok(false);
                }
            };
            if bytes.is_empty() {
                warn!("Rendering service returned an empty image");
                return Ok(false);
            }
            debug!(image_len = bytes.len(), "Image received");

            tokio::fs::write(output_path, &bytes).await?;
            info!("Diagram rendered");
            Ok(true)
        }
        .instrument(span)
        .await
    }

    fn name(&self) -> &'static str {
        "mermaid-ink"
    }
}
