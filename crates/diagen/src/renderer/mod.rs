//! Diagram rendering
//!
//! A [`DiagramRenderer`] hands markup to an external rendering engine and
//! reports whether the engine produced an image at the requested path.

mod mermaid_ink;
mod mmdc;

pub use mermaid_ink::*;
pub use mmdc::*;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{DiagramError, DiagramMarkup, RendererBackend, RendererConfig};

/// Rasterizes Mermaid markup to an image file
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Render `markup` to `output_path`
    ///
    /// Returns `Ok(false)` when the engine rejects the markup or fails to
    /// produce an image. `Err` is reserved for unexpected I/O problems such as
    /// an unwritable destination or a missing engine binary.
    async fn render(&self, markup: &DiagramMarkup, output_path: &Path) -> Result<bool, DiagramError>;

    /// Name used in logs
    fn name(&self) -> &'static str;
}

/// Build the renderer selected by `config`
pub fn renderer_from_config(config: &RendererConfig) -> Result<Arc<dyn DiagramRenderer>, DiagramError> {
    let renderer: Arc<dyn DiagramRenderer> = match config.backend {
        RendererBackend::MermaidInk => Arc::new(MermaidInkRenderer::new(config.ink_base_url.clone())?),
        RendererBackend::Mmdc => Arc::new(
            MmdcRenderer::new(config.mmdc_path.clone()).with_background(config.background.clone()),
        ),
    };
    Ok(renderer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_from_config_selects_backend() {
        let ink = renderer_from_config(&RendererConfig::default()).unwrap();
        assert_eq!(ink.name(), "mermaid-ink");

        let config = RendererConfig {
            backend: RendererBackend::Mmdc,
            ..RendererConfig::default()
        };
        let mmdc = renderer_from_config(&config).unwrap();
        assert_eq!(mmdc.name(), "mmdc");
    }
}
