//! Renderer that shells out to a local mermaid-cli (`mmdc`) install

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn, Instrument};

use super::DiagramRenderer;
use crate::core::{DiagramError, DiagramMarkup, DEFAULT_BACKGROUND};

/// Runs `mmdc -i <input.mmd> -o <output> -b <background>`
pub struct MmdcRenderer {
    binary: PathBuf,
    background: String,
}

impl MmdcRenderer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

#[async_trait]
impl DiagramRenderer for MmdcRenderer {
    async fn render(&self, markup: &DiagramMarkup, output_path: &Path) -> Result<bool, DiagramError> {
        let span = tracing::info_span!(
            "render_markup",
            backend = "mmdc",
            output = %output_path.display()
        );

        async move {
            let input = tempfile::Builder::new()
                .prefix("diagen-")
                .suffix(".mmd")
                .tempfile()?;
            tokio::fs::write(input.path(), markup.as_str()).await?;

            // Render into a sibling so a failed run leaves any existing image intact.
            let parent = output_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let extension = output_path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("png");
            let staged = tempfile::Builder::new()
                .prefix(".diagen-")
                .suffix(&format!(".{}", extension))
                .tempfile_in(parent)?
                .into_temp_path();

            debug!(binary = %self.binary.display(), "Spawning mermaid-cli");
            let output = Command::new(&self.binary)
                .arg("-i")
                .arg(input.path())
                .arg("-o")
                .arg(staged.as_os_str())
                .arg("-b")
                .arg(&self.background)
                .stdin(Stdio::null())
                .output()
                .await?;

            if !output.status.success() {
                warn!(
                    status = ?output.status.code(),
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "mermaid-cli reported failure"
                );
                return Ok(false);
            }

            let written = tokio::fs::metadata(&staged)
                .await
                .map(|m| m.len() > 0)
                .unwrap_or(false);
            if !written {
                warn!("mermaid-cli exited cleanly but wrote no image");
                return Ok(false);
            }

            staged.persist(output_path).map_err(|e| e.error)?;

            info!("Diagram rendered");
            Ok(true)
        }
        .instrument(span)
        .await
    }

    fn name(&self) -> &'static str {
        "mmdc"
    }
}
