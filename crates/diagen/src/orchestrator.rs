//! Request orchestration
//!
//! The service runs the pipeline for one request:
//! Validate → Generator → Renderer → [`DiagramResult`]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn, Instrument};

use crate::core::{
    output_dir_from_env, DiagramError, DiagramRequest, DiagramResult, DiagramType,
    GeneratorConfig, RendererConfig, ValidatedRequest,
};
use crate::generator::{MarkupGenerator, OpenAiGenerator};
use crate::renderer::{renderer_from_config, DiagramRenderer};

/// Sequences markup generation and rendering
///
/// Built once at startup and shared (cheaply cloned) with every handler. Holds
/// no mutable state, so concurrent requests need no coordination.
#[derive(Clone)]
pub struct DiagramService {
    generator: Arc<dyn MarkupGenerator>,
    renderer: Arc<dyn DiagramRenderer>,
    output_dir: PathBuf,
}

impl DiagramService {
    pub fn new(
        generator: Arc<dyn MarkupGenerator>,
        renderer: Arc<dyn DiagramRenderer>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            generator,
            renderer,
            output_dir: output_dir.into(),
        }
    }

    /// Build the production pipeline from configuration
    pub fn from_config(
        generator: GeneratorConfig,
        renderer: &RendererConfig,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, DiagramError> {
        Ok(Self::new(
            Arc::new(OpenAiGenerator::new(generator)?),
            renderer_from_config(renderer)?,
            output_dir,
        ))
    }

    /// Build the production pipeline from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let generator = GeneratorConfig::from_env()?;
        let renderer = RendererConfig::from_env()?;
        Ok(Self::from_config(generator, &renderer, output_dir_from_env())?)
    }

    /// The fixed list of supported diagram types
    pub fn supported_types(&self) -> &'static [DiagramType] {
        &DiagramType::ALL
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.name()
    }

    pub fn renderer_name(&self) -> &'static str {
        self.renderer.name()
    }

    /// Run a request, rendering into a fresh temporary file
    ///
    /// The file is created in the service's output directory and left in
    /// place for the caller.
    pub async fn generate(&self, request: &DiagramRequest) -> Result<DiagramResult, DiagramError> {
        let validated = request.validate().inspect_err(|e| {
            warn!(diagram_type = %request.diagram_type, error = %e, "Rejected request");
        })?;

        let span = tracing::info_span!("generate_diagram", diagram_type = %validated.diagram_type);
        async move {
            let image = tempfile::Builder::new()
                .prefix("diagram-")
                .suffix(".png")
                .tempfile_in(&self.output_dir)?
                .into_temp_path();
            debug!(path = %image.display(), "Allocated output file");

            // Dropping the TempPath on any error path removes the file.
            let result = self.run(validated, &image).await?;
            let path = image.keep().map_err(|e| DiagramError::from(e.error))?;
            Ok(result.with_image_path(path))
        }
        .instrument(span)
        .await
    }

    /// Run a request, rendering to a caller-chosen path
    pub async fn generate_to(
        &self,
        request: &DiagramRequest,
        output_path: &Path,
    ) -> Result<DiagramResult, DiagramError> {
        let validated = request.validate().inspect_err(|e| {
            warn!(diagram_type = %request.diagram_type, error = %e, "Rejected request");
        })?;

        let span = tracing::info_span!(
            "generate_diagram",
            diagram_type = %validated.diagram_type,
            output = %output_path.display()
        );
        async move {
            let result = self.run(validated, output_path).await?;
            Ok(result.with_image_path(output_path.to_path_buf()))
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        request: ValidatedRequest,
        output_path: &Path,
    ) -> Result<PendingResult, DiagramError> {
        info!(generator = self.generator.name(), "Generating markup");
        let markup = self
            .generator
            .generate(request.diagram_type, &request.prompt)
            .await?;
        if markup.is_empty() {
            return Err(DiagramError::generation_failed("text model returned empty markup"));
        }
        debug!(markup_len = markup.as_str().len(), "Markup ready");

        info!(renderer = self.renderer.name(), "Rendering markup");
        let rendered = self.renderer.render(&markup, output_path).await?;
        if !rendered {
            warn!("Renderer reported failure");
            return Err(DiagramError::render_failed(format!(
                "{} could not render the generated markup",
                self.renderer.name()
            )));
        }

        info!("Pipeline completed successfully");
        Ok(PendingResult {
            diagram_type: request.diagram_type,
            markup,
        })
    }
}

/// Markup that has been rendered but not yet tied to its final path
struct PendingResult {
    diagram_type: DiagramType,
    markup: crate::core::DiagramMarkup,
}

impl PendingResult {
    fn with_image_path(self, path: PathBuf) -> DiagramResult {
        DiagramResult::new(self.diagram_type, self.markup, Some(path))
    }
}

impl std::fmt::Debug for DiagramService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramService")
            .field("generator", &self.generator.name())
            .field("renderer", &self.renderer.name())
            .field("output_dir", &self.output_dir)
            .finish()
    }
}
