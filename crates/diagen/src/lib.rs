//! Diagen - Generate Mermaid diagrams from plain-language prompts
//!
//! A text model writes Mermaid markup for a requested diagram type, and a
//! rendering engine turns that markup into a PNG.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use diagen::{DiagramRequest, DiagramService};
//!
//! # async fn run() -> anyhow::Result<()> {
//! // Reads DIAGEN_API_KEY / OPENAI_API_KEY and renderer settings from the environment
//! let service = DiagramService::from_env()?;
//!
//! let request = DiagramRequest::new("flowchart-diagram", "user signs up, verifies email, logs in");
//! let result = service.generate(&request).await?;
//!
//! println!("{}", result.preview());
//! println!("image at {:?}", result.image_path());
//! # Ok(())
//! # }
//! ```
//!
//! # Components
//!
//! - [`generator`]: the [`MarkupGenerator`] trait and an OpenAI-compatible client
//! - [`renderer`]: the [`DiagramRenderer`] trait with mermaid.ink and mermaid-cli backends
//! - [`orchestrator`]: [`DiagramService`], which sequences the two
//! - [`server`]: the axum HTTP surface

pub mod core;
pub mod generator;
pub mod orchestrator;
pub mod renderer;
pub mod server;

pub use crate::core::*;
pub use generator::MarkupGenerator;
pub use orchestrator::DiagramService;
pub use renderer::DiagramRenderer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        DiagramError, DiagramMarkup, DiagramRequest, DiagramResponse, DiagramResult,
        DiagramType, ErrorKind, GeneratorConfig, RendererBackend, RendererConfig,
    };
    pub use crate::generator::{MarkupGenerator, OpenAiGenerator};
    pub use crate::orchestrator::DiagramService;
    pub use crate::renderer::{DiagramRenderer, MermaidInkRenderer, MmdcRenderer};
}

/// Identifiers of every supported diagram type, in presentation order
///
/// # Example
/// ```rust
/// let ids = diagen::supported_type_ids();
/// assert_eq!(ids[0], "flowchart-diagram");
/// assert_eq!(ids.len(), 12);
/// ```
pub fn supported_type_ids() -> Vec<&'static str> {
    DiagramType::ids()
}

/// Wrap markup in the `mermaid` code fence used for previews
///
/// # Example
/// ```rust
/// assert_eq!(diagen::preview("pie"), "```mermaid\npie\n```");
/// ```
pub fn preview(markup: &str) -> String {
    DiagramMarkup::new(markup).preview()
}
