//! Request and result types that flow through the pipeline
//!
//! [`DiagramRequest`] is the untrusted wire shape, [`ValidatedRequest`] is what
//! the orchestrator hands to collaborators, and [`DiagramResult`] is the
//! immutable outcome of one request.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DiagramError, DiagramType};

/// Opening fence used for previews
pub const PREVIEW_FENCE_OPEN: &str = "```mermaid\n";
/// Closing fence used for previews
pub const PREVIEW_FENCE_CLOSE: &str = "\n```";

/// A diagram request as received from a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramRequest {
    pub prompt: String,
    pub diagram_type: String,
}

impl DiagramRequest {
    pub fn new(diagram_type: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            diagram_type: diagram_type.into(),
        }
    }

    /// Check the type against the supported set and reject blank prompts
    pub fn validate(&self) -> Result<ValidatedRequest, DiagramError> {
        let diagram_type: DiagramType = self.diagram_type.parse()?;
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(DiagramError::invalid_request("prompt must not be empty"));
        }
        Ok(ValidatedRequest {
            diagram_type,
            prompt: prompt.to_string(),
        })
    }
}

/// A request whose diagram type is known to be supported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub diagram_type: DiagramType,
    pub prompt: String,
}

/// Mermaid markup text, opaque to this crate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagramMarkup(String);

impl DiagramMarkup {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Markup wrapped in a `mermaid` code fence
    pub fn preview(&self) -> String {
        let mut out =
            String::with_capacity(PREVIEW_FENCE_OPEN.len() + self.0.len() + PREVIEW_FENCE_CLOSE.len());
        out.push_str(PREVIEW_FENCE_OPEN);
        out.push_str(&self.0);
        out.push_str(PREVIEW_FENCE_CLOSE);
        out
    }
}

impl fmt::Display for DiagramMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DiagramMarkup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of a successful request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramResult {
    diagram_type: DiagramType,
    markup: DiagramMarkup,
    image_path: Option<PathBuf>,
    preview: String,
}

impl DiagramResult {
    pub fn new(diagram_type: DiagramType, markup: DiagramMarkup, image_path: Option<PathBuf>) -> Self {
        let preview = markup.preview();
        Self {
            diagram_type,
            markup,
            image_path,
            preview,
        }
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    pub fn markup(&self) -> &DiagramMarkup {
        &self.markup
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }
}

/// JSON body returned by `POST /generate-diagram`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramResponse {
    pub mermaid_code: String,
    pub image_path: Option<String>,
    pub preview: String,
}

impl From<DiagramResult> for DiagramResponse {
    fn from(result: DiagramResult) -> Self {
        Self {
            image_path: result
                .image_path
                .map(|p| p.to_string_lossy().into_owned()),
            preview: result.preview,
            mermaid_code: result.markup.into_inner(),
        }
    }
}

/// JSON body returned on failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
