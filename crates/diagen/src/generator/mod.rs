//! Markup generation
//!
//! A [`MarkupGenerator`] turns a diagram type and a free-text prompt into
//! Mermaid markup by asking a generative text model.

mod openai;
pub mod prompt;

pub use openai::*;

use async_trait::async_trait;

use crate::core::{DiagramError, DiagramMarkup, DiagramType};

/// Produces Mermaid markup for a prompt
///
/// Implementations make a single attempt per call; there is no retry and no
/// caching, so identical inputs always reach the upstream model again.
#[async_trait]
pub trait MarkupGenerator: Send + Sync {
    /// Generate markup for `prompt` in the dialect of `diagram_type`
    ///
    /// Fails with [`DiagramError::GenerationFailed`] when the upstream service
    /// is unreachable, answers with an error, or answers with nothing usable.
    async fn generate(
        &self,
        diagram_type: DiagramType,
        prompt: &str,
    ) -> Result<DiagramMarkup, DiagramError>;

    /// Name used in logs
    fn name(&self) -> &'static str;
}

/// Pull the markup out of a model reply
///
/// Models often wrap the answer in a Markdown fence despite being told not
/// to. The first fenced block wins; otherwise the whole reply is used.
/// Returns `None` when nothing but whitespace remains.
pub fn extract_markup(reply: &str) -> Option<String> {
    let body = match fenced_block(reply) {
        Some(block) => block,
        None => reply,
    };
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn fenced_block(reply: &str) -> Option<&str> {
    let open = reply.find("```")?;
    let after_fence = &reply[open + 3..];
    // Drop the info string (`mermaid`, `mmd`, ...) up to the end of the line.
    let content_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(after_fence.len());
    let content = &after_fence[content_start..];
    let close = content.find("```").unwrap_or(content.len());
    Some(&content[..close])
}
