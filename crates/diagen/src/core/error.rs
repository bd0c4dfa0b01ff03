//! Core error types for the diagram pipeline
//!
//! Every failure a request can hit maps onto one closed variant so callers can
//! branch on the cause instead of matching on message text.

use thiserror::Error;

/// Errors produced while generating or rendering a diagram
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Unsupported diagram type: {diagram_type}")]
    InvalidType { diagram_type: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Generation failed: {message}")]
    GenerationFailed { message: String },

    #[error("Render failed: {message}")]
    RenderFailed { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Coarse classification of a [`DiagramError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidType,
    InvalidRequest,
    GenerationFailed,
    RenderFailed,
    Io,
}

impl DiagramError {
    /// Create an unsupported diagram type error
    pub fn invalid_type(diagram_type: impl Into<String>) -> Self {
        Self::InvalidType {
            diagram_type: diagram_type.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a generation error
    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::GenerationFailed {
            message: message.into(),
        }
    }

    /// Create a render error
    pub fn render_failed(message: impl Into<String>) -> Self {
        Self::RenderFailed {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidType { .. } => ErrorKind::InvalidType,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::GenerationFailed { .. } => ErrorKind::GenerationFailed,
            Self::RenderFailed { .. } => ErrorKind::RenderFailed,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// True when the request was rejected before any collaborator was called
    pub fn is_client_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidType | ErrorKind::InvalidRequest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_type() {
        let error = DiagramError::invalid_type("bogus-type");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Unsupported diagram type"));
        assert!(error_msg.contains("bogus-type"));
        assert_eq!(error.kind(), ErrorKind::InvalidType);
        assert!(error.is_client_error());
    }

    #[test]
    fn test_generation_failed() {
        let error = DiagramError::generation_failed("upstream returned 503");
        assert!(error.to_string().contains("Generation failed"));
        assert!(error.to_string().contains("503"));
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_render_failed() {
        let error = DiagramError::render_failed("engine exited with status 1");
        assert_eq!(error.kind(), ErrorKind::RenderFailed);
        assert!(error.to_string().starts_with("Render failed"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only dir");
        let error: DiagramError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("read-only dir"));
        assert_eq!(error.kind(), ErrorKind::Io);
    }
}
