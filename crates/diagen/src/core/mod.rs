//! Core types shared by every stage of the pipeline
//!
//! Diagram types, request/result shapes, the error taxonomy, configuration
//! and logging setup.

pub mod config;
mod diagram_type;
mod error;
pub mod logging;
mod types;

pub use config::*;
pub use diagram_type::*;
pub use error::*;
pub use logging::*;
pub use types::*;
