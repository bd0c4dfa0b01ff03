//! Configuration for the generator, renderer and output location
//!
//! Values come from environment variables with built-in defaults; the CLI
//! layers its own flags on top.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_INK_URL: &str = "https://mermaid.ink";
pub const DEFAULT_MMDC: &str = "mmdc";
pub const DEFAULT_BACKGROUND: &str = "white";

/// Configuration problems detected at startup
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing API key: set DIAGEN_API_KEY or OPENAI_API_KEY")]
    MissingApiKey,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Settings for the text-generation service
#[derive(Clone, PartialEq)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

// Keeps the key out of logs.
impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeneratorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("DIAGEN_API_KEY")
            .or_else(|| lookup("OPENAI_API_KEY"))
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup("DIAGEN_API_BASE") {
            config.base_url = base_url;
        }
        if let Some(model) = lookup("DIAGEN_MODEL") {
            config.model = model;
        }
        if let Some(raw) = lookup("DIAGEN_TEMPERATURE") {
            config.temperature = parse_value("DIAGEN_TEMPERATURE", &raw)?;
        }
        if let Some(raw) = lookup("DIAGEN_TIMEOUT_SECS") {
            let secs: u64 = parse_value("DIAGEN_TIMEOUT_SECS", &raw)?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

/// Which rendering engine to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererBackend {
    /// The mermaid.ink HTTP rendering service
    #[default]
    MermaidInk,
    /// A locally installed `mmdc` (mermaid-cli) binary
    Mmdc,
}

impl FromStr for RendererBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ink" | "mermaid-ink" => Ok(RendererBackend::MermaidInk),
            "mmdc" | "mermaid-cli" => Ok(RendererBackend::Mmdc),
            _ => Err(ConfigError::InvalidValue {
                name: "DIAGEN_RENDERER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RendererBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererBackend::MermaidInk => write!(f, "ink"),
            RendererBackend::Mmdc => write!(f, "mmdc"),
        }
    }
}

/// Settings for the rendering engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    pub backend: RendererBackend,
    pub ink_base_url: String,
    pub mmdc_path: PathBuf,
    pub background: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            backend: RendererBackend::default(),
            ink_base_url: DEFAULT_INK_URL.to_string(),
            mmdc_path: PathBuf::from(DEFAULT_MMDC),
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

impl RendererConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup("DIAGEN_RENDERER") {
            config.backend = raw.parse()?;
        }
        if let Some(url) = lookup("DIAGEN_INK_URL") {
            config.ink_base_url = url;
        }
        if let Some(path) = lookup("DIAGEN_MMDC") {
            config.mmdc_path = PathBuf::from(path);
        }
        if let Some(background) = lookup("DIAGEN_BACKGROUND") {
            config.background = background;
        }
        Ok(config)
    }
}

/// Directory rendered images are written to
pub fn output_dir_from_env() -> PathBuf {
    std::env::var_os("DIAGEN_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: raw.to_string(),
    })
}
