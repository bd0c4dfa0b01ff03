//! Command-line interface for the diagen utility
//!
//! Runs the HTTP server, an interactive menu, or one-shot generation.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use diagen::core::logging::init_logging;
use diagen::{
    output_dir_from_env, DiagramRequest, DiagramService, DiagramType, GeneratorConfig,
    RendererBackend, RendererConfig,
};

use crate::colorizer::{ColorChoice, Painter};
use crate::interactive;

/// Diagen - Generate Mermaid diagrams from plain-language prompts
#[derive(Parser)]
#[command(name = "diagen")]
#[command(about = "Generate Mermaid diagrams with a text model and render them to PNG")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (overrides DIAGEN_LOG_LEVEL)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (overrides DIAGEN_LOG_FORMAT)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// When to use colors in output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    pub color: ColorChoice,

    #[command(flatten)]
    pub service: ServiceArgs,
}

/// Overrides for generator and renderer configuration
#[derive(clap::Args, Debug, Default, Clone, PartialEq)]
pub struct ServiceArgs {
    /// Base URL of the OpenAI-compatible API (overrides DIAGEN_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Model name (overrides DIAGEN_MODEL)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Sampling temperature (overrides DIAGEN_TEMPERATURE)
    #[arg(long, global = true)]
    pub temperature: Option<f32>,

    /// Rendering engine (overrides DIAGEN_RENDERER)
    #[arg(long, value_enum, global = true)]
    pub renderer: Option<RendererChoice>,

    /// mermaid.ink base URL (overrides DIAGEN_INK_URL)
    #[arg(long, global = true)]
    pub ink_url: Option<String>,

    /// Path to the mermaid-cli binary (overrides DIAGEN_MMDC)
    #[arg(long, global = true)]
    pub mmdc_path: Option<PathBuf>,

    /// Background color passed to mermaid-cli (overrides DIAGEN_BACKGROUND)
    #[arg(long, global = true)]
    pub background: Option<String>,

    /// Directory for temporary images (overrides DIAGEN_OUTPUT_DIR)
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,
}

impl ServiceArgs {
    /// Layer these flags over environment-derived configuration
    pub fn apply(
        &self,
        mut generator: GeneratorConfig,
        mut renderer: RendererConfig,
    ) -> (GeneratorConfig, RendererConfig) {
        if let Some(api_base) = &self.api_base {
            generator.base_url = api_base.clone();
        }
        if let Some(model) = &self.model {
            generator.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            generator.temperature = temperature;
        }
        if let Some(choice) = self.renderer {
            renderer.backend = choice.into();
        }
        if let Some(ink_url) = &self.ink_url {
            renderer.ink_base_url = ink_url.clone();
        }
        if let Some(mmdc_path) = &self.mmdc_path {
            renderer.mmdc_path = mmdc_path.clone();
        }
        if let Some(background) = &self.background {
            renderer.background = background.clone();
        }
        (generator, renderer)
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Rendering engine choices
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum RendererChoice {
    /// mermaid.ink HTTP service
    Ink,
    /// Local mermaid-cli
    Mmdc,
}

impl From<RendererChoice> for RendererBackend {
    fn from(value: RendererChoice) -> Self {
        match value {
            RendererChoice::Ink => RendererBackend::MermaidInk,
            RendererChoice::Mmdc => RendererBackend::Mmdc,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "0.0.0.0:8000")]
        bind: SocketAddr,
    },

    /// Pick diagram types from a numbered menu and describe them
    Interactive {
        /// Directory images are written to
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Generate a single diagram
    Generate {
        /// Diagram type identifier (see `diagen types`)
        #[arg(short = 't', long = "type")]
        diagram_type: String,

        /// Description of the diagram
        #[arg(short, long)]
        prompt: String,

        /// Output image path [default: <type>_diagram.png]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show supported diagram types
    Types {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Main CLI application
pub struct DiagenApp {
    painter: Painter,
}

impl DiagenApp {
    pub fn new() -> Self {
        Self {
            painter: Painter::plain(),
        }
    }

    /// Run the application with the given CLI arguments
    pub async fn run(&mut self, cli: Cli) -> Result<()> {
        if let Err(e) = init_logging(
            cli.log_level.map(|l| l.as_str()),
            cli.log_format.map(|f| f.as_str()),
        ) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        self.painter = Painter::new(cli.color);

        if cli.verbose {
            eprintln!("Diagen v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Types { json } => self.types_command(json, &mut io::stdout()),
            Commands::Serve { bind } => {
                let service = self.build_service(&cli.service, cli.verbose)?;
                diagen::server::serve(bind, service).await
            }
            Commands::Interactive { dir } => {
                let service = self.build_service(&cli.service, cli.verbose)?;
                self.interactive_command(&service, &dir).await
            }
            Commands::Generate {
                diagram_type,
                prompt,
                output,
            } => {
                let service = self.build_service(&cli.service, cli.verbose)?;
                self.generate_command(&service, diagram_type, prompt, output, &mut io::stdout())
                    .await
            }
        }
    }

    /// Construct the pipeline once from environment plus flags
    pub fn build_service(&self, args: &ServiceArgs, verbose: bool) -> Result<DiagramService> {
        let generator = GeneratorConfig::from_env()?;
        let renderer = RendererConfig::from_env()?;
        let (generator, renderer) = args.apply(generator, renderer);
        let output_dir = args.output_dir.clone().unwrap_or_else(output_dir_from_env);

        if verbose {
            eprintln!(
                "Using model {} at {}, renderer {}",
                generator.model, generator.base_url, renderer.backend
            );
        }

        DiagramService::from_config(generator, &renderer, output_dir)
            .context("Failed to set up the diagram pipeline")
    }

    /// Handle the types command
    pub fn types_command<W: Write>(&self, json: bool, out: &mut W) -> Result<()> {
        if json {
            let types: Vec<_> = DiagramType::ALL
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "id": t.id(),
                        "name": t.label(),
                        "mermaid_header": t.header(),
                    })
                })
                .collect();
            let body = serde_json::json!({
                "supported_types": types,
                "total": DiagramType::ALL.len(),
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        } else {
            writeln!(out, "{}", self.painter.heading("Supported diagram types:"))?;
            for t in DiagramType::ALL {
                writeln!(out, "  {:<28} - {}", t.id(), t.label())?;
            }
            writeln!(out)?;
            writeln!(out, "Total: {} diagram types supported", DiagramType::ALL.len())?;
        }
        Ok(())
    }

    /// Handle the generate command
    pub async fn generate_command<W: Write>(
        &self,
        service: &DiagramService,
        diagram_type: String,
        prompt: String,
        output: Option<PathBuf>,
        out: &mut W,
    ) -> Result<()> {
        let request = DiagramRequest::new(diagram_type, prompt);
        // Reject unknown types before deriving a file name from them.
        let validated = request.validate().map_err(|e| {
            anyhow!(
                "{} (run `diagen types` to list supported types)",
                e
            )
        })?;
        let path = output.unwrap_or_else(|| {
            interactive::output_file(std::path::Path::new("."), validated.diagram_type)
        });

        // main reports the failure on stderr.
        let result = service
            .generate_to(&request, &path)
            .await
            .context("Failed to generate diagram")?;

        writeln!(out, "{}", result.markup())?;
        writeln!(
            out,
            "{}",
            self.painter
                .success(&format!("Diagram saved to {}", path.display()))
        )?;
        Ok(())
    }

    /// Handle the interactive command
    async fn interactive_command(&self, service: &DiagramService, dir: &std::path::Path) -> Result<()> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut out = io::stdout();
        let generated =
            interactive::run_session(service, &mut input, &mut out, dir, self.painter).await?;
        writeln!(out, "Generated {} diagram(s). Goodbye!", generated)?;
        Ok(())
    }
}

impl Default for DiagenApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clap::Parser;
    use diagen::{DiagramError, DiagramMarkup, DiagramRenderer, MarkupGenerator};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::tempdir;

    struct Fixed;

    #[async_trait]
    impl MarkupGenerator for Fixed {
        async fn generate(&self, _: DiagramType, _: &str) -> Result<DiagramMarkup, DiagramError> {
            Ok(DiagramMarkup::new("classDiagram\n  class Order"))
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct Outcome(bool);

    #[async_trait]
    impl DiagramRenderer for Outcome {
        async fn render(&self, _: &DiagramMarkup, path: &Path) -> Result<bool, DiagramError> {
            if self.0 {
                std::fs::write(path, b"png")?;
            }
            Ok(self.0)
        }

        fn name(&self) -> &'static str {
            "outcome"
        }
    }

    #[test]
    fn test_cli_parsing_generate_command() {
        let args = vec![
            "diagen",
            "generate",
            "--type",
            "class-diagram",
            "--prompt",
            "an order model",
            "--output",
            "order.png",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Generate {
                diagram_type,
                prompt,
                output,
            } => {
                assert_eq!(diagram_type, "class-diagram");
                assert_eq!(prompt, "an order model");
                assert_eq!(output.unwrap().to_string_lossy(), "order.png");
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parsing_serve_default_bind() {
        let cli = Cli::try_parse_from(["diagen", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { bind } => assert_eq!(bind.port(), 8000),
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parsing_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "diagen",
            "interactive",
            "--renderer",
            "mmdc",
            "--model",
            "gpt-4.1",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.service.renderer, Some(RendererChoice::Mmdc));
        assert_eq!(cli.service.model.as_deref(), Some("gpt-4.1"));
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(matches!(cli.command, Commands::Interactive { .. }));
    }

    #[test]
    fn test_cli_parsing_background_flag() {
        let cli = Cli::try_parse_from([
            "diagen",
            "generate",
            "-t",
            "pie-chart",
            "-p",
            "x",
            "--background",
            "#f0f0f0",
        ])
        .unwrap();
        assert_eq!(cli.service.background.as_deref(), Some("#f0f0f0"));
    }

    #[test]
    fn test_cli_rejects_unknown_renderer() {
        assert!(Cli::try_parse_from(["diagen", "types", "--renderer", "graphviz"]).is_err());
    }

    #[test]
    fn test_service_args_override_config() {
        let args = ServiceArgs {
            api_base: Some("http://localhost:11434/v1".to_string()),
            temperature: Some(0.0),
            renderer: Some(RendererChoice::Mmdc),
            mmdc_path: Some(PathBuf::from("/usr/local/bin/mmdc")),
            background: Some("transparent".to_string()),
            ..ServiceArgs::default()
        };

        let (generator, renderer) = args.apply(GeneratorConfig::new("k"), RendererConfig::default());

        assert_eq!(generator.base_url, "http://localhost:11434/v1");
        assert_eq!(generator.temperature, 0.0);
        assert_eq!(generator.model, diagen::DEFAULT_MODEL);
        assert_eq!(renderer.backend, RendererBackend::Mmdc);
        assert_eq!(renderer.mmdc_path, PathBuf::from("/usr/local/bin/mmdc"));
        assert_eq!(renderer.background, "transparent");
    }

    #[test]
    fn test_types_command_human_format() {
        let app = DiagenApp::new();
        let mut out = Vec::new();
        app.types_command(false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("flowchart-diagram"));
        assert!(text.contains("Total: 12 diagram types supported"));
    }

    #[test]
    fn test_types_command_json_format() {
        let app = DiagenApp::new();
        let mut out = Vec::new();
        app.types_command(true, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["total"], 12);
        assert_eq!(value["supported_types"][0]["id"], "flowchart-diagram");
    }

    #[tokio::test]
    async fn test_generate_command_success() {
        let dir = tempdir().unwrap();
        let service = DiagramService::new(Arc::new(Fixed), Arc::new(Outcome(true)), dir.path());
        let target = dir.path().join("order.png");
        let mut out = Vec::new();

        DiagenApp::new()
            .generate_command(
                &service,
                "class-diagram".to_string(),
                "orders".to_string(),
                Some(target.clone()),
                &mut out,
            )
            .await
            .unwrap();

        assert!(target.exists());
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("classDiagram"));
        assert!(text.contains("Diagram saved to"));
    }

    #[tokio::test]
    async fn test_generate_command_render_failure() {
        let dir = tempdir().unwrap();
        let service = DiagramService::new(Arc::new(Fixed), Arc::new(Outcome(false)), dir.path());
        let mut out = Vec::new();

        let result = DiagenApp::new()
            .generate_command(
                &service,
                "class-diagram".to_string(),
                "orders".to_string(),
                Some(dir.path().join("order.png")),
                &mut out,
            )
            .await;

        let err = result.unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "Failed to generate diagram: Render failed: outcome could not render the generated markup"
        );
        assert!(out.is_empty(), "failure should only be reported once");
    }

    #[tokio::test]
    async fn test_generate_command_unknown_type() {
        let dir = tempdir().unwrap();
        let service = DiagramService::new(Arc::new(Fixed), Arc::new(Outcome(true)), dir.path());
        let mut out = Vec::new();

        let err = DiagenApp::new()
            .generate_command(&service, "bogus-type".to_string(), "x".to_string(), None, &mut out)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("diagen types"));
    }
}
