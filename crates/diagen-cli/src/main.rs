//! Diagen CLI - Generate Mermaid diagrams from prompts

mod cli;
mod colorizer;
mod interactive;

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli_args = cli::Cli::parse();

    let mut app = cli::DiagenApp::new();

    if let Err(e) = app.run(cli_args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
