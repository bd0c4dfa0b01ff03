//! HTTP surface
//!
//! Routes:
//! - `POST /generate-diagram`: run the pipeline for `{prompt, diagram_type}`
//! - `GET /diagram-types`: the supported type identifiers, in order
//! - `GET /health`: liveness probe

mod handlers;

pub use handlers::*;

use std::net::SocketAddr;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::orchestrator::DiagramService;

/// Build the application router around a shared service
pub fn router(service: DiagramService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/generate-diagram", post(generate_diagram))
        .route("/diagram-types", get(diagram_types))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

/// Bind `addr` and serve until Ctrl+C
pub async fn serve(addr: SocketAddr, service: DiagramService) -> anyhow::Result<()> {
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                error!(%addr, "Address already in use");
            } else {
                error!(%addr, error = %e, "Failed to bind");
            }
            return Err(e.into());
        }
    };
    serve_listener(listener, service).await
}

/// Serve on an already-bound listener until Ctrl+C
pub async fn serve_listener(listener: TcpListener, service: DiagramService) -> anyhow::Result<()> {
    info!(
        addr = %listener.local_addr()?,
        generator = service.generator_name(),
        renderer = service.renderer_name(),
        "Diagram server listening"
    );

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
