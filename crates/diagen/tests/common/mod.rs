//! Shared helpers for integration tests
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use diagen::prelude::*;
use tokio::net::TcpListener;

/// Generator that returns canned markup and counts calls
pub struct StubGenerator {
    reply: Result<String, String>,
    pub calls: AtomicUsize,
}

impl StubGenerator {
    pub fn returning(markup: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(markup.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarkupGenerator for StubGenerator {
    async fn generate(&self, _: DiagramType, _: &str) -> Result<DiagramMarkup, DiagramError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(markup) => Ok(DiagramMarkup::new(markup.clone())),
            Err(message) => Err(DiagramError::generation_failed(message.clone())),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Renderer that writes fake PNG bytes, or reports engine failure
pub struct StubRenderer {
    succeed: bool,
    pub calls: AtomicUsize,
}

impl StubRenderer {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            succeed: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            succeed: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiagramRenderer for StubRenderer {
    async fn render(&self, _: &DiagramMarkup, output_path: &Path) -> Result<bool, DiagramError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.succeed {
            tokio::fs::write(output_path, b"\x89PNG\r\n\x1a\n").await?;
        }
        Ok(self.succeed)
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Serve `app` on an ephemeral local port and return its address
pub async fn spawn_app(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}
