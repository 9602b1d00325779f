//! sliderepl presentation server.
//!
//! Serves a slide deck as an in-browser Go editor and builds and runs
//! whatever the presenter submits.
//!
//! # Architecture
//!
//! The server consists of:
//! - **Routes**: editor page, `/compile`, health check
//! - **Render**: HTML for the editor page, output fragments, static export
//!
//! The slide deck, toolchain, and temp root are all resolved once before
//! the listener starts; failure to resolve any of them aborts startup.

pub mod error;
pub mod render;
pub mod routes;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use sliderepl_core::{RunnerConfig, SlideDeck, SnippetRunner, TempRoot, Toolchain, UniqueNames};

pub use error::{ServerError, ServerResult};
pub use routes::{AppState, FAILURE_STATUS, create_router};

/// How successful program output is returned from `/compile`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// HTML-escaped inside `<pre>`.
    #[default]
    Text,
    /// Sent verbatim, so programs can print HTML.
    Html,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `host:port` to listen on.
    pub http: String,
    /// Rendering of successful program output.
    pub output_mode: OutputMode,
    /// Per-step limit for building and running snippets.
    pub timeout: Option<Duration>,
    /// Explicit `go` executable; PATH lookup when `None`.
    pub go: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http: "127.0.0.1:3999".to_string(),
            output_mode: OutputMode::Text,
            timeout: None,
            go: None,
        }
    }
}

impl ServerConfig {
    /// Parse the listen address.
    pub fn socket_addr(&self) -> ServerResult<SocketAddr> {
        self.http
            .parse()
            .map_err(|_| ServerError::InvalidAddress(self.http.clone()))
    }

    /// Resolve the configured toolchain.
    pub fn toolchain(&self) -> ServerResult<Toolchain> {
        let toolchain = match &self.go {
            Some(go) => Toolchain::with_program(go)?,
            None => Toolchain::detect()?,
        };
        Ok(toolchain)
    }
}

/// Load everything the server needs, then serve until Ctrl+C.
pub async fn serve(slides_path: impl AsRef<Path>, config: ServerConfig) -> ServerResult<()> {
    let addr = config.socket_addr()?;
    let deck = SlideDeck::load(slides_path)?;
    let toolchain = config.toolchain()?;
    let root = TempRoot::system()?;
    let names = UniqueNames::start()?;

    match toolchain.version() {
        Ok(version) => tracing::info!("Using {}", version),
        Err(e) => tracing::warn!("{}", e),
    }
    tracing::debug!(
        "Building with {} in {}",
        toolchain.go_path().display(),
        root.path().display()
    );

    let runner = SnippetRunner::new(toolchain, root, names).with_config(RunnerConfig {
        timeout: config.timeout,
    });
    let state = Arc::new(AppState::new(deck, runner, config.output_mode));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr: addr.to_string(),
            message: e.to_string(),
        })?;
    tracing::info!("Listening on http://{}", addr);

    // Create shutdown signal channel
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http, "127.0.0.1:3999");
        assert_eq!(config.output_mode, OutputMode::Text);
        assert!(config.timeout.is_none());
        assert_eq!(config.socket_addr().unwrap().port(), 3999);
    }

    #[test]
    fn test_invalid_address() {
        let config = ServerConfig {
            http: "localhost".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.socket_addr(),
            Err(ServerError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_missing_go_override() {
        let config = ServerConfig {
            go: Some(PathBuf::from("/definitely/not/go")),
            ..ServerConfig::default()
        };
        assert!(matches!(config.toolchain(), Err(ServerError::Core(_))));
    }

    #[test]
    fn test_bind_error_hint() {
        let err = ServerError::Bind {
            addr: "127.0.0.1:3999".to_string(),
            message: "Address already in use".to_string(),
        };
        let text = err.with_hint();
        assert!(text.starts_with("Failed to listen on 127.0.0.1:3999"));
        assert!(text.contains("--http"));
    }
}
