//! HTTP routes for the sliderepl server.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Deserialize;
use sliderepl_core::{Outcome, SlideDeck, SnippetRunner};
use tower_http::cors::CorsLayer;

use crate::OutputMode;
use crate::render::{FrontPage, output_fragment};

/// Status returned by `/compile` when writing, building, or running failed.
///
/// The editor script tells output from errors by this status alone, so it
/// stays a client-error code even though the request itself was fine.
pub const FAILURE_STATUS: StatusCode = StatusCode::NOT_FOUND;

/// Application state shared across handlers.
pub struct AppState {
    /// Slides parsed at startup.
    pub deck: Arc<SlideDeck>,
    /// Build-and-run pipeline.
    pub runner: SnippetRunner,
    /// How successful program output is sent back.
    pub output_mode: OutputMode,
    /// Directory that `/<path>` requests may read editor contents from.
    pub content_root: PathBuf,
}

impl AppState {
    /// Create state serving files relative to the current directory.
    pub fn new(deck: SlideDeck, runner: SnippetRunner, output_mode: OutputMode) -> Self {
        Self {
            deck: Arc::new(deck),
            runner,
            output_mode,
            content_root: PathBuf::from("."),
        }
    }

    /// Serve `/<path>` files from `root` instead.
    pub fn with_content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = root.into();
        self
    }
}

/// Create the router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(front_page_handler))
        .route("/compile", post(compile_handler))
        .route("/health", get(health_handler))
        .route("/{*path}", get(file_page_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `?s=<n>` slide selector.
#[derive(Debug, Default, Deserialize)]
pub struct SlideQuery {
    s: Option<String>,
}

impl SlideQuery {
    /// Requested slide; missing or malformed values mean the first slide.
    fn index(&self) -> i64 {
        self.s
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// Health check handler.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Editor page for the requested slide.
async fn front_page_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlideQuery>,
) -> Response {
    slide_page(&state, query.index())
}

/// Editor page prefilled from a local file, falling back to the slide.
async fn file_page_handler(
    State(state): State<Arc<AppState>>,
    AxumPath(path): AxumPath<String>,
    Query(query): Query<SlideQuery>,
) -> Response {
    let index = query.index();

    let Some(file) = local_file(&state.content_root, &path) else {
        return slide_page(&state, index);
    };

    match tokio::fs::read(&file).await {
        Ok(bytes) => {
            let contents = String::from_utf8_lossy(&bytes);
            let page = FrontPage {
                contents: &contents,
                notes: "",
                neighbors: state.deck.neighbors(index),
            };
            Html(page.render()).into_response()
        }
        Err(e) => {
            tracing::debug!("Failed to read {}: {}", file.display(), e);
            slide_page(&state, index)
        }
    }
}

fn slide_page(state: &AppState, index: i64) -> Response {
    let Some(slide) = state.deck.get(index) else {
        return (StatusCode::NOT_FOUND, Html(format!("no slide {index}"))).into_response();
    };

    let page = FrontPage {
        contents: &slide.contents,
        notes: &slide.notes,
        neighbors: state.deck.neighbors(index),
    };
    Html(page.render()).into_response()
}

/// Resolve `requested` under `root`, refusing anything that could escape it.
fn local_file(root: &Path, requested: &str) -> Option<PathBuf> {
    let requested = Path::new(requested);
    if requested.as_os_str().is_empty()
        || !requested
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let path = root.join(requested);
    path.is_file().then_some(path)
}

/// Build and run the request body, answering with its output.
async fn compile_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let runner = state.runner.clone();
    let outcome = match tokio::task::spawn_blocking(move || runner.execute(&body)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Snippet task failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "snippet task failed").into_response();
        }
    };

    outcome_response(outcome, state.output_mode)
}

fn outcome_response(outcome: Outcome, mode: OutputMode) -> Response {
    if outcome.failed {
        return (FAILURE_STATUS, Html(output_fragment(&outcome.output))).into_response();
    }

    match mode {
        OutputMode::Html => Html(outcome.output).into_response(),
        OutputMode::Text => Html(output_fragment(&outcome.output)).into_response(),
    }
}
