//! Blog and search HTTP API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/blog` | All published posts, newest first |
//! | `GET`  | `/api/blog/{slug}` | One post with its full content |
//! | `GET`  | `/api/search?q=&limit=` | Ranked results across projects, posts and sections |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "post not found: hello" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the site frontend can
//! call the API from another origin during development.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::blog::{self, BlogPost};
use crate::client::LocalBlogSource;
use crate::config::Config;
use crate::search::search_options;
use crate::site;
use folio_core::aggregate::{collect_candidates, BlogSource};
use folio_core::models::{BlogPostSummary, ScoredResult};
use folio_core::search::search;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build the router without binding, so tests can serve it on any listener.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/blog", get(handle_list_posts))
        .route("/api/blog/{slug}", get(handle_get_post))
        .route("/api/search", get(handle_search))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Bind to `[server].bind` and serve until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(AppState::new(config.clone()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "folio server listening");
    println!("Folio server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

fn internal(err: anyhow::Error) -> AppError {
    error!("request failed: {:#}", err);
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal",
        message: format!("{:#}", err),
    }
}

/// Lookup misses surface as `not_found`; everything else is a server fault.
fn classify_error(err: anyhow::Error) -> AppError {
    let msg = err.to_string();
    if msg.contains("not found") {
        not_found(msg)
    } else {
        internal(err)
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/blog ============

#[derive(Serialize)]
struct PostListResponse {
    posts: Vec<BlogPostSummary>,
}

async fn handle_list_posts(
    State(state): State<AppState>,
) -> Result<Json<PostListResponse>, AppError> {
    let posts = blog::list_posts(&state.config).await.map_err(internal)?;
    Ok(Json(PostListResponse { posts }))
}

// ============ GET /api/blog/{slug} ============

async fn handle_get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    blog::get_post(&state.config, &slug)
        .await
        .map(Json)
        .map_err(classify_error)
}

// ============ GET /api/search ============

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    results: Vec<ScoredResult>,
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    if params.limit == Some(0) {
        return Err(bad_request("limit must be >= 1"));
    }
    if params.q.trim().is_empty() {
        return Ok(Json(SearchResponse {
            query: params.q,
            results: Vec::new(),
        }));
    }

    let catalog = site::load_catalog(&state.config.content.site).map_err(internal)?;
    let source = LocalBlogSource::new(state.config.as_ref().clone());
    let candidates = collect_candidates(&catalog, Some(&source as &dyn BlogSource)).await;

    let results = search(
        &params.q,
        &candidates,
        &search_options(&state.config, params.limit),
    );
    Ok(Json(SearchResponse {
        query: params.q,
        results,
    }))
}
