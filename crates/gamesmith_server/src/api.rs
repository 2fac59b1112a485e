//! HTTP routes.
//!
//! | Method | Path          | Answer                                          |
//! |--------|---------------|-------------------------------------------------|
//! | POST   | `/games`      | `{ id, play_url, message }` or an error body    |
//! | GET    | `/games/{id}` | the stored HTML document, or 404                |
//! | GET    | `/health`     | `{ "status": "ok" }`                            |
//! | GET    | `/`           | the configured frontend page, if any            |

use crate::response::{ApiError, GenerateGameRequest, GenerateGameResponse};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use gamesmith_core::{FailureKind, GenerationStatus};
use gamesmith_pipeline::Orchestrator;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Games never change once stored.
const IMMUTABLE: &str = "public, max-age=31536000, immutable";

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Shared state of every handler.
#[derive(Debug, Clone)]
pub struct ApiState {
    orchestrator: Arc<Orchestrator>,
    frontend_index: Option<PathBuf>,
}

impl ApiState {
    /// State serving games through `orchestrator`.
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            frontend_index: None,
        }
    }

    /// Serve the page at `path` on `/`.
    pub fn with_frontend_index(mut self, path: Option<PathBuf>) -> Self {
        self.frontend_index = path;
        self
    }
}

/// Creates the application router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(frontend))
        .route("/health", get(health_check))
        .route("/games", post(generate_game))
        .route("/games/{id}", get(play_game))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn frontend(State(state): State<ApiState>) -> Response {
    let Some(path) = &state.frontend_index else {
        return ApiError::not_found().into_response();
    };
    match tokio::fs::read_to_string(path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Frontend page unavailable");
            ApiError::not_found().into_response()
        }
    }
}

/// Generate a game from `{ "prompt": ... }`.
async fn generate_game(
    State(state): State<ApiState>,
    payload: Result<Json<GenerateGameRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected generate request body");
            return ApiError::bad_request(rejection.body_text()).into_response();
        }
    };

    let result = state.orchestrator.handle_generate(&request.prompt).await;

    if let GenerationStatus::Failed { kind, reason } = result.status() {
        return ApiError::from_failure(*kind, reason.clone()).into_response();
    }

    match *result.identifier() {
        Some(id) => Json(GenerateGameResponse {
            id: id.to_string(),
            play_url: format!("/games/{}", id),
            message: "Game generated successfully!".to_string(),
        })
        .into_response(),
        None => {
            tracing::error!("Successful generation without identifier");
            ApiError::from_failure(
                FailureKind::StorageFailure,
                "The generated game could not be saved",
            )
            .into_response()
        }
    }
}

/// Serve a stored game.
async fn play_game(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let content = match state.orchestrator.handle_play(&id).await {
        Ok(content) => content,
        Err(e) if e.is_not_found() => return ApiError::not_found().into_response(),
        Err(_) => return ApiError::internal("The game could not be loaded").into_response(),
    };

    let etag = etag_for(content.as_bytes());
    let mut response_headers = HeaderMap::new();
    response_headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(IMMUTABLE));
    if let Ok(value) = HeaderValue::from_str(&etag) {
        response_headers.insert(header::ETAG, value);
    }

    if matches_if_none_match(&headers, &etag) {
        return (StatusCode::NOT_MODIFIED, response_headers).into_response();
    }

    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(HTML_CONTENT_TYPE),
    );
    (StatusCode::OK, response_headers, content.into_bytes()).into_response()
}

/// Strong entity tag: quoted hex SHA-256 of the body.
pub fn etag_for(body: &[u8]) -> String {
    format!("\"{:x}\"", Sha256::digest(body))
}

/// True if any tag listed in `If-None-Match` matches `etag`.
fn matches_if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .any(|tag| tag == "*" || tag == etag || tag.strip_prefix("W/") == Some(etag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_is_quoted_sha256() {
        let tag = etag_for(b"");
        assert_eq!(
            tag,
            "\"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\""
        );
    }

    #[test]
    fn test_if_none_match_variants() {
        let etag = etag_for(b"<html></html>");
        let check = |value: &str| {
            let mut headers = HeaderMap::new();
            headers.insert(header::IF_NONE_MATCH, HeaderValue::from_str(value).unwrap());
            matches_if_none_match(&headers, &etag)
        };

        assert!(check(&etag));
        assert!(check(&format!("W/{}", etag)));
        assert!(check(&format!("\"other\", {}", etag)));
        assert!(check("*"));
        assert!(!check("\"other\""));
        assert!(!matches_if_none_match(&HeaderMap::new(), &etag));
    }
}
