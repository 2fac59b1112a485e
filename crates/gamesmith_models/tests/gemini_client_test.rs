//! GeminiClient tests against a local mock of the REST API.
//!
//! No real API calls: each test starts an axum server on an ephemeral port
//! that plays the part of `generativelanguage.googleapis.com`.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use gamesmith_core::normalize;
use gamesmith_error::GatewayErrorKind;
use gamesmith_interface::GameGenerator;
use gamesmith_models::{GeminiClient, GeminiConfigBuilder};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
struct Captured {
    path: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: Value,
    delay: Duration,
    captured: Arc<Mutex<Option<Captured>>>,
}

async fn mock_handler(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    *state.captured.lock().unwrap() = Some(Captured {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    tokio::time::sleep(state.delay).await;
    (state.status, Json(state.body.clone())).into_response()
}

async fn spawn_mock(state: MockState) -> anyhow::Result<String> {
    let app = Router::new().fallback(mock_handler).with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{}", addr))
}

fn mock(status: StatusCode, body: Value) -> MockState {
    MockState {
        status,
        body,
        delay: Duration::ZERO,
        captured: Arc::new(Mutex::new(None)),
    }
}

fn client(base_url: String, timeout: Duration) -> anyhow::Result<GeminiClient> {
    let config = GeminiConfigBuilder::default()
        .api_key("test-key")
        .model("gemini-test")
        .base_url(base_url)
        .timeout(timeout)
        .build()?;
    Ok(GeminiClient::new(config)?)
}

fn success_body(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_returns_text_verbatim() -> anyhow::Result<()> {
    let raw_text = "Sure! ```html\n<!DOCTYPE html><html></html>\n```";
    let state = mock(StatusCode::OK, success_body(raw_text));
    let captured = state.captured.clone();
    let base = spawn_mock(state).await?;

    let client = client(base, Duration::from_secs(5))?;
    let prompt = normalize("A typing game with farm animals")?;
    let raw = client.generate(&prompt).await?;

    assert_eq!(raw.text(), raw_text);

    let seen = captured.lock().unwrap().clone().expect("request captured");
    assert_eq!(seen.path, "/v1beta/models/gemini-test:generateContent");
    assert_eq!(seen.api_key.as_deref(), Some("test-key"));
    assert_eq!(
        seen.body["contents"][0]["parts"][0]["text"],
        "Create an educational game: A typing game with farm animals"
    );
    assert!(
        seen.body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .contains("self-contained HTML")
    );
    Ok(())
}

#[tokio::test]
async fn test_rate_limit_is_quota_exceeded() -> anyhow::Result<()> {
    let body = json!({
        "error": {
            "code": 429,
            "message": "Resource has been exhausted (e.g. check quota).",
            "status": "RESOURCE_EXHAUSTED"
        }
    });
    let base = spawn_mock(mock(StatusCode::TOO_MANY_REQUESTS, body)).await?;

    let client = client(base, Duration::from_secs(5))?;
    let err = client
        .generate(&normalize("A geography quiz about rivers")?)
        .await
        .unwrap_err();

    assert!(matches!(err.kind, GatewayErrorKind::QuotaExceeded(_)));
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_unavailable() -> anyhow::Result<()> {
    let body = json!({ "error": { "code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE" } });
    let base = spawn_mock(mock(StatusCode::SERVICE_UNAVAILABLE, body)).await?;

    let client = client(base, Duration::from_secs(5))?;
    let err = client
        .generate(&normalize("A geography quiz about rivers")?)
        .await
        .unwrap_err();

    assert_eq!(
        err.kind,
        GatewayErrorKind::Unavailable("HTTP 503: The model is overloaded.".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_slow_backend_times_out() -> anyhow::Result<()> {
    let mut state = mock(StatusCode::OK, success_body("<html></html>"));
    state.delay = Duration::from_secs(10);
    let base = spawn_mock(state).await?;

    let client = client(base, Duration::from_millis(200))?;
    let started = std::time::Instant::now();
    let err = client
        .generate(&normalize("A geography quiz about rivers")?)
        .await
        .unwrap_err();

    assert_eq!(err.kind, GatewayErrorKind::Timeout(200));
    assert!(started.elapsed() < Duration::from_secs(5));
    Ok(())
}

#[tokio::test]
async fn test_missing_candidates_is_malformed() -> anyhow::Result<()> {
    let base = spawn_mock(mock(StatusCode::OK, json!({ "candidates": [] }))).await?;

    let client = client(base, Duration::from_secs(5))?;
    let err = client
        .generate(&normalize("A geography quiz about rivers")?)
        .await
        .unwrap_err();

    assert!(matches!(err.kind, GatewayErrorKind::MalformedResponse(_)));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_backend_is_unavailable() -> anyhow::Result<()> {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = client(format!("http://{}", addr), Duration::from_secs(5))?;
    let err = client
        .generate(&normalize("A geography quiz about rivers")?)
        .await
        .unwrap_err();

    assert!(matches!(err.kind, GatewayErrorKind::Unavailable(_)));
    Ok(())
}
