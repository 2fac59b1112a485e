//! Wire types and error responses of the HTTP API.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use gamesmith_core::FailureKind;
use serde::{Deserialize, Serialize};

/// Body of `POST /games`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerateGameRequest {
    /// Free-text description of the game
    pub prompt: String,
}

/// Successful answer to `POST /games`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerateGameResponse {
    /// Identifier of the stored game
    pub id: String,
    /// Relative URL that serves the game
    pub play_url: String,
    /// Human-readable confirmation
    pub message: String,
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorBody {
    /// Human-readable reason
    pub error: String,
    /// Stable machine-readable classification
    pub kind: String,
    /// Whether resubmitting the same request may succeed
    pub retryable: bool,
}

/// HTTP status for a failed generation.
///
/// Caller mistakes are 4xx; backend trouble stays in the 502/503 family so
/// clients can tell "fix your prompt" from "try again later".
pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::InvalidPrompt => StatusCode::BAD_REQUEST,
        FailureKind::Unavailable => StatusCode::BAD_GATEWAY,
        FailureKind::Timeout => StatusCode::SERVICE_UNAVAILABLE,
        FailureKind::QuotaExceeded => StatusCode::SERVICE_UNAVAILABLE,
        FailureKind::MalformedResponse => StatusCode::UNPROCESSABLE_ENTITY,
        FailureKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// An error answer with its status and optional `Retry-After`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
    retry_after_secs: Option<u64>,
}

impl ApiError {
    /// Answer for a failed generation.
    pub fn from_failure(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            status: status_for(kind),
            body: ErrorBody {
                error: reason.into(),
                kind: kind.to_string(),
                retryable: kind.is_retryable(),
            },
            retry_after_secs: kind.retry_after_secs(),
        }
    }

    /// 400 for a body that is not `{ "prompt": string }`.
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::from_failure(FailureKind::InvalidPrompt, reason)
    }

    /// 404 for an unknown game.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody {
                error: "Game not found".to_string(),
                kind: "not_found".to_string(),
                retryable: false,
            },
            retry_after_secs: None,
        }
    }

    /// 500 for a store that cannot be read.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: reason.into(),
                kind: "internal".to_string(),
                retryable: true,
            },
            retry_after_secs: None,
        }
    }

    /// Status code of this answer.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Body of this answer.
    pub fn body(&self) -> &ErrorBody {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        if let Some(secs) = self.retry_after_secs {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(FailureKind::InvalidPrompt), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(FailureKind::Unavailable), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(FailureKind::Timeout), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_for(FailureKind::QuotaExceeded),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(FailureKind::MalformedResponse),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_quota_sets_retry_after() {
        let response = ApiError::from_failure(FailureKind::QuotaExceeded, "slow down").into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::RETRY_AFTER], "60");
    }

    #[test]
    fn test_invalid_prompt_has_no_retry_after() {
        let response = ApiError::bad_request("empty").into_response();
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }
}
