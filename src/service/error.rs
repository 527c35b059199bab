//! Service error types with structured JSON responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{EngineError, FailureKind};

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// Service-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(e) => match e {
                EngineError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
                EngineError::UnknownSymptom(_) => StatusCode::UNPROCESSABLE_ENTITY,
                EngineError::EmptyKnowledgeBase => StatusCode::SERVICE_UNAVAILABLE,
                EngineError::PredictorUnavailable(_) => StatusCode::BAD_GATEWAY,
                EngineError::PredictorTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
                EngineError::KnowledgeBaseLoad(..)
                | EngineError::KnowledgeBaseParse(..)
                | EngineError::DuplicateRecordId(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            ApiError::BadRequest(detail) => ("BAD_REQUEST", detail.clone()),
            ApiError::Engine(e) if e.kind() == FailureKind::KnowledgeBase => {
                tracing::error!(error = %e, "Service internal error");
                (e.kind().as_str(), "An internal error occurred".to_string())
            }
            ApiError::Engine(e) => (e.kind().as_str(), e.to_string()),
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::time::Duration;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn invalid_query_returns_400() {
        let response = ApiError::from(EngineError::InvalidQuery("empty".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_QUERY");
    }

    #[tokio::test]
    async fn unknown_symptom_returns_422_with_token() {
        let response = ApiError::from(EngineError::UnknownSymptom("Levitation".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "UNKNOWN_SYMPTOM");
        assert!(json["error"]["message"].as_str().unwrap().contains("Levitation"));
    }

    #[tokio::test]
    async fn empty_knowledge_base_returns_503() {
        let response = ApiError::from(EngineError::EmptyKnowledgeBase).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn predictor_failures_map_to_gateway_statuses() {
        let unavailable = ApiError::from(EngineError::PredictorUnavailable("down".into()));
        assert_eq!(unavailable.status(), StatusCode::BAD_GATEWAY);
        let timeout = ApiError::from(EngineError::PredictorTimeout(Duration::from_secs(1)));
        assert_eq!(timeout.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn knowledge_base_errors_hide_details() {
        let err = EngineError::KnowledgeBaseLoad("/secret/kb.json".into(), "denied".into());
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn bad_request_returns_400() {
        let response = ApiError::BadRequest("missing field".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }
}
