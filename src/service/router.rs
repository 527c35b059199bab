//! Predictor service router.
//!
//! Routes:
//! - `POST /predict`  ranked syndromes from the symptom guide (predictor wire contract)
//! - `POST /diagnose` local subset matching against the knowledge base
//! - `GET  /health`   liveness plus loaded record counts

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::guide::SymptomGuide;
use crate::engine::DiagnosisEngine;
use crate::models::DiagnosisResult;
use crate::predictor::{PredictRequest, PredictResponse};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct ServiceContext {
    pub engine: Arc<DiagnosisEngine>,
    pub guide: Arc<SymptomGuide>,
}

impl ServiceContext {
    pub fn new(engine: DiagnosisEngine, guide: SymptomGuide) -> Self {
        Self {
            engine: Arc::new(engine),
            guide: Arc::new(guide),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DiagnoseRequest {
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub records: usize,
    pub guide_rows: usize,
}

pub fn predictor_router(ctx: ServiceContext) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/diagnose", post(diagnose))
        .route("/health", get(health))
        .with_state(ctx)
}

async fn predict(
    State(ctx): State<ServiceContext>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = body?;
    let response = ctx.guide.predict(&request.symptoms);
    tracing::debug!(
        symptoms = request.symptoms.len(),
        syndromes = response.syndromes.len(),
        "Predict served"
    );
    Ok(Json(response))
}

async fn diagnose(
    State(ctx): State<ServiceContext>,
    body: Result<Json<DiagnoseRequest>, JsonRejection>,
) -> Result<Json<DiagnosisResult>, ApiError> {
    let Json(request) = body?;
    let limit = request.limit.unwrap_or_else(|| ctx.engine.result_limit());
    let result = ctx.engine.match_local_with_limit(&request.symptoms, limit)?;
    Ok(Json(result))
}

async fn health(State(ctx): State<ServiceContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        records: ctx.engine.knowledge_base().len(),
        guide_rows: ctx.guide.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::EngineConfig;
    use crate::knowledge::KnowledgeBase;

    fn test_context(kb: KnowledgeBase) -> ServiceContext {
        let config = EngineConfig {
            closed_vocabulary: true,
            ..EngineConfig::default()
        };
        let engine = DiagnosisEngine::from_config(Arc::new(kb), &config).unwrap();
        ServiceContext::new(engine, SymptomGuide::load_test())
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_reports_counts() {
        let app = predictor_router(test_context(KnowledgeBase::load_test()));
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["records"], 5);
        assert_eq!(json["guide_rows"], 8);
    }

    #[tokio::test]
    async fn predict_follows_wire_contract() {
        let app = predictor_router(test_context(KnowledgeBase::load_test()));
        let req = json_request("/predict", r#"{"symptoms": ["Seizures", "Speech Delay"]}"#);
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["syndromes"][0], "Dravet Syndrome");
        assert!(json["treatments"].is_array());
        assert_eq!(json["treatments"][0]["Medications"], "Valproate, Clobazam");
        // Blank cells are omitted, not sent as empty strings
        assert!(json["treatments"][0].get("Therapies").is_none());
    }

    #[tokio::test]
    async fn predict_with_no_matching_rows_is_empty() {
        let app = predictor_router(test_context(KnowledgeBase::load_test()));
        let req = json_request("/predict", r#"{"symptoms": []}"#);
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["syndromes"], serde_json::json!([]));
        assert_eq!(json["treatments"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn predict_malformed_body_is_bad_request() {
        let app = predictor_router(test_context(KnowledgeBase::load_test()));
        let req = json_request("/predict", r#"{"symptoms": "Seizures"}"#);
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn diagnose_ranks_local_matches() {
        let app = predictor_router(test_context(KnowledgeBase::load_test()));
        let req = json_request("/diagnose", r#"{"symptoms": ["seizures", "speech delay"]}"#);
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["source"], "local");
        assert_eq!(json["matches"][0]["id"], "epilepsy-speech");
        assert_eq!(json["matches"][0]["strength"]["kind"], "exact");
        assert_eq!(
            json["matches"].as_array().unwrap().len(),
            json["treatments"].as_array().unwrap().len()
        );
    }

    #[tokio::test]
    async fn diagnose_honors_limit() {
        let app = predictor_router(test_context(KnowledgeBase::load_test()));
        let req = json_request("/diagnose", r#"{"symptoms": ["Seizures"], "limit": 1}"#);
        let response = app.oneshot(req).await.unwrap();

        let json = response_json(response).await;
        assert_eq!(json["matches"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn diagnose_empty_query_is_400() {
        let app = predictor_router(test_context(KnowledgeBase::load_test()));
        let req = json_request("/diagnose", r#"{"symptoms": []}"#);
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_QUERY");
    }

    #[tokio::test]
    async fn diagnose_unknown_symptom_is_422() {
        let app = predictor_router(test_context(KnowledgeBase::load_test()));
        let req = json_request("/diagnose", r#"{"symptoms": ["Levitation"]}"#);
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "UNKNOWN_SYMPTOM");
    }

    #[tokio::test]
    async fn diagnose_against_empty_knowledge_base_is_503() {
        let app = predictor_router(test_context(KnowledgeBase::default()));
        let req = json_request("/diagnose", r#"{"symptoms": ["Seizures"]}"#);
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = predictor_router(test_context(KnowledgeBase::load_test()));
        let req = Request::builder().uri("/nonexistent").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
