//! Predictor server lifecycle: bind, spawn the axum server in a background
//! task, and return a handle with session metadata and a shutdown channel.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::router::{predictor_router, ServiceContext};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind predictor server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
}

/// Session metadata for a running predictor server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSession {
    pub session_id: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running predictor server.
pub struct PredictorServer {
    pub session: ServerSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PredictorServer {
    /// Signal graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Predictor server shutdown signal sent");
        }
    }

    /// Signal shutdown and wait for in-flight requests to drain.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Predictor server task failed: {e}");
            }
        }
    }
}

/// Start the predictor server on `addr`. Port 0 picks an ephemeral port;
/// the bound address is reported in the session.
pub async fn start_predictor_server(
    ctx: ServiceContext,
    addr: SocketAddr,
) -> Result<PredictorServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let bound = listener
        .local_addr()
        .map_err(|source| ServerError::Bind { addr, source })?;

    let app = predictor_router(ctx);

    let session = ServerSession {
        session_id: Uuid::new_v4().to_string(),
        server_addr: bound.to_string(),
        port: bound.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Predictor server received shutdown signal");
        };

        tracing::info!(addr = %bound, "Predictor server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Predictor server error: {e}");
        }

        tracing::info!("Predictor server stopped");
    });

    Ok(PredictorServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::config::EngineConfig;
    use crate::engine::DiagnosisEngine;
    use crate::knowledge::KnowledgeBase;
    use crate::predictor::{predict_with_timeout, HttpPredictor};
    use crate::service::guide::SymptomGuide;

    fn test_context() -> ServiceContext {
        let kb = Arc::new(KnowledgeBase::load_test());
        let engine = DiagnosisEngine::from_config(kb, &EngineConfig::default()).unwrap();
        ServiceContext::new(engine, SymptomGuide::load_test())
    }

    fn localhost() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let server = start_predictor_server(test_context(), localhost())
            .await
            .expect("server should start");

        assert!(!server.session.session_id.is_empty());
        assert!(server.session.port > 0);
        assert!(!server.session.started_at.is_empty());

        server.stop().await;
    }

    #[tokio::test]
    async fn serves_health_over_http() {
        let mut server = start_predictor_server(test_context(), localhost())
            .await
            .unwrap();

        let url = format!("http://127.0.0.1:{}/health", server.session.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "ok");

        server.shutdown();
    }

    #[tokio::test]
    async fn http_predictor_talks_to_own_server() {
        let server = start_predictor_server(test_context(), localhost())
            .await
            .unwrap();

        let client = HttpPredictor::new(
            &format!("http://{}", server.session.server_addr),
            Duration::from_secs(1),
        )
        .unwrap();
        let result = predict_with_timeout(
            &client,
            vec!["Seizures".into(), "Speech Delay".into()],
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(result.matches[0].id, "Dravet Syndrome");
        assert!(!result.treatments.is_empty());

        server.stop().await;
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_predictor_server(test_context(), localhost())
            .await
            .unwrap();
        server.shutdown();
        server.shutdown();
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let err = start_predictor_server(test_context(), addr).await.err().unwrap();
        assert!(matches!(err, ServerError::Bind { .. }));
    }
}
