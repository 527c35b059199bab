//! External predictor client: a boundary adapter around a remote ranked
//! predictor service. It owns no ranking logic. The response is checked
//! against the wire schema and mapped all-or-nothing.

pub mod client;
pub mod wire;

pub use client::HttpPredictor;
pub use wire::{PredictRequest, PredictResponse, WireTreatment};

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::EngineError;
use crate::models::DiagnosisResult;

/// Transport to a predictor service (allows mocking).
pub trait Predictor: Send + Sync {
    fn predict(
        &self,
        request: &PredictRequest,
    ) -> impl Future<Output = Result<PredictResponse, EngineError>> + Send;
}

/// Call the predictor with a caller-supplied deadline.
///
/// On expiry the in-flight call is dropped, which cancels the underlying
/// request, and `PredictorTimeout` is returned. No retries.
pub async fn predict_with_timeout<P: Predictor>(
    predictor: &P,
    symptoms: Vec<String>,
    timeout: Duration,
) -> Result<DiagnosisResult, EngineError> {
    let request = PredictRequest { symptoms };

    let response = match tokio::time::timeout(timeout, predictor.predict(&request)).await {
        Ok(response) => response?,
        Err(_) => {
            tracing::warn!(
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                "Predictor call timed out"
            );
            return Err(EngineError::PredictorTimeout(timeout));
        }
    };

    response.into_result()
}

/// Mock predictor for testing. Returns a configured response after an
/// optional delay, or a configured failure. Remembers the last request.
pub struct MockPredictor {
    response: Result<PredictResponse, String>,
    delay: Duration,
    last_request: Mutex<Option<PredictRequest>>,
}

impl MockPredictor {
    pub fn new(response: PredictResponse) -> Self {
        Self {
            response: Ok(response),
            delay: Duration::ZERO,
            last_request: Mutex::new(None),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            response: Err(reason.to_string()),
            delay: Duration::ZERO,
            last_request: Mutex::new(None),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn last_request(&self) -> Option<PredictRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

impl Predictor for MockPredictor {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, EngineError> {
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response
            .clone()
            .map_err(EngineError::PredictorUnavailable)
    }
}
