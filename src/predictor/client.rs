use std::time::Duration;

use super::wire::{PredictRequest, PredictResponse};
use super::Predictor;
use crate::config::EngineConfig;
use crate::error::EngineError;

/// HTTP client for the remote predictor service.
///
/// Only a connect timeout is set here. The overall deadline is supplied
/// per call by the caller (see `predict_with_timeout`).
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPredictor {
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| EngineError::PredictorUnavailable(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        Self::new(&config.predictor_url, config.connect_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Predictor for HttpPredictor {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, EngineError> {
        let url = format!("{}/predict", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    EngineError::PredictorUnavailable(format!(
                        "predictor is not running at {}",
                        self.base_url
                    ))
                } else {
                    EngineError::PredictorUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::PredictorUnavailable(format!(
                "predictor returned status {}: {body}",
                status.as_u16()
            )));
        }

        response
            .json::<PredictResponse>()
            .await
            .map_err(|e| EngineError::PredictorUnavailable(format!("malformed response: {e}")))
    }
}
