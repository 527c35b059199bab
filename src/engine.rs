//! Engine facade: validates input, runs the local matcher or the remote
//! predictor, and returns the shared `DiagnosisResult` shape.
//!
//! Each call walks its own request through `Idle → Querying → Resolved |
//! Failed`. The engine holds no per-call state and caches nothing, so
//! concurrent calls are independent.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::config::{EngineConfig, DEFAULT_PREDICTOR_TIMEOUT_SECS};
use crate::error::{EngineError, FailureKind};
use crate::knowledge::KnowledgeBase;
use crate::matcher::match_records;
use crate::models::{DiagnosisQuery, DiagnosisResult};
use crate::predictor::{predict_with_timeout, HttpPredictor, Predictor};
use crate::recommender::recommend;
use crate::vocabulary::SymptomVocabulary;

// ═══════════════════════════════════════════════════════════
// Request state machine
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QueryState {
    Idle,
    Querying,
    Resolved,
    Failed { kind: FailureKind },
}

impl QueryState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Failed { .. })
    }
}

/// One "get a diagnosis" request.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisRequest {
    pub id: Uuid,
    pub strategy: Strategy,
    state: QueryState,
    started_at: Option<String>,
}

impl DiagnosisRequest {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            id: Uuid::new_v4(),
            strategy,
            state: QueryState::Idle,
            started_at: None,
        }
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    pub fn started_at(&self) -> Option<&str> {
        self.started_at.as_deref()
    }

    /// Idle → Querying. Returns false (no change) from any other state.
    pub fn begin(&mut self) -> bool {
        if self.state != QueryState::Idle {
            return false;
        }
        self.state = QueryState::Querying;
        self.started_at = Some(chrono::Utc::now().to_rfc3339());
        tracing::debug!(request_id = %self.id, strategy = ?self.strategy, "Diagnosis querying");
        true
    }

    /// Querying → Resolved | Failed. Returns false from any other state.
    pub fn finish(&mut self, outcome: &Result<DiagnosisResult, EngineError>) -> bool {
        if self.state != QueryState::Querying {
            return false;
        }
        match outcome {
            Ok(result) => {
                self.state = QueryState::Resolved;
                tracing::info!(
                    request_id = %self.id,
                    strategy = ?self.strategy,
                    matches = result.matches.len(),
                    "Diagnosis resolved"
                );
            }
            Err(e) => {
                self.state = QueryState::Failed { kind: e.kind() };
                tracing::info!(
                    request_id = %self.id,
                    strategy = ?self.strategy,
                    error = %e,
                    "Diagnosis failed"
                );
            }
        }
        true
    }
}

// ═══════════════════════════════════════════════════════════
// DiagnosisEngine
// ═══════════════════════════════════════════════════════════

pub struct DiagnosisEngine<P = HttpPredictor> {
    kb: Arc<KnowledgeBase>,
    vocabulary: SymptomVocabulary,
    predictor: P,
    result_limit: usize,
    predictor_timeout: Duration,
}

impl DiagnosisEngine<HttpPredictor> {
    /// Engine talking to the configured predictor URL.
    pub fn from_config(kb: Arc<KnowledgeBase>, config: &EngineConfig) -> Result<Self, EngineError> {
        let predictor = HttpPredictor::from_config(config)?;
        Ok(Self::with_predictor(kb, config, predictor))
    }
}

impl<P: Predictor> DiagnosisEngine<P> {
    pub fn new(
        kb: Arc<KnowledgeBase>,
        vocabulary: SymptomVocabulary,
        predictor: P,
        result_limit: usize,
    ) -> Self {
        Self {
            kb,
            vocabulary,
            predictor,
            result_limit,
            predictor_timeout: Duration::from_secs(DEFAULT_PREDICTOR_TIMEOUT_SECS),
        }
    }

    /// Engine with the built-in vocabulary extended by the knowledge base
    /// symptoms. Limit and predictor deadline come from `config`.
    pub fn with_predictor(kb: Arc<KnowledgeBase>, config: &EngineConfig, predictor: P) -> Self {
        let mut vocabulary = SymptomVocabulary::builtin(config.closed_vocabulary);
        vocabulary.extend_from_knowledge_base(&kb);
        Self::new(kb, vocabulary, predictor, config.result_limit)
            .with_predictor_timeout(config.predictor_timeout)
    }

    pub fn with_predictor_timeout(mut self, timeout: Duration) -> Self {
        self.predictor_timeout = timeout;
        self
    }

    pub fn predictor_timeout(&self) -> Duration {
        self.predictor_timeout
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn vocabulary(&self) -> &SymptomVocabulary {
        &self.vocabulary
    }

    pub fn result_limit(&self) -> usize {
        self.result_limit
    }

    /// Validate raw symptom strings into a non-empty query.
    pub fn query<S: AsRef<str>>(&self, symptoms: &[S]) -> Result<DiagnosisQuery, EngineError> {
        DiagnosisQuery::new(self.vocabulary.validate(symptoms)?)
    }

    pub fn match_local<S: AsRef<str>>(&self, symptoms: &[S]) -> Result<DiagnosisResult, EngineError> {
        self.match_local_with_limit(symptoms, self.result_limit)
    }

    pub fn match_local_with_limit<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        limit: usize,
    ) -> Result<DiagnosisResult, EngineError> {
        let mut request = DiagnosisRequest::new(Strategy::Local);
        request.begin();

        let outcome = self.query(symptoms).and_then(|query| {
            let matches = match_records(query.symptoms(), &self.kb)?;
            Ok(recommend(&matches, limit))
        });

        request.finish(&outcome);
        outcome
    }

    /// Delegate to the remote predictor, bounded by the configured deadline.
    pub async fn predict_remote_default<S: AsRef<str>>(
        &self,
        symptoms: &[S],
    ) -> Result<DiagnosisResult, EngineError> {
        self.predict_remote(symptoms, self.predictor_timeout).await
    }

    /// Delegate to the remote predictor, bounded by `timeout`.
    pub async fn predict_remote<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        timeout: Duration,
    ) -> Result<DiagnosisResult, EngineError> {
        let mut request = DiagnosisRequest::new(Strategy::Remote);
        request.begin();

        let outcome = match self.query(symptoms) {
            Ok(query) => {
                let labels = query
                    .symptoms()
                    .iter()
                    .map(|s| self.vocabulary.wire_label(s))
                    .collect();
                predict_with_timeout(&self.predictor, labels, timeout).await
            }
            Err(e) => Err(e),
        };

        request.finish(&outcome);
        outcome
    }
}
