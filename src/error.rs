//! Engine error taxonomy.
//!
//! Every failure the engine can produce is a typed, caller-recoverable
//! value. Nothing here is fatal to the process: callers render these as
//! user-facing messages and decide whether to re-prompt or retry.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unknown symptom: {0}")]
    UnknownSymptom(String),

    #[error("Knowledge base is empty")]
    EmptyKnowledgeBase,

    #[error("Predictor unavailable: {0}")]
    PredictorUnavailable(String),

    #[error("Predictor did not answer within {}ms", .0.as_millis())]
    PredictorTimeout(Duration),

    #[error("Knowledge base load failed ({0}): {1}")]
    KnowledgeBaseLoad(String, String),

    #[error("Knowledge base parse failed ({0}): {1}")]
    KnowledgeBaseParse(String, String),

    #[error("Duplicate disease record id: {0}")]
    DuplicateRecordId(String),
}

/// Stable failure code, used by the HTTP layer and by the query state
/// machine to record why a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidQuery,
    UnknownSymptom,
    EmptyKnowledgeBase,
    PredictorUnavailable,
    PredictorTimeout,
    KnowledgeBase,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidQuery => "INVALID_QUERY",
            Self::UnknownSymptom => "UNKNOWN_SYMPTOM",
            Self::EmptyKnowledgeBase => "EMPTY_KNOWLEDGE_BASE",
            Self::PredictorUnavailable => "PREDICTOR_UNAVAILABLE",
            Self::PredictorTimeout => "PREDICTOR_TIMEOUT",
            Self::KnowledgeBase => "KNOWLEDGE_BASE",
        }
    }
}

impl EngineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidQuery(_) => FailureKind::InvalidQuery,
            Self::UnknownSymptom(_) => FailureKind::UnknownSymptom,
            Self::EmptyKnowledgeBase => FailureKind::EmptyKnowledgeBase,
            Self::PredictorUnavailable(_) => FailureKind::PredictorUnavailable,
            Self::PredictorTimeout(_) => FailureKind::PredictorTimeout,
            Self::KnowledgeBaseLoad(..)
            | Self::KnowledgeBaseParse(..)
            | Self::DuplicateRecordId(_) => FailureKind::KnowledgeBase,
        }
    }

    /// Only failures at the predictor boundary are worth retrying.
    /// The engine itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::PredictorUnavailable(_) | Self::PredictorTimeout(_)
        )
    }
}
