use std::fmt;

use serde::{Deserialize, Serialize};

use super::symptom::SymptomSet;
use crate::error::EngineError;

/// A validated diagnostic query. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosisQuery {
    symptoms: SymptomSet,
}

impl DiagnosisQuery {
    pub fn new(symptoms: SymptomSet) -> Result<Self, EngineError> {
        if symptoms.is_empty() {
            return Err(EngineError::InvalidQuery(
                "at least one symptom is required".into(),
            ));
        }
        Ok(Self { symptoms })
    }

    pub fn symptoms(&self) -> &SymptomSet {
        &self.symptoms
    }
}

/// How strongly a match is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchStrength {
    /// Record symptom set equals the query.
    Exact,
    /// Record has `extraneous` symptoms beyond the query.
    Partial { extraneous: usize },
    /// Position assigned by the remote predictor (1-based).
    Ranked { rank: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub id: String,
    pub display_name: String,
    pub strength: MatchStrength,
}

/// One column of a treatment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum TreatmentCell {
    Listed(Vec<String>),
    Unspecified,
}

impl TreatmentCell {
    /// Missing and empty columns both become `Unspecified`.
    pub fn from_column(column: Option<&Vec<String>>) -> Self {
        match column {
            Some(items) if !items.is_empty() => Self::Listed(items.clone()),
            _ => Self::Unspecified,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unspecified)
    }
}

impl fmt::Display for TreatmentCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listed(items) => f.write_str(&items.join(", ")),
            Self::Unspecified => f.write_str("-"),
        }
    }
}

/// One row of the treatment table. `disease_id` is `None` when the
/// source (the remote predictor) does not tie treatments to a syndrome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentRow {
    pub disease_id: Option<String>,
    pub medications: TreatmentCell,
    pub therapies: TreatmentCell,
    pub assistive_tools: TreatmentCell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Local,
    Remote,
}

/// Unified result of both the local matcher and the remote predictor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub matches: Vec<MatchEntry>,
    pub treatments: Vec<TreatmentRow>,
    pub source: ResultSource,
}

impl DiagnosisResult {
    pub fn empty(source: ResultSource) -> Self {
        Self {
            matches: Vec::new(),
            treatments: Vec::new(),
            source,
        }
    }

    /// "No matching diagnosis".
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn match_ids(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.id.as_str()).collect()
    }
}
