//! Wire types of the predictor service. Field names match the service
//! contract exactly (`Medications`, `Therapies`, `Assistive_Tools`).

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{
    DiagnosisResult, MatchEntry, MatchStrength, ResultSource, TreatmentRecord,
};
use crate::recommender::treatment_row;

/// Request body for POST /predict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub symptoms: Vec<String>,
}

/// Response body from POST /predict
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub syndromes: Vec<String>,
    pub treatments: Vec<WireTreatment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireTreatment {
    #[serde(rename = "Medications", default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<String>,
    #[serde(rename = "Therapies", default, skip_serializing_if = "Option::is_none")]
    pub therapies: Option<String>,
    #[serde(rename = "Assistive_Tools", default, skip_serializing_if = "Option::is_none")]
    pub assistive_tools: Option<String>,
}

impl WireTreatment {
    fn to_record(&self) -> TreatmentRecord {
        let column = |cell: &Option<String>| cell.as_deref().map(TreatmentRecord::split_cell);
        TreatmentRecord {
            medications: column(&self.medications),
            therapies: column(&self.therapies),
            assistive_tools: column(&self.assistive_tools),
        }
    }
}

impl PredictResponse {
    /// Map a service response into the shared result shape.
    ///
    /// All-or-nothing: any blank syndrome name rejects the whole response.
    /// Syndrome order is kept as the rank; treatments map 1:1 in order.
    pub fn into_result(self) -> Result<DiagnosisResult, EngineError> {
        if let Some(pos) = self.syndromes.iter().position(|s| s.trim().is_empty()) {
            return Err(EngineError::PredictorUnavailable(format!(
                "malformed response: blank syndrome at position {pos}"
            )));
        }

        let matches = self
            .syndromes
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let name = name.trim().to_string();
                MatchEntry {
                    id: name.clone(),
                    display_name: name,
                    strength: MatchStrength::Ranked { rank: i + 1 },
                }
            })
            .collect();

        let treatments = self
            .treatments
            .iter()
            .map(|t| treatment_row(None, Some(&t.to_record())))
            .collect();

        Ok(DiagnosisResult {
            matches,
            treatments,
            source: ResultSource::Remote,
        })
    }
}
