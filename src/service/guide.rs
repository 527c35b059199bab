//! Symptom management guide: the table the predictor service ranks over.
//!
//! Each row ties one symptom to one commonly associated disorder and the
//! treatments listed for it. A request selects every row whose symptom was
//! submitted; disorders are ranked by how many selected rows name them.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::GUIDE_TOP_SYNDROMES;
use crate::error::EngineError;
use crate::models::{Symptom, SymptomSet};
use crate::predictor::{PredictResponse, WireTreatment};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideRow {
    #[serde(rename = "Symptom")]
    pub symptom: String,
    #[serde(rename = "Common_Disorders")]
    pub disorder: String,
    #[serde(rename = "Medications", default)]
    pub medications: Option<String>,
    #[serde(rename = "Therapies", default)]
    pub therapies: Option<String>,
    #[serde(rename = "Assistive_Tools", default)]
    pub assistive_tools: Option<String>,
}

impl GuideRow {
    /// Treatment triple with blank cells dropped; `None` if all are blank.
    fn treatment(&self) -> Option<WireTreatment> {
        let cell = |c: &Option<String>| {
            c.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let t = WireTreatment {
            medications: cell(&self.medications),
            therapies: cell(&self.therapies),
            assistive_tools: cell(&self.assistive_tools),
        };
        if t == WireTreatment::default() {
            None
        } else {
            Some(t)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymptomGuide {
    rows: Vec<GuideRow>,
}

impl SymptomGuide {
    pub fn new(rows: Vec<GuideRow>) -> Self {
        Self { rows }
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let source = path.display().to_string();
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::KnowledgeBaseLoad(source.clone(), e.to_string()))?;
        let rows: Vec<GuideRow> = serde_json::from_str(&json)
            .map_err(|e| EngineError::KnowledgeBaseParse(source.clone(), e.to_string()))?;
        tracing::info!(source = %source, rows = rows.len(), "Symptom guide loaded");
        Ok(Self::new(rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rank disorders for the submitted symptoms.
    ///
    /// Disorders are ordered by selected-row count, descending, ties by
    /// first appearance; the top `GUIDE_TOP_SYNDROMES` are kept. Treatments
    /// are the distinct triples of the selected rows, in row order.
    pub fn predict<S: AsRef<str>>(&self, symptoms: &[S]) -> PredictResponse {
        let query = SymptomSet::from_labels(symptoms);
        let selected: Vec<&GuideRow> = self
            .rows
            .iter()
            .filter(|row| query.contains(&Symptom::new(&row.symptom)))
            .collect();

        if selected.is_empty() {
            return PredictResponse::default();
        }

        let mut counts: Vec<(&str, usize)> = Vec::new();
        for row in &selected {
            let disorder = row.disorder.trim();
            if disorder.is_empty() {
                continue;
            }
            match counts.iter_mut().find(|(d, _)| *d == disorder) {
                Some((_, n)) => *n += 1,
                None => counts.push((disorder, 1)),
            }
        }
        // Stable: equal counts keep first-appearance order.
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let syndromes = counts
            .into_iter()
            .take(GUIDE_TOP_SYNDROMES)
            .map(|(d, _)| d.to_string())
            .collect();

        let mut seen = HashSet::new();
        let treatments = selected
            .iter()
            .filter_map(|row| row.treatment())
            .filter(|t| seen.insert(t.clone()))
            .collect();

        PredictResponse {
            syndromes,
            treatments,
        }
    }

    /// Small fixed guide for tests (no file I/O).
    pub fn load_test() -> Self {
        fn row(symptom: &str, disorder: &str, meds: &str, therapy: &str, tool: &str) -> GuideRow {
            let cell = |s: &str| Some(s.to_string());
            GuideRow {
                symptom: symptom.into(),
                disorder: disorder.into(),
                medications: cell(meds),
                therapies: cell(therapy),
                assistive_tools: cell(tool),
            }
        }

        Self::new(vec![
            row("Seizures", "Dravet Syndrome", "Valproate, Clobazam", "", "Seizure alarm"),
            row("Seizures", "Epilepsy", "Levetiracetam", "", "Seizure alarm"),
            row("Speech Delay", "Dravet Syndrome", "", "Speech therapy", "AAC device"),
            row("Speech Delay", "Autism Spectrum Disorder", "", "Speech therapy", "AAC device"),
            row("Hyperactivity", "ADHD", "Methylphenidate", "Behavioral therapy", ""),
            row("Hyperactivity", "Autism Spectrum Disorder", "", "Behavioral therapy", ""),
            row("Sleep Disturbances", "Angelman Syndrome", "Melatonin", "", "Weighted blanket"),
            row("Anxiety", "Fragile X Syndrome", "", "", ""),
        ])
    }
}
