//! Read-only knowledge base of disease/syndrome records.
//!
//! Loaded once per session from a `KnowledgeSource` and then shared
//! (behind `Arc`) by every query. The engine never mutates it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::EngineError;
use crate::models::{DiseaseRecord, SymptomSet, TreatmentRecord};

/// Where disease records come from. The engine only needs a snapshot.
pub trait KnowledgeSource {
    /// Human-readable origin, used in errors and logs.
    fn describe(&self) -> String;

    fn load_records(&self) -> Result<Vec<DiseaseRecord>, EngineError>;
}

/// JSON array of `DiseaseRecord` on disk.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl KnowledgeSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_records(&self) -> Result<Vec<DiseaseRecord>, EngineError> {
        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| EngineError::KnowledgeBaseLoad(self.describe(), e.to_string()))?;
        serde_json::from_str(&json)
            .map_err(|e| EngineError::KnowledgeBaseParse(self.describe(), e.to_string()))
    }
}

/// Records already in memory (fixtures, records fetched by a collaborator).
pub struct InMemorySource(pub Vec<DiseaseRecord>);

impl KnowledgeSource for InMemorySource {
    fn describe(&self) -> String {
        "in-memory".to_string()
    }

    fn load_records(&self) -> Result<Vec<DiseaseRecord>, EngineError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    records: Vec<DiseaseRecord>,
}

impl KnowledgeBase {
    /// Validate and take ownership of a record snapshot.
    ///
    /// Ids must be unique and non-blank; symptoms must be non-blank.
    /// An empty snapshot is accepted here and rejected at match time.
    pub fn from_records(records: Vec<DiseaseRecord>) -> Result<Self, EngineError> {
        let mut seen = HashSet::new();
        for record in &records {
            if record.id.trim().is_empty() {
                return Err(EngineError::KnowledgeBaseParse(
                    record.display_name.clone(),
                    "record id is blank".into(),
                ));
            }
            if !seen.insert(record.id.as_str()) {
                return Err(EngineError::DuplicateRecordId(record.id.clone()));
            }
            if record.symptoms.iter().any(|s| s.is_blank()) {
                return Err(EngineError::KnowledgeBaseParse(
                    record.id.clone(),
                    "blank symptom".into(),
                ));
            }
        }
        Ok(Self { records })
    }

    pub fn load(source: &dyn KnowledgeSource) -> Result<Self, EngineError> {
        let kb = Self::from_records(source.load_records()?)?;
        tracing::info!(
            source = %source.describe(),
            records = kb.len(),
            "Knowledge base loaded"
        );
        Ok(kb)
    }

    pub fn load_json(path: &Path) -> Result<Self, EngineError> {
        Self::load(&JsonFileSource::new(path))
    }

    pub fn records(&self) -> &[DiseaseRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&DiseaseRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Small fixed knowledge base for tests (no file I/O).
    pub fn load_test() -> Self {
        fn record(
            id: &str,
            name: &str,
            symptoms: &[&str],
            treatments: Option<TreatmentRecord>,
        ) -> DiseaseRecord {
            DiseaseRecord {
                id: id.into(),
                display_name: name.into(),
                symptoms: SymptomSet::from_labels(symptoms),
                treatments,
            }
        }

        fn list(items: &[&str]) -> Option<Vec<String>> {
            Some(items.iter().map(|s| s.to_string()).collect())
        }

        Self {
            records: vec![
                record(
                    "dravet",
                    "Dravet Syndrome",
                    &["Seizures", "Speech Delay", "Motor Regression", "Sleep Disturbances"],
                    Some(TreatmentRecord {
                        medications: list(&["Valproate", "Clobazam"]),
                        therapies: list(&["Speech therapy"]),
                        assistive_tools: list(&["Seizure alarm"]),
                    }),
                ),
                record(
                    "angelman",
                    "Angelman Syndrome",
                    &["Seizures", "Speech Delay", "Hyperactivity", "Sleep Disturbances"],
                    Some(TreatmentRecord {
                        medications: list(&["Melatonin"]),
                        therapies: None,
                        assistive_tools: list(&["AAC device"]),
                    }),
                ),
                record(
                    "epilepsy-speech",
                    "Epilepsy with Speech Delay",
                    &["Seizures", "Speech Delay"],
                    Some(TreatmentRecord {
                        medications: list(&["Levetiracetam"]),
                        therapies: list(&["Speech therapy"]),
                        assistive_tools: Some(vec![]),
                    }),
                ),
                record(
                    "prader-willi",
                    "Prader-Willi Syndrome",
                    &["Hypotonia", "Feeding Issues", "Learning Disabilities"],
                    None,
                ),
                record(
                    "heart-failure",
                    "Heart Failure",
                    &["Fatigue", "Shortness of breath", "Weakness"],
                    Some(TreatmentRecord {
                        medications: list(&["Diuretics"]),
                        therapies: list(&["Cardiac rehabilitation"]),
                        assistive_tools: None,
                    }),
                ),
            ],
        }
    }
}
