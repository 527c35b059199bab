use serde::{Deserialize, Serialize};

use super::symptom::SymptomSet;

/// A disease or syndrome known to the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    pub id: String,
    pub display_name: String,
    pub symptoms: SymptomSet,
    #[serde(default)]
    pub treatments: Option<TreatmentRecord>,
}

/// Treatment options attached to a disease.
///
/// Each column is optional: `None` means the source never said, an empty
/// list means it said "nothing". Both render as unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentRecord {
    #[serde(default)]
    pub medications: Option<Vec<String>>,
    #[serde(default)]
    pub therapies: Option<Vec<String>>,
    #[serde(default)]
    pub assistive_tools: Option<Vec<String>>,
}

impl TreatmentRecord {
    /// Split a single free-text cell ("Levetiracetam, Valproate") into
    /// its ordered items. Blank items are dropped.
    pub fn split_cell(cell: &str) -> Vec<String> {
        cell.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_cell_keeps_order_and_drops_blanks() {
        assert_eq!(
            TreatmentRecord::split_cell("Levetiracetam, Valproate,, "),
            vec!["Levetiracetam".to_string(), "Valproate".to_string()]
        );
        assert!(TreatmentRecord::split_cell("  ").is_empty());
    }

    #[test]
    fn missing_columns_deserialize_as_none() {
        let t: TreatmentRecord =
            serde_json::from_str(r#"{"medications": [], "therapies": ["Speech therapy"]}"#)
                .unwrap();
        assert_eq!(t.medications, Some(vec![]));
        assert_eq!(t.therapies, Some(vec!["Speech therapy".to_string()]));
        assert_eq!(t.assistive_tools, None);
    }

    #[test]
    fn record_without_treatments() {
        let r: DiseaseRecord = serde_json::from_str(
            r#"{"id": "rett", "display_name": "Rett Syndrome", "symptoms": ["Seizures"]}"#,
        )
        .unwrap();
        assert!(r.treatments.is_none());
        assert_eq!(r.symptoms.len(), 1);
    }
}
