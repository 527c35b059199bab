//! Attaches treatment data to ranked matches and shapes the result.

use crate::matcher::RankedMatch;
use crate::models::{
    DiagnosisResult, MatchEntry, ResultSource, TreatmentCell, TreatmentRecord, TreatmentRow,
};

/// Keep the top `limit` matches and emit one treatment row per kept match.
///
/// A match without a treatment record, or with missing columns, still
/// gets its row; the gaps are `TreatmentCell::Unspecified`.
pub fn recommend(matches: &[RankedMatch<'_>], limit: usize) -> DiagnosisResult {
    let kept = &matches[..matches.len().min(limit)];

    let entries = kept
        .iter()
        .map(|m| MatchEntry {
            id: m.record.id.clone(),
            display_name: m.record.display_name.clone(),
            strength: m.strength(),
        })
        .collect();

    let rows = kept
        .iter()
        .map(|m| treatment_row(Some(m.record.id.clone()), m.record.treatments.as_ref()))
        .collect();

    DiagnosisResult {
        matches: entries,
        treatments: rows,
        source: ResultSource::Local,
    }
}

pub(crate) fn treatment_row(
    disease_id: Option<String>,
    record: Option<&TreatmentRecord>,
) -> TreatmentRow {
    TreatmentRow {
        disease_id,
        medications: TreatmentCell::from_column(record.and_then(|t| t.medications.as_ref())),
        therapies: TreatmentCell::from_column(record.and_then(|t| t.therapies.as_ref())),
        assistive_tools: TreatmentCell::from_column(
            record.and_then(|t| t.assistive_tools.as_ref()),
        ),
    }
}
