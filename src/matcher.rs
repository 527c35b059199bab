//! Local, exact, rule-based matcher.
//!
//! A record is a candidate iff every queried symptom is in its symptom set.
//! All candidates are returned, most specific first: fewer extraneous
//! symptoms rank higher, ties broken by record id ascending.

use crate::error::EngineError;
use crate::knowledge::KnowledgeBase;
use crate::models::{DiseaseRecord, MatchStrength, SymptomSet};

/// A knowledge base record that satisfied the subset test.
#[derive(Debug, Clone, Copy)]
pub struct RankedMatch<'a> {
    pub record: &'a DiseaseRecord,
    /// Record symptoms not present in the query.
    pub extraneous: usize,
}

impl RankedMatch<'_> {
    pub fn strength(&self) -> MatchStrength {
        if self.extraneous == 0 {
            MatchStrength::Exact
        } else {
            MatchStrength::Partial {
                extraneous: self.extraneous,
            }
        }
    }
}

pub fn match_records<'a>(
    query: &SymptomSet,
    kb: &'a KnowledgeBase,
) -> Result<Vec<RankedMatch<'a>>, EngineError> {
    if query.is_empty() {
        return Err(EngineError::InvalidQuery(
            "at least one symptom is required".into(),
        ));
    }
    if kb.is_empty() {
        return Err(EngineError::EmptyKnowledgeBase);
    }

    let mut matches: Vec<RankedMatch<'a>> = kb
        .records()
        .iter()
        .filter(|record| query.is_subset(&record.symptoms))
        .map(|record| RankedMatch {
            record,
            extraneous: record.symptoms.extraneous_to(query),
        })
        .collect();

    matches.sort_by(|a, b| {
        a.extraneous
            .cmp(&b.extraneous)
            .then_with(|| a.record.id.cmp(&b.record.id))
    });

    tracing::debug!(
        query_size = query.len(),
        candidates = matches.len(),
        "Subset match complete"
    );

    Ok(matches)
}
