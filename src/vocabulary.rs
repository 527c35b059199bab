//! Symptom vocabulary: the recognized symptom tokens and input validation.
//!
//! A vocabulary is either closed (only known tokens pass validation) or
//! open (anything non-blank passes). The two built-in lists are the ones
//! the patient portal offers in its symptom pickers.

use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::knowledge::KnowledgeBase;
use crate::models::{Symptom, SymptomSet};

// ═══════════════════════════════════════════
// Built-in symptom lists
// ═══════════════════════════════════════════

pub const NEURODEVELOPMENTAL_SYMPTOMS: &[&str] = &[
    "Seizures",
    "Speech Delay",
    "Sleep Disturbances",
    "Hypotonia",
    "Anxiety",
    "Motor Regression",
    "Hyperactivity",
    "Feeding Issues",
    "Sensory Processing Issues",
    "Aggression",
    "Learning Disabilities",
];

pub const GENERAL_SYMPTOMS: &[&str] = &[
    "Fatigue",
    "Shortness of breath",
    "Chest pain",
    "Dizziness",
    "Weakness",
    "Cough",
    "Fever",
];

// ═══════════════════════════════════════════
// SymptomVocabulary
// ═══════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct SymptomVocabulary {
    closed: bool,
    labels: Vec<String>,
    /// Normalized symptom -> index into `labels`.
    known: BTreeMap<Symptom, usize>,
}

impl SymptomVocabulary {
    /// Build a vocabulary from display labels. Labels that normalize to
    /// the same symptom are kept once, first spelling wins.
    pub fn new<I, S>(labels: I, closed: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self {
            closed,
            labels: Vec::new(),
            known: BTreeMap::new(),
        };
        vocab.extend(labels);
        vocab
    }

    /// Add labels not already known.
    pub fn extend<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for label in labels {
            let label = label.as_ref();
            let symptom = Symptom::new(label);
            if symptom.is_blank() || self.known.contains_key(&symptom) {
                continue;
            }
            self.known.insert(symptom, self.labels.len());
            self.labels.push(label.trim().to_string());
        }
    }

    /// Open vocabulary with no known tokens: every non-blank token passes.
    pub fn open() -> Self {
        Self::new(std::iter::empty::<&str>(), false)
    }

    /// Both portal lists combined.
    pub fn builtin(closed: bool) -> Self {
        Self::new(
            NEURODEVELOPMENTAL_SYMPTOMS
                .iter()
                .chain(GENERAL_SYMPTOMS.iter()),
            closed,
        )
    }

    /// Every symptom mentioned by the knowledge base, in record order.
    pub fn from_knowledge_base(kb: &KnowledgeBase, closed: bool) -> Self {
        let mut vocab = Self::new(std::iter::empty::<&str>(), closed);
        vocab.extend_from_knowledge_base(kb);
        vocab
    }

    pub fn extend_from_knowledge_base(&mut self, kb: &KnowledgeBase) {
        for record in kb.records() {
            self.extend(record.symptoms.iter().map(|s| s.as_str()));
        }
    }

    pub fn normalize(&self, raw: &str) -> Symptom {
        Symptom::new(raw)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn recognizes(&self, symptom: &Symptom) -> bool {
        self.known.contains_key(symptom)
    }

    /// Display spelling of a known symptom.
    pub fn display_label(&self, symptom: &Symptom) -> Option<&str> {
        self.known.get(symptom).map(|&i| self.labels[i].as_str())
    }

    /// Display spelling when known, normalized form otherwise.
    pub fn wire_label(&self, symptom: &Symptom) -> String {
        self.display_label(symptom)
            .unwrap_or(symptom.as_str())
            .to_string()
    }

    /// Display labels in declaration order, for symptom pickers.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Normalize and check a batch of raw tokens.
    ///
    /// Blank tokens are malformed input (`InvalidQuery`). In closed mode
    /// an unrecognized token fails with `UnknownSymptom`.
    pub fn validate<S: AsRef<str>>(&self, raw: &[S]) -> Result<SymptomSet, EngineError> {
        let mut set = SymptomSet::new();
        for token in raw {
            let token = token.as_ref();
            let symptom = self.normalize(token);
            if symptom.is_blank() {
                return Err(EngineError::InvalidQuery(
                    "symptom tokens must not be blank".into(),
                ));
            }
            if self.closed && !self.recognizes(&symptom) {
                return Err(EngineError::UnknownSymptom(token.trim().to_string()));
            }
            set.insert(symptom);
        }
        Ok(set)
    }
}
