use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a raw symptom label: trim, lowercase, collapse whitespace runs.
pub fn normalize_label(raw: &str) -> String {
    RE_WHITESPACE
        .replace_all(raw.trim(), " ")
        .to_lowercase()
}

/// A normalized symptom token.
///
/// Identity is the normalized form, so `"Speech  Delay"` and
/// `" speech delay"` are the same symptom.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Symptom(String);

impl Symptom {
    pub fn new(raw: &str) -> Self {
        Self(normalize_label(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Symptom {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Symptom::new(&raw))
    }
}

/// Unordered, duplicate-free set of symptoms. Iterates in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomSet(BTreeSet<Symptom>);

impl SymptomSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw labels. Blank labels are dropped; use
    /// `SymptomVocabulary::validate` when blanks must be rejected.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|l| Symptom::new(l.as_ref()))
            .filter(|s| !s.is_blank())
            .collect()
    }

    pub fn insert(&mut self, symptom: Symptom) -> bool {
        self.0.insert(symptom)
    }

    pub fn contains(&self, symptom: &Symptom) -> bool {
        self.0.contains(symptom)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symptom> {
        self.0.iter()
    }

    /// True when every symptom of `self` is also in `other`.
    pub fn is_subset(&self, other: &SymptomSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Number of symptoms in `self` that are absent from `query`.
    pub fn extraneous_to(&self, query: &SymptomSet) -> usize {
        self.0.difference(&query.0).count()
    }

    pub fn to_labels(&self) -> Vec<String> {
        self.0.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl FromIterator<Symptom> for SymptomSet {
    fn from_iter<I: IntoIterator<Item = Symptom>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SymptomSet {
    type Item = &'a Symptom;
    type IntoIter = std::collections::btree_set::Iter<'a, Symptom>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_folds_and_collapses() {
        assert_eq!(normalize_label("  Speech \t Delay "), "speech delay");
        assert_eq!(normalize_label("SEIZURES"), "seizures");
        assert_eq!(normalize_label("   "), "");
    }

    #[test]
    fn symptoms_equal_iff_normalized_equal() {
        assert_eq!(Symptom::new("Feeding Issues"), Symptom::new("feeding   issues"));
        assert_ne!(Symptom::new("Feeding Issues"), Symptom::new("Feeding"));
    }

    #[test]
    fn set_deduplicates_equivalent_labels() {
        let set = SymptomSet::from_labels(["Seizures", "seizures ", "Hypotonia", " "]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Symptom::new("hypotonia")));
    }

    #[test]
    fn subset_and_extraneous() {
        let record = SymptomSet::from_labels(["A", "B", "C"]);
        let query = SymptomSet::from_labels(["a", "b"]);
        assert!(query.is_subset(&record));
        assert!(!record.is_subset(&query));
        assert_eq!(record.extraneous_to(&query), 1);
    }

    #[test]
    fn deserialize_normalizes() {
        let set: SymptomSet = serde_json::from_str(r#"["Speech Delay", "SPEECH delay"]"#).unwrap();
        assert_eq!(set.to_labels(), vec!["speech delay".to_string()]);
    }
}
