use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::NOT_AVAILABLE;

/// Parsed key/value snapshot of one host attribute category.
///
/// Fields vary by OS and report; anything a command did not report reads
/// back as `N/A`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRecord {
    fields: BTreeMap<String, String>,
}

impl FactRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Builder form of [`FactRecord::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value for `key`, or the `N/A` placeholder
    pub fn get_or_na(&self, key: &str) -> &str {
        self.get(key).unwrap_or(NOT_AVAILABLE)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Outcome of generating one report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportOutcome {
    /// The generator ran to completion
    Generated,
    /// The generator failed; a placeholder page was written instead
    Degraded { reason: String },
}

/// Metadata for a rendered HTML report on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportArtifact {
    pub kind: String,
    pub title: String,
    pub file_name: String,
    pub path: PathBuf,
    pub generated_at: String,
    pub sha256: Option<String>,
    pub outcome: ReportOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_reads_as_placeholder() {
        let record = FactRecord::new().with("Name", "spencer");
        assert_eq!(record.get_or_na("Name"), "spencer");
        assert_eq!(record.get_or_na("SID"), "N/A");
        assert!(record.get("SID").is_none());
    }

    #[test]
    fn test_insert_overwrites() {
        let mut record = FactRecord::new();
        record.insert("Status", "OK");
        record.insert("Status", "Degraded");
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("Status"), Some("Degraded"));
    }

    #[test]
    fn test_iteration_is_key_ordered() {
        let record = FactRecord::new().with("b", "2").with("a", "1");
        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_outcome_serialization() {
        let degraded = ReportOutcome::Degraded { reason: "boom".to_string() };
        let json = serde_json::to_string(&degraded).unwrap();
        assert!(json.contains("Degraded"));
        assert!(json.contains("boom"));
    }
}
