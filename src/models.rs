//! Core data models persisted in `citations.json`.
//!
//! Field names are the on-disk wire format and stay snake_case. Both maps
//! in [`CitationDocument`] keep insertion order, so the report lists
//! sources and files in the order they were first recorded.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Project metadata, written once when the document is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// An external reference registered under a caller-chosen id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub license_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "timestamp")]
    pub added_at: DateTime<Utc>,
}

/// One record that some sources influenced a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub source_ids: Vec<String>,
    #[serde(with = "timestamp")]
    pub cited_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_end: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Root of the persisted record graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationDocument {
    pub project_info: ProjectInfo,
    #[serde(default)]
    pub sources: IndexMap<String, SourceInfo>,
    #[serde(default)]
    pub file_citations: IndexMap<String, Vec<Citation>>,
}

impl CitationDocument {
    /// Fresh document with no sources and no citations.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_info: ProjectInfo {
                name: project_name.into(),
                created_at: Utc::now(),
            },
            sources: IndexMap::new(),
            file_citations: IndexMap::new(),
        }
    }

    /// Display name of a source, or `Unknown (<id>)` when it was never registered.
    pub fn source_name(&self, source_id: &str) -> String {
        match self.sources.get(source_id) {
            Some(source) => source.name.clone(),
            None => format!("Unknown ({})", source_id),
        }
    }

    /// Distinct source ids cited in a file, in order of first appearance.
    pub fn cited_sources(&self, rel_path: &str) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        if let Some(citations) = self.file_citations.get(rel_path) {
            for id in citations.iter().flat_map(|c| c.source_ids.iter()) {
                if !seen.contains(id) {
                    seen.push(id.clone());
                }
            }
        }
        seen
    }

    pub fn citation_count(&self) -> usize {
        self.file_citations.values().map(Vec::len).sum()
    }
}

/// One or more source ids attached to a citation.
///
/// Accepts a single id or a list so callers can write either
/// `store.cite_in_file(path, "lib-x", ..)` or `store.cite_in_file(path, ["a", "b"], ..)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceIds(Vec<String>);

impl SourceIds {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for SourceIds {
    fn from(id: &str) -> Self {
        SourceIds(vec![id.to_string()])
    }
}

impl From<String> for SourceIds {
    fn from(id: String) -> Self {
        SourceIds(vec![id])
    }
}

impl From<Vec<String>> for SourceIds {
    fn from(ids: Vec<String>) -> Self {
        SourceIds(ids)
    }
}

impl From<&[&str]> for SourceIds {
    fn from(ids: &[&str]) -> Self {
        SourceIds(ids.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SourceIds {
    fn from(ids: [&str; N]) -> Self {
        SourceIds(ids.iter().map(|s| s.to_string()).collect())
    }
}

/// Timestamps are written as RFC 3339. Older documents may carry naive
/// ISO-8601 values without an offset; those are read as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
