//! Core data models used throughout the research ledger.
//!
//! These types represent the versioned findings records that the store
//! persists and the structured results the semantic diff engine produces.

use serde::{Deserialize, Serialize};

/// One immutable snapshot of research findings within a [`Record`].
///
/// Version numbers are assigned by the store at append time, starting at 1
/// with no gaps. Once written, a version is never mutated or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub version: u32,
    /// RFC 3339 UTC timestamp stamped at append time.
    pub timestamp: String,
    pub query: String,
    pub findings: String,
    pub sources: Vec<String>,
    /// Opaque caller-supplied change note (e.g. "Initial research").
    pub delta: String,
}

/// The full append-only history for one research identifier.
///
/// Persisted as `{ "versions": [...] }` in one JSON file per identifier;
/// the identifier itself is the file stem and is filled in at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(skip)]
    pub identifier: String,
    pub versions: Vec<Version>,
}

/// Classification of one changed section in a semantic diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Removed => write!(f, "removed"),
            ChangeKind::Modified => write!(f, "modified"),
        }
    }
}

/// One section whose semantic distance exceeded the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangedSection {
    /// 1-based position in the aligned chunk sequences.
    pub section: u32,
    pub kind: ChangeKind,
    /// Cosine distance, rounded to 3 decimal places.
    pub distance: f64,
    /// First 100 chars of the old side, `"..."`-suffixed when truncated.
    pub old_excerpt: String,
    /// First 100 chars of the new side, `"..."`-suffixed when truncated.
    pub new_excerpt: String,
}

/// Result of comparing two findings documents chunk by chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticDiffResult {
    /// `1 - overall_distance`, rounded to 3 decimal places.
    pub overall_similarity: f64,
    /// Whole-document cosine distance, rounded to 3 decimal places.
    pub change_score: f64,
    /// Changed sections in ascending position order.
    pub sections: Vec<ChangedSection>,
    /// Number of aligned chunk positions compared.
    pub total_sections: usize,
}
