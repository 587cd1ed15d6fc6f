//! Append-only version store for research findings.
//!
//! One JSON file per identifier under the configured history directory,
//! holding the full [`Record`]. Appending is the only mutation path: the
//! store assigns the next version number, stamps the time, and rewrites the
//! whole record through a temp file in the same directory followed by an
//! atomic rename. A partially written file is never observable, and a
//! failed write leaves the previously committed record intact.
//!
//! Identifiers double as file stems, so [`validate_id`] runs before any
//! filesystem access. There is no locking: concurrent appends against the
//! same identifier from separate processes can race; callers that need
//! concurrent access must serialize writes per identifier externally.

use chrono::{SecondsFormat, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, Result};
use crate::models::{Record, Version};

/// Validate an identifier for use as a history file stem.
///
/// Accepts non-empty strings of ASCII alphanumerics, underscores, and
/// hyphens; rejects everything else with
/// [`InvalidIdentifier`](LedgerError::InvalidIdentifier). This is the path
/// traversal guard and must run before any path is built.
pub fn validate_id(id: &str) -> Result<&str> {
    if id.is_empty()
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(LedgerError::InvalidIdentifier(id.to_string()));
    }
    Ok(id)
}

/// Filesystem-backed store of per-identifier findings histories.
pub struct VersionStore {
    history_dir: PathBuf,
}

impl VersionStore {
    /// Create a store rooted at `history_dir`. Cheap; the directory is
    /// created lazily on first append.
    pub fn new(history_dir: impl Into<PathBuf>) -> Self {
        Self {
            history_dir: history_dir.into(),
        }
    }

    pub fn history_dir(&self) -> &Path {
        &self.history_dir
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.history_dir.join(format!("{}.json", id))
    }

    /// Load the record for `id`.
    ///
    /// Returns `Ok(None)` when no history exists and `required` is false;
    /// fails with [`NotFound`](LedgerError::NotFound) when `required` is
    /// true. An absent record is distinct from an empty one; the store
    /// never persists a record with zero versions.
    pub fn load(&self, id: &str, required: bool) -> Result<Option<Record>> {
        validate_id(id)?;

        let path = self.record_path(id);
        if !path.exists() {
            if required {
                return Err(LedgerError::NotFound(id.to_string()));
            }
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let mut record: Record = serde_json::from_str(&content)?;
        record.identifier = id.to_string();
        Ok(Some(record))
    }

    /// Append a new version to the history for `id` and persist it.
    ///
    /// The version number is `len + 1`, always assigned here and never by
    /// the caller; the timestamp is the current UTC time. Returns the
    /// appended version.
    pub fn append(
        &self,
        id: &str,
        query: &str,
        findings: &str,
        sources: Vec<String>,
        delta: &str,
    ) -> Result<Version> {
        validate_id(id)?;

        let mut record = self.load(id, false)?.unwrap_or_else(|| Record {
            identifier: id.to_string(),
            versions: Vec::new(),
        });

        let version = Version {
            version: record.versions.len() as u32 + 1,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            query: query.to_string(),
            findings: findings.to_string(),
            sources,
            delta: delta.to_string(),
        };
        record.versions.push(version.clone());

        self.persist(id, &record)?;
        Ok(version)
    }

    /// Fetch one version by number, with the valid range in the error.
    pub fn version(&self, id: &str, number: u32) -> Result<Version> {
        let record = match self.load(id, true)? {
            Some(record) => record,
            None => return Err(LedgerError::NotFound(id.to_string())),
        };

        let available = record.versions.len();
        if number < 1 || number as usize > available {
            return Err(LedgerError::VersionOutOfRange {
                id: id.to_string(),
                requested: number,
                available,
            });
        }
        Ok(record.versions[number as usize - 1].clone())
    }

    /// Write the full record atomically: temp file in the target directory,
    /// then rename over the destination.
    fn persist(&self, id: &str, record: &Record) -> Result<()> {
        std::fs::create_dir_all(&self.history_dir)?;

        let json = serde_json::to_string_pretty(record)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.history_dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(self.record_path(id))
            .map_err(|e| LedgerError::Storage(e.error))?;

        Ok(())
    }
}
