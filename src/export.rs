//! Archival export of versions and diff reports.
//!
//! Backs `rl export`: writes a banner-delimited text document suitable for
//! archival — either one version, or a full diff report (summary, semantic
//! sections, unified diff, both texts) between two versions.

use anyhow::{bail, Result};
use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::diff::semantic_diff;
use crate::embedding::create_provider;
use crate::report;
use crate::store::VersionStore;

/// Export one version to a text file. Default path: `<id>_v<N>.txt`.
pub fn run_export_version(
    config: &Config,
    id: &str,
    version: u32,
    output: Option<&Path>,
) -> Result<()> {
    let store = VersionStore::new(&config.storage.history_dir);
    let v = store.version(id, version)?;

    let content = report::version_report(id, &v);
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{}_v{}.txt", id, version)));

    std::fs::write(&path, content)?;
    println!("Exported to: {}", path.display());
    Ok(())
}

/// Export a diff report between two versions to a text file.
/// Default path: `<id>_diff_v<N>_v<M>.txt`.
pub async fn run_export_diff(
    config: &Config,
    id: &str,
    old: u32,
    new: u32,
    threshold: Option<f64>,
    output: Option<&Path>,
) -> Result<()> {
    let store = VersionStore::new(&config.storage.history_dir);
    let old_version = store.version(id, old)?;
    let new_version = store.version(id, new)?;

    if !config.embedding.is_enabled() {
        bail!("Diff export requires embeddings. Set [embedding] provider in config.");
    }
    let provider = create_provider(&config.embedding)?;
    let threshold = threshold.unwrap_or(config.diff.threshold);

    let semantic = semantic_diff(
        provider.as_ref(),
        &old_version.findings,
        &new_version.findings,
        threshold,
        config.chunking.max_chunk_chars,
    )
    .await?;

    let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let content = report::diff_report(id, &old_version, &new_version, &semantic, &generated_at);

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{}_diff_v{}_v{}.txt", id, old, new)));

    std::fs::write(&path, content)?;
    println!("Exported to: {}", path.display());
    Ok(())
}
