//! Research and update commands.
//!
//! Drives the findings producer and records the result as a new version.
//! The delta note is decided here, in the command layer; the store treats
//! it as an opaque string.

use anyhow::Result;

use crate::config::Config;
use crate::produce::create_producer;
use crate::store::{validate_id, VersionStore};

/// Produce findings for `query` and append them to the history for `id`.
///
/// In update mode the latest recorded findings are handed to the producer
/// as context; without prior history the call degrades to an initial
/// research pass.
pub async fn run_research(config: &Config, id: &str, query: &str, update: bool) -> Result<()> {
    // Fail on a bad identifier before any provider or filesystem work.
    validate_id(id)?;

    let store = VersionStore::new(&config.storage.history_dir);
    let producer = create_producer(&config.producer)?;

    let previous = if update {
        store
            .load(id, false)?
            .and_then(|record| record.versions.last().map(|v| v.findings.clone()))
    } else {
        None
    };

    let produced = producer.produce(query, previous.as_deref()).await?;

    let delta = if previous.is_some() {
        "Updated with new insights"
    } else {
        "Initial research"
    };
    let version = store.append(id, query, &produced.findings, produced.sources, delta)?;

    println!();
    println!("{}", "=".repeat(80));
    println!("Research findings (ID: {})", id);
    println!("{}", "=".repeat(80));
    println!("{}", produced.findings);
    println!();
    println!(
        "Saved: {} (version {})",
        store.history_dir().join(format!("{}.json", id)).display(),
        version.version
    );

    Ok(())
}
