//! Version history listing and single-version display.
//!
//! Backs the `rl history` and `rl show` commands.

use anyhow::Result;

use crate::config::Config;
use crate::error::LedgerError;
use crate::report;
use crate::store::VersionStore;

/// Print the version table for one identifier.
pub fn run_history(config: &Config, id: &str) -> Result<()> {
    let store = VersionStore::new(&config.storage.history_dir);
    let record = store
        .load(id, true)?
        .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;

    println!();
    println!("Research ID: {}", id);
    println!("Total versions: {}", record.versions.len());
    println!();
    println!("{:<5} {:<25} {:<40}", "Ver", "Timestamp", "Query");
    println!("{}", "-".repeat(70));

    for v in &record.versions {
        let query_short = if v.query.chars().count() > 40 {
            let head: String = v.query.chars().take(37).collect();
            format!("{}...", head)
        } else {
            v.query.clone()
        };
        let ts_short: String = v.timestamp.chars().take(19).collect();
        println!("{:<5} {:<25} {:<40}", v.version, ts_short, query_short);
    }

    Ok(())
}

/// Print one version in the banner-delimited report layout.
pub fn run_show(config: &Config, id: &str, version: u32) -> Result<()> {
    let store = VersionStore::new(&config.storage.history_dir);
    let v = store.version(id, version)?;
    print!("{}", report::version_report(id, &v));
    Ok(())
}
