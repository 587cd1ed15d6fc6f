//! Terminal diff view between two recorded versions.
//!
//! Backs `rl diff`: a semantic analysis block (summary plus colorized
//! changed sections) followed by a colorized unified line diff.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::diff::semantic_diff;
use crate::embedding::create_provider;
use crate::report;
use crate::store::VersionStore;

pub async fn run_diff(
    config: &Config,
    id: &str,
    old: u32,
    new: u32,
    threshold: Option<f64>,
) -> Result<()> {
    let store = VersionStore::new(&config.storage.history_dir);
    let old_version = store.version(id, old)?;
    let new_version = store.version(id, new)?;

    if !config.embedding.is_enabled() {
        bail!("Semantic diff requires embeddings. Set [embedding] provider in config.");
    }
    let provider = create_provider(&config.embedding)?;
    let threshold = threshold.unwrap_or(config.diff.threshold);

    let result = semantic_diff(
        provider.as_ref(),
        &old_version.findings,
        &new_version.findings,
        threshold,
        config.chunking.max_chunk_chars,
    )
    .await?;

    println!();
    println!("{}", "=".repeat(80));
    println!("[Semantic Analysis] {} (v{} -> v{})", id, old, new);
    println!("{}", "=".repeat(80));
    println!();
    println!("{}", report::summary(&result));

    if !result.sections.is_empty() {
        println!();
        println!("Changed sections:");
        print!("{}", report::sections(&result, true));
    }

    println!();
    println!("{}", "=".repeat(80));
    println!("[Textual Diff] {} (v{} -> v{})", id, old, new);
    println!("{}", "=".repeat(80));

    let diff = report::unified(
        &old_version.findings,
        &new_version.findings,
        &format!("Version {}", old),
        &format!("Version {}", new),
    );
    print!("{}", report::colorize_unified(&diff));

    Ok(())
}
