//! # Research Ledger CLI (`rl`)
//!
//! The `rl` binary records versioned research findings and compares them.
//!
//! ## Usage
//!
//! ```bash
//! rl --config ./rl.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rl research <id> <query>` | Produce findings and record version 1 (or the next version) |
//! | `rl update <id> <query>` | Produce findings building on the latest version |
//! | `rl history <id>` | List all recorded versions |
//! | `rl show <id> --version N` | Print one version in full |
//! | `rl diff <id> --old N --new M` | Semantic + textual diff between two versions |
//! | `rl export <id> --old N --new M` | Write an archival diff report |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use research_ledger::{config, diff_cmd, export, history, research};

/// Research Ledger — a versioned ledger for research findings with
/// semantic and textual diffing.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; a missing file falls back to built-in defaults.
#[derive(Parser)]
#[command(
    name = "rl",
    about = "Research Ledger — versioned research findings with semantic diffing",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./rl.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Produce findings for a query and record them as a new version.
    ///
    /// Requires a configured findings provider (`[producer]` in config).
    /// The first version of an identifier is recorded with delta
    /// "Initial research".
    Research {
        /// Research identifier (alphanumerics, `_`, `-`).
        id: String,
        /// The research question.
        query: String,
    },

    /// Produce findings building on the latest recorded version.
    ///
    /// The previous findings are handed to the producer as context and the
    /// result is recorded with delta "Updated with new insights". Without
    /// prior history this behaves like `research`.
    Update {
        /// Research identifier (alphanumerics, `_`, `-`).
        id: String,
        /// The research question.
        query: String,
    },

    /// List all recorded versions for an identifier.
    History {
        /// Research identifier.
        id: String,
    },

    /// Print one recorded version in full.
    Show {
        /// Research identifier.
        id: String,

        /// Version number (1-based).
        #[arg(long)]
        version: u32,
    },

    /// Compare two versions: semantic analysis plus unified line diff.
    ///
    /// Requires a configured embedding provider (`[embedding]` in config).
    Diff {
        /// Research identifier.
        id: String,

        /// Version to compare from (1-based).
        #[arg(long)]
        old: u32,

        /// Version to compare to (1-based).
        #[arg(long)]
        new: u32,

        /// Override the change-detection threshold from config.
        /// Sections with distance strictly above this are reported.
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Write an archival text report for one version or a version pair.
    ///
    /// With `--version N`, exports that version. With `--old N --new M`,
    /// exports a full diff report (requires an embedding provider).
    Export {
        /// Research identifier.
        id: String,

        /// Export a single version.
        #[arg(long, conflicts_with_all = ["old", "new"])]
        version: Option<u32>,

        /// Diff report: version to compare from.
        #[arg(long, requires = "new")]
        old: Option<u32>,

        /// Diff report: version to compare to.
        #[arg(long, requires = "old")]
        new: Option<u32>,

        /// Override the change-detection threshold from config.
        #[arg(long)]
        threshold: Option<f64>,

        /// Output file path. Defaults to `<id>_v<N>.txt` or
        /// `<id>_diff_v<N>_v<M>.txt` in the current directory.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Research { id, query } => {
            research::run_research(&cfg, &id, &query, false).await?;
        }
        Commands::Update { id, query } => {
            research::run_research(&cfg, &id, &query, true).await?;
        }
        Commands::History { id } => {
            history::run_history(&cfg, &id)?;
        }
        Commands::Show { id, version } => {
            history::run_show(&cfg, &id, version)?;
        }
        Commands::Diff {
            id,
            old,
            new,
            threshold,
        } => {
            diff_cmd::run_diff(&cfg, &id, old, new, threshold).await?;
        }
        Commands::Export {
            id,
            version,
            old,
            new,
            threshold,
            output,
        } => match (version, old, new) {
            (Some(version), None, None) => {
                export::run_export_version(&cfg, &id, version, output.as_deref())?;
            }
            (None, Some(old), Some(new)) => {
                export::run_export_diff(&cfg, &id, old, new, threshold, output.as_deref()).await?;
            }
            _ => {
                anyhow::bail!("export requires either --version N or both --old N and --new M");
            }
        },
    }

    Ok(())
}
