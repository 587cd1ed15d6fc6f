//! # Research Ledger
//!
//! A versioned ledger for research findings with semantic and textual
//! diffing.
//!
//! Research Ledger keeps an append-only, per-identifier history of findings
//! documents and compares any two versions two ways: a conventional unified
//! line diff, and a semantic diff that segments both documents into chunks,
//! embeds them, and classifies each aligned position by cosine distance.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌───────────────┐   ┌─────────────┐
//! │ Producer  │──▶│ Version Store │──▶│ Diff Engine  │
//! │ (OpenAI)  │   │ JSON history  │   │ chunk+embed │
//! └───────────┘   └──────┬────────┘   └──────┬──────┘
//!                        │                   │
//!                        ▼                   ▼
//!                  ┌──────────┐       ┌──────────┐
//!                  │   CLI    │       │  Report  │
//!                  │   (rl)   │       │ Renderer │
//!                  └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! rl research proj1 "market size for X"   # record version 1
//! rl update proj1 "what changed in Q3?"   # record version 2
//! rl history proj1                        # list versions
//! rl diff proj1 --old 1 --new 2           # semantic + textual diff
//! rl export proj1 --old 1 --new 2         # archival diff report
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`error`] | Error taxonomy |
//! | [`store`] | Append-only version store |
//! | [`chunk`] | Findings text segmentation |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`diff`] | Semantic diff engine |
//! | [`produce`] | Findings producer abstraction |
//! | [`report`] | Diff and export rendering |

pub mod chunk;
pub mod config;
pub mod diff;
pub mod diff_cmd;
pub mod embedding;
pub mod error;
pub mod export;
pub mod history;
pub mod models;
pub mod produce;
pub mod report;
pub mod research;
pub mod store;
