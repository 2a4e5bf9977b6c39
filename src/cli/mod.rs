//! CLI support for fql-chain
//!
//! Provides programmatic access to the `fqlc` commands, so the same plans
//! can be rendered from other tools.

pub mod convert;
mod docs;
mod plan;
mod render;

pub use convert::{json_to_value, value_to_json};
pub use docs::{DocTopic, get_doc_topic, get_docs_overview};
pub use plan::{CollectionSpec, Dynamic, Plan, PlanError, Step};
pub use render::{RenderOptions, RenderResult, execute_render};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid plan: {0}")]
    Plan(#[from] PlanError),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("No input provided. Use --input or pipe a JSON plan to stdin.")]
    NoInput,
    #[error("Unknown topic: '{0}'\nRun 'fqlc docs' to see available topics.")]
    UnknownTopic(String),
}
