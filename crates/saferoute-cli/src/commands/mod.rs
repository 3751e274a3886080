// Module exports for CLI subcommands
//
// Each module handles a specific CLI subcommand. main.rs dispatches to these
// handlers and keeps the entry point focused on parsing.

pub mod listing;
pub mod route;

use std::path::Path;

use anyhow::{Context, Result};
use saferoute_lib::{load_dataset, resolve_dataset_path, Graph};

/// Locate, load and build the street graph.
pub fn load_graph(dataset: Option<&Path>) -> Result<Graph> {
    let path = resolve_dataset_path(dataset).context("failed to resolve the dataset location")?;
    let dataset = load_dataset(&path)
        .with_context(|| format!("failed to load dataset from {}", path.display()))?;
    dataset
        .build_graph()
        .with_context(|| format!("dataset {} is not a valid street graph", path.display()))
}
