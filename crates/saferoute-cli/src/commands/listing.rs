//! Handlers for the `nodes` and `zones` listing commands.

use std::path::Path;

use anyhow::{Context, Result};

use crate::commands::load_graph;
use crate::output::OutputFormat;

pub fn handle_nodes_command(dataset: Option<&Path>, format: OutputFormat) -> Result<()> {
    let graph = load_graph(dataset)?;
    format
        .render_nodes(&graph)
        .context("failed to write node listing")
}

pub fn handle_zones_command(dataset: Option<&Path>, format: OutputFormat) -> Result<()> {
    let graph = load_graph(dataset)?;
    format
        .render_zones(graph.danger_zones())
        .context("failed to write zone listing")
}
