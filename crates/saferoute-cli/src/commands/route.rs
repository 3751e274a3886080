//! Route command handler for computing walks between two nodes.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use saferoute_lib::{
    advise_or_fallback, plan_route, provider_from_config, AdviceConfig, AdviceRequest,
    Error as RouteError, Graph, NodeId, RouteAlgorithm, RouteMode, RouteRequest, RouteSummary,
};

use crate::commands::load_graph;
use crate::output::OutputFormat;

/// Cost function selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModeArg {
    Shortest,
    #[default]
    Safest,
}

impl From<ModeArg> for RouteMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Shortest => RouteMode::Shortest,
            ModeArg::Safest => RouteMode::Safest,
        }
    }
}

/// Search algorithm selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AlgorithmArg {
    #[default]
    Dijkstra,
    #[value(name = "a-star")]
    AStar,
}

impl From<AlgorithmArg> for RouteAlgorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::Dijkstra => RouteAlgorithm::Dijkstra,
            AlgorithmArg::AStar => RouteAlgorithm::AStar,
        }
    }
}

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting node id or label.
    pub from: String,
    /// Destination node id or label.
    pub to: String,
    pub mode: ModeArg,
    pub algorithm: AlgorithmArg,
    /// Node ids or labels the route must not pass through.
    pub avoid: Vec<String>,
    /// Ask the advice provider for safety tips once the route is known.
    pub advice: bool,
}

impl RouteCommandArgs {
    /// Resolve user input against the graph and build a library request.
    pub fn to_request(&self, graph: &Graph) -> Result<RouteRequest, RouteError> {
        let start = resolve(graph, &self.from)?;
        let goal = resolve(graph, &self.to)?;
        let avoid = self
            .avoid
            .iter()
            .map(|query| resolve(graph, query))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RouteRequest::new(start, goal, self.mode.into())
            .with_algorithm(self.algorithm.into())
            .avoiding(avoid))
    }
}

fn resolve(graph: &Graph, query: &str) -> Result<NodeId, RouteError> {
    graph.resolve(query).map(|node| node.id.clone())
}

/// Handle the route subcommand.
pub fn handle_route_command(
    dataset: Option<&Path>,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let graph = load_graph(dataset)?;
    let request = args.to_request(&graph).map_err(friendly_error)?;

    let result = plan_route(&graph, &request)
        .map_err(friendly_error)?
        .ok_or_else(|| anyhow::anyhow!(NoRoute(&request).to_string()))?;

    let summary = RouteSummary::from_result(&graph, request.mode, request.algorithm, &result)
        .context("failed to build route summary for display")?;

    let advice = args.advice.then(|| {
        let provider = provider_from_config(AdviceConfig::from_env());
        advise_or_fallback(
            provider.as_ref(),
            &AdviceRequest {
                origin: summary.start.label.clone(),
                destination: summary.goal.label.clone(),
                safety_score: summary.average_safety_score,
            },
        )
    });

    format
        .render_route(&summary, advice.as_ref())
        .context("failed to write route")
}

fn friendly_error(err: RouteError) -> anyhow::Error {
    match err {
        RouteError::UnknownNode { id, suggestions } => {
            anyhow::anyhow!(format_unknown_node_message(&id, &suggestions))
        }
        other => anyhow::Error::new(other),
    }
}

fn format_unknown_node_message(id: &str, suggestions: &[String]) -> String {
    let mut message = format!("Unknown node '{}'.", id);
    match suggestions {
        [] => {}
        [only] => message.push_str(&format!(" Did you mean '{}'?", only)),
        many => {
            let joined = many
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str(&format!(" Did you mean one of: {}?", joined));
        }
    }
    message
}

struct NoRoute<'a>(&'a RouteRequest);

impl fmt::Display for NoRoute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request = self.0;
        write!(
            f,
            "No route found between {} and {}.",
            request.start, request.goal
        )?;
        if !request.constraints.avoid_nodes.is_empty() {
            write!(f, " Try avoiding fewer nodes (omit some --avoid values).")?;
        }
        Ok(())
    }
}
