//! Route planning module for safety-aware pedestrian routing.
//!
//! This module provides:
//! - [`RouteMode`] - Cost function selector (distance or risk-scaled distance)
//! - [`RouteAlgorithm`] - Supported search algorithms (Dijkstra, A*)
//! - [`RouteConstraints`] - Constraints applied during route planning
//! - [`RouteRequest`] - High-level route planning request
//! - [`find_route`] / [`plan_route`] - Entry points for computing routes
//!
//! Safety is not a separate objective: [`RouteMode::Safest`] multiplies each
//! edge's distance by its safety weight, so both modes share one search and
//! differ only in the edge cost.
//!
//! # Strategy Pattern
//!
//! Each algorithm is encapsulated in a planner implementing [`RoutePlanner`],
//! so new algorithms can be added without touching [`plan_route`].
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use saferoute_lib::{find_route, load_dataset, RouteMode};
//!
//! let graph = load_dataset(Path::new("docs/fixtures/popayan.json"))?.build_graph()?;
//! match find_route(&graph, "n6", "n9", RouteMode::Safest)? {
//!     Some(route) => println!("{} m", route.total_distance),
//!     None => println!("no route"),
//! }
//! ```

mod planner;

pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::path::PathConstraints as SearchConstraints;
use crate::stats::{summarize_path, RouteResult};

/// Cost function used by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    /// Edge cost is the physical distance.
    Shortest,
    /// Edge cost is the distance multiplied by the safety weight.
    #[default]
    Safest,
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteMode::Shortest => "shortest",
            RouteMode::Safest => "safest",
        };
        f.write_str(value)
    }
}

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm.
    #[default]
    Dijkstra,
    /// A* search guided by great-circle distance to the goal.
    #[serde(rename = "a-star")]
    AStar,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
        };
        f.write_str(value)
    }
}

/// Constraints applied during route planning.
#[derive(Debug, Clone, Default)]
pub struct RouteConstraints {
    /// Node identifiers that must not appear in the route.
    pub avoid_nodes: Vec<NodeId>,
}

/// High-level route planning request.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: NodeId,
    pub goal: NodeId,
    pub mode: RouteMode,
    pub algorithm: RouteAlgorithm,
    pub constraints: RouteConstraints,
}

impl RouteRequest {
    /// Dijkstra request without extra constraints.
    pub fn new(start: impl Into<NodeId>, goal: impl Into<NodeId>, mode: RouteMode) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            mode,
            algorithm: RouteAlgorithm::default(),
            constraints: RouteConstraints::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn avoiding<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        self.constraints
            .avoid_nodes
            .extend(nodes.into_iter().map(Into::into));
        self
    }
}

/// Compute the minimum-cost route between two node identifiers.
///
/// Returns `Ok(None)` when the destination cannot be reached and
/// [`Error::UnknownNode`](crate::Error::UnknownNode) when either endpoint is
/// not part of the graph. `start == goal` yields a single-node route.
pub fn find_route(
    graph: &Graph,
    start: &str,
    goal: &str,
    mode: RouteMode,
) -> Result<Option<RouteResult>> {
    plan_route(graph, &RouteRequest::new(start, goal, mode))
}

/// Compute a route using the requested algorithm and constraints.
///
/// Statistics on the returned route are recomputed from the traversed edges,
/// never taken from the search costs.
pub fn plan_route(graph: &Graph, request: &RouteRequest) -> Result<Option<RouteResult>> {
    graph.require_node(&request.start)?;
    graph.require_node(&request.goal)?;
    let constraints = SearchConstraints {
        avoided_nodes: resolve_avoided_nodes(graph, &request.constraints.avoid_nodes)?,
    };

    let planner = select_planner(request);
    let Some(path) = planner.find_path(
        graph,
        &request.start,
        &request.goal,
        request.mode,
        &constraints,
    ) else {
        debug!(
            start = %request.start,
            goal = %request.goal,
            mode = %request.mode,
            "no route found"
        );
        return Ok(None);
    };

    let result = summarize_path(graph, &path);
    debug!(
        start = %request.start,
        goal = %request.goal,
        mode = %request.mode,
        algorithm = %planner.algorithm(),
        hops = result.hop_count(),
        distance = result.total_distance,
        "route planned"
    );
    Ok(Some(result))
}

fn resolve_avoided_nodes(graph: &Graph, avoided: &[NodeId]) -> Result<HashSet<NodeId>> {
    let mut resolved = HashSet::new();
    for id in avoided {
        resolved.insert(graph.require_node(id)?.id.clone());
    }
    Ok(resolved)
}
