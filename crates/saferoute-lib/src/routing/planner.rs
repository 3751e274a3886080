//! Route planning strategies implementing the Strategy pattern.
//!
//! This module provides the `RoutePlanner` trait and implementations for the
//! supported search algorithms. Every planner receives the cost mode as a
//! parameter, so adding an algorithm never touches the edge-cost rules.

use crate::graph::{Graph, NodeId};
use crate::path::{find_path_a_star, find_path_dijkstra, PathConstraints as SearchConstraints};

use super::{RouteAlgorithm, RouteMode, RouteRequest};

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Execute the pathfinding algorithm on the given graph.
    ///
    /// Returns `Some(path)` if a route is found, `None` otherwise.
    fn find_path(
        &self,
        graph: &Graph,
        start: &str,
        goal: &str,
        mode: RouteMode,
        constraints: &SearchConstraints,
    ) -> Option<Vec<NodeId>>;
}

/// Dijkstra's algorithm planner.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_path(
        &self,
        graph: &Graph,
        start: &str,
        goal: &str,
        mode: RouteMode,
        constraints: &SearchConstraints,
    ) -> Option<Vec<NodeId>> {
        find_path_dijkstra(graph, start, goal, mode, constraints)
    }
}

/// A* planner using great-circle distance to the goal as the heuristic.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner;

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn find_path(
        &self,
        graph: &Graph,
        start: &str,
        goal: &str,
        mode: RouteMode,
        constraints: &SearchConstraints,
    ) -> Option<Vec<NodeId>> {
        find_path_a_star(graph, start, goal, mode, constraints)
    }
}

/// Select the appropriate planner for a given request.
pub fn select_planner(request: &RouteRequest) -> Box<dyn RoutePlanner> {
    match request.algorithm {
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
        RouteAlgorithm::AStar => Box::new(AStarPlanner),
    }
}
