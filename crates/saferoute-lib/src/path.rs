use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::geo::haversine_distance;
use crate::graph::{Graph, NodeId};
use crate::routing::RouteMode;

/// Constraints applied during pathfinding.
#[derive(Debug, Default, Clone)]
pub struct PathConstraints {
    /// Set of node identifiers that must not appear in the resulting path.
    pub avoided_nodes: HashSet<NodeId>,
}

impl PathConstraints {
    fn allows(&self, node: &str) -> bool {
        !self.avoided_nodes.contains(node)
    }
}

/// Run Dijkstra's algorithm from `start` until `goal` is settled.
///
/// Frontier entries with equal cost are expanded in ascending node-id order,
/// and a tentative predecessor is only replaced by a strictly cheaper one, so
/// the first predecessor to reach the minimal cost is kept. Returns `None`
/// when either endpoint is unknown or avoided, or when `goal` is unreachable.
pub fn find_path_dijkstra(
    graph: &Graph,
    start: &str,
    goal: &str,
    mode: RouteMode,
    constraints: &PathConstraints,
) -> Option<Vec<NodeId>> {
    search(graph, start, goal, mode, constraints, |_| 0.0)
}

/// Run A* search guided by the great-circle distance to `goal`.
///
/// Edge distances are great-circle distances and safety weights are at least
/// one, so the heuristic never overestimates under either mode and the
/// returned path has the same cost as the Dijkstra result.
pub fn find_path_a_star(
    graph: &Graph,
    start: &str,
    goal: &str,
    mode: RouteMode,
    constraints: &PathConstraints,
) -> Option<Vec<NodeId>> {
    let target = graph.node(goal)?.coordinate;
    search(graph, start, goal, mode, constraints, |node| {
        graph
            .node(node)
            .map(|n| haversine_distance(&n.coordinate, &target))
            .unwrap_or(0.0)
    })
}

fn search<H>(
    graph: &Graph,
    start: &str,
    goal: &str,
    mode: RouteMode,
    constraints: &PathConstraints,
    heuristic: H,
) -> Option<Vec<NodeId>>
where
    H: Fn(&str) -> f64,
{
    if !graph.contains(start) || !graph.contains(goal) {
        return None;
    }
    if !constraints.allows(start) || !constraints.allows(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start.to_string()]);
    }

    let mut costs: HashMap<&str, f64> = HashMap::new();
    let mut parents: HashMap<&str, &str> = HashMap::new();
    let mut settled: HashSet<&str> = HashSet::new();
    let mut queue = BinaryHeap::new();

    costs.insert(start, 0.0);
    queue.push(QueueEntry::new(start, 0.0, heuristic(start)));

    while let Some(entry) = queue.pop() {
        if !settled.insert(entry.node) {
            continue;
        }

        if entry.node == goal {
            return Some(reconstruct_path(&parents, start, goal));
        }

        let current_cost = entry.cost.0;
        for edge in graph.neighbours(entry.node) {
            let next = edge.target.as_str();
            if settled.contains(next) || !constraints.allows(next) {
                continue;
            }

            let next_cost = current_cost + edge.cost(mode);
            if next_cost < costs.get(next).copied().unwrap_or(f64::INFINITY) {
                costs.insert(next, next_cost);
                parents.insert(next, entry.node);
                queue.push(QueueEntry::new(next, next_cost, heuristic(next)));
            }
        }
    }

    None
}

fn reconstruct_path(parents: &HashMap<&str, &str>, start: &str, goal: &str) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node.to_string());
        if node == start {
            break;
        }
        current = parents.get(node).copied();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry<'a> {
    node: &'a str,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl<'a> QueueEntry<'a> {
    fn new(node: &'a str, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by estimate, with
        // the smallest node id winning ties.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(self.node))
    }
}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
