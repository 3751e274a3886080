use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::policy::SafetyPolicy;
use crate::routing::RouteMode;
use crate::zones::{DangerZone, ZoneClassifier};

/// Maximum number of suggestions attached to [`Error::UnknownNode`].
const MAX_SUGGESTIONS: usize = 3;

/// Minimum Jaro-Winkler similarity for a node to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// String identifier for a graph node.
pub type NodeId = String;

/// Street intersection or point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub coordinate: Coordinate,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            coordinate,
        }
    }
}

/// Directed edge within the routing graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Great-circle length of the segment in metres.
    pub distance: f64,
    /// Risk multiplier, always >= 1.
    pub safety_weight: f64,
}

impl Edge {
    /// Traversal cost of this edge under the given mode.
    pub fn cost(&self, mode: RouteMode) -> f64 {
        match mode {
            RouteMode::Shortest => self.distance,
            RouteMode::Safest => self.distance * self.safety_weight,
        }
    }
}

/// Immutable street graph shared by all routing queries.
///
/// Cloning is cheap; the node table, adjacency and zones are reference counted.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Arc<BTreeMap<NodeId, Node>>,
    adjacency: Arc<HashMap<NodeId, Vec<Edge>>>,
    zones: Arc<ZoneClassifier>,
}

impl Graph {
    /// Lookup a node by identifier.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes ordered by identifier.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges (twice the number of street segments).
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Outgoing edges of a node in connection declaration order.
    pub fn neighbours(&self, id: &str) -> &[Edge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The directed edge from `source` to `target`, if one exists.
    pub fn edge(&self, source: &str, target: &str) -> Option<&Edge> {
        self.neighbours(source)
            .iter()
            .find(|edge| edge.target == target)
    }

    /// Every directed edge, grouped by source node in identifier order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.nodes.keys().flat_map(|id| self.neighbours(id).iter())
    }

    /// Classifier built from the danger zones this graph was weighted with.
    pub fn classifier(&self) -> &ZoneClassifier {
        &self.zones
    }

    pub fn danger_zones(&self) -> &[DangerZone] {
        self.zones.zones()
    }

    /// Lookup a node by identifier, failing with suggestions when it is missing.
    pub fn require_node(&self, id: &str) -> Result<&Node> {
        self.node(id).ok_or_else(|| Error::UnknownNode {
            id: id.to_string(),
            suggestions: self.fuzzy_matches(id, MAX_SUGGESTIONS),
        })
    }

    /// Resolve user input to a node: an exact identifier first, then a
    /// case-insensitive label match.
    pub fn resolve(&self, query: &str) -> Result<&Node> {
        if let Some(node) = self.node(query) {
            return Ok(node);
        }
        let trimmed = query.trim();
        self.nodes
            .values()
            .find(|node| node.label.eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::UnknownNode {
                id: query.to_string(),
                suggestions: self.fuzzy_matches(query, MAX_SUGGESTIONS),
            })
    }

    /// Node identifiers whose id or label resemble `query`, best match first.
    pub fn fuzzy_matches(&self, query: &str, limit: usize) -> Vec<String> {
        rank_similar(self.nodes.values(), query, limit)
    }
}

fn rank_similar<'a>(
    nodes: impl Iterator<Item = &'a Node>,
    query: &str,
    limit: usize,
) -> Vec<String> {
    let needle = query.to_lowercase();
    let mut scored: Vec<(f64, &str)> = nodes
        .map(|node| {
            let by_id = strsim::jaro_winkler(&needle, &node.id.to_lowercase());
            let by_label = strsim::jaro_winkler(&needle, &node.label.to_lowercase());
            (by_id.max(by_label), node.id.as_str())
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, id)| id.to_string())
        .collect()
}

/// Build the weighted street graph.
///
/// Every connection yields two directed edges with identical distance and
/// safety weight. Node coordinates, zones and the policy are validated here so
/// that queries never see malformed input. Repeated connections between the
/// same pair of nodes are collapsed onto the first declaration.
pub fn build_graph(
    nodes: Vec<Node>,
    connections: &[(NodeId, NodeId)],
    zones: Vec<DangerZone>,
    policy: &SafetyPolicy,
) -> Result<Graph> {
    policy.validate()?;
    let classifier = ZoneClassifier::new(zones, policy.containment)?;

    let mut node_table: BTreeMap<NodeId, Node> = BTreeMap::new();
    for node in nodes {
        node.coordinate.validate()?;
        if node_table.contains_key(&node.id) {
            return Err(Error::DuplicateNode { id: node.id });
        }
        node_table.insert(node.id.clone(), node);
    }

    let mut adjacency: HashMap<NodeId, Vec<Edge>> = node_table
        .keys()
        .map(|id| (id.clone(), Vec::new()))
        .collect();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();

    for (from_id, to_id) in connections {
        if from_id == to_id {
            return Err(Error::InvalidConnection {
                from: from_id.clone(),
                to: to_id.clone(),
                reason: "a street segment must join two distinct nodes".to_string(),
            });
        }
        let from = lookup(&node_table, from_id)?;
        let to = lookup(&node_table, to_id)?;

        let key = if from_id <= to_id {
            (from_id.as_str(), to_id.as_str())
        } else {
            (to_id.as_str(), from_id.as_str())
        };
        if !seen.insert(key) {
            warn!(from = %from_id, to = %to_id, "ignoring duplicate street connection");
            continue;
        }

        let distance = from.coordinate.distance_to(&to.coordinate);
        let safety_weight = policy.weight_for(from, to, &classifier);
        debug!(
            from = %from_id,
            to = %to_id,
            distance,
            safety_weight,
            "built street segment"
        );

        push_edge(&mut adjacency, from_id, to_id, distance, safety_weight);
        push_edge(&mut adjacency, to_id, from_id, distance, safety_weight);
    }

    let graph = Graph {
        nodes: Arc::new(node_table),
        adjacency: Arc::new(adjacency),
        zones: Arc::new(classifier),
    };
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        zones = graph.danger_zones().len(),
        "graph constructed"
    );
    Ok(graph)
}

fn lookup<'a>(nodes: &'a BTreeMap<NodeId, Node>, id: &str) -> Result<&'a Node> {
    nodes.get(id).ok_or_else(|| Error::UnknownNode {
        id: id.to_string(),
        suggestions: rank_similar(nodes.values(), id, MAX_SUGGESTIONS),
    })
}

fn push_edge(
    adjacency: &mut HashMap<NodeId, Vec<Edge>>,
    source: &str,
    target: &str,
    distance: f64,
    safety_weight: f64,
) {
    let edge = Edge {
        source: source.to_string(),
        target: target.to_string(),
        distance,
        safety_weight,
    };
    adjacency.entry(source.to_string()).or_default().push(edge);
}
