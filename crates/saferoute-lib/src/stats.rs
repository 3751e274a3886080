//! Route statistics recomputed from the traversed edges of a path.
//!
//! Search costs are mode-scaled and are not reported; every figure here comes
//! from looking up the actual edge between consecutive path nodes.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::graph::{Graph, NodeId};

/// Average safety score reported for a route without edges.
pub const NEUTRAL_SAFETY_SCORE: f64 = 1.0;

/// Resolved route with aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Node identifiers from source to destination.
    pub path: Vec<NodeId>,
    /// Sum of traversed edge distances in metres.
    pub total_distance: f64,
    /// Mean safety weight of the traversed edges.
    pub average_safety_score: f64,
}

impl RouteResult {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.average_safety_score)
    }
}

/// Summarize a resolved path.
///
/// Pairs without a connecting edge are skipped and excluded from both the sums
/// and the edge count used for averaging.
pub fn summarize_path(graph: &Graph, path: &[NodeId]) -> RouteResult {
    let mut total_distance = 0.0;
    let mut total_weight = 0.0;
    let mut edge_count = 0usize;

    for pair in path.windows(2) {
        match graph.edge(&pair[0], &pair[1]) {
            Some(edge) => {
                total_distance += edge.distance;
                total_weight += edge.safety_weight;
                edge_count += 1;
            }
            None => warn!(from = %pair[0], to = %pair[1], "path step has no edge; skipping"),
        }
    }

    let average_safety_score = if edge_count > 0 {
        total_weight / edge_count as f64
    } else {
        NEUTRAL_SAFETY_SCORE
    };

    RouteResult {
        path: path.to_vec(),
        total_distance,
        average_safety_score,
    }
}

/// Risk carried by a single traversed segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRisk {
    pub from: NodeId,
    pub to: NodeId,
    pub distance: f64,
    pub safety_weight: f64,
}

/// Per-segment risk profile of a path, in travel order.
///
/// Pairs without a connecting edge are omitted.
pub fn risk_profile(graph: &Graph, path: &[NodeId]) -> Vec<SegmentRisk> {
    path.windows(2)
        .filter_map(|pair| graph.edge(&pair[0], &pair[1]))
        .map(|edge| SegmentRisk {
            from: edge.source.clone(),
            to: edge.target.clone(),
            distance: edge.distance,
            safety_weight: edge.safety_weight,
        })
        .collect()
}

/// Coarse band for an average safety score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Below 1.5 is low, below 4 is medium, anything else is high.
    pub fn from_score(score: f64) -> Self {
        if score < 1.5 {
            RiskLevel::Low
        } else if score < 4.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        f.write_str(value)
    }
}
