use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::routing::{RouteAlgorithm, RouteMode};
use crate::stats::{RiskLevel, RouteResult};

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
    Note,
}

/// Endpoint within a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteEndpoint {
    pub id: NodeId,
    pub label: String,
}

/// Step taken during traversal of a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub id: NodeId,
    pub label: String,
    /// Length of the segment leading into this step; absent for the origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Safety weight of the segment leading into this step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_weight: Option<f64>,
    /// Danger zones containing this step's coordinate.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<String>,
}

/// Structured representation of a route that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub mode: RouteMode,
    pub algorithm: RouteAlgorithm,
    pub hops: usize,
    pub start: RouteEndpoint,
    pub goal: RouteEndpoint,
    pub steps: Vec<RouteStep>,
    pub total_distance: f64,
    pub average_safety_score: f64,
    pub risk_level: RiskLevel,
}

impl RouteSummary {
    /// Convert a [`RouteResult`] into a summary with resolved labels.
    pub fn from_result(
        graph: &Graph,
        mode: RouteMode,
        algorithm: RouteAlgorithm,
        result: &RouteResult,
    ) -> Result<Self> {
        let mut steps = Vec::with_capacity(result.path.len());
        for (index, id) in result.path.iter().enumerate() {
            let node = graph.require_node(id)?;
            let incoming = index
                .checked_sub(1)
                .and_then(|prev| graph.edge(&result.path[prev], id));
            steps.push(RouteStep {
                index,
                id: id.clone(),
                label: node.label.clone(),
                distance: incoming.map(|edge| edge.distance),
                safety_weight: incoming.map(|edge| edge.safety_weight),
                zones: graph
                    .classifier()
                    .zones_containing(&node.coordinate)
                    .map(|zone| zone.name.clone())
                    .collect(),
            });
        }

        let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
            return Err(Error::EmptyRoute);
        };
        let start = RouteEndpoint {
            id: first.id.clone(),
            label: first.label.clone(),
        };
        let goal = RouteEndpoint {
            id: last.id.clone(),
            label: last.label.clone(),
        };

        Ok(Self {
            mode,
            algorithm,
            hops: result.hop_count(),
            start,
            goal,
            steps,
            total_distance: result.total_distance,
            average_safety_score: result.average_safety_score,
            risk_level: result.risk_level(),
        })
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
            RouteRenderMode::Note => self.render_note(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route from {} to {} ({} segments; mode: {}, algorithm: {}):",
            self.start.label, self.goal.label, self.hops, self.mode, self.algorithm
        );
        for step in &self.steps {
            let _ = write!(buffer, " - {}", step.label);
            if let (Some(distance), Some(weight)) = (step.distance, step.safety_weight) {
                let _ = write!(buffer, " ({:.0}m, weight x{})", distance, weight);
            }
            if !step.zones.is_empty() {
                let _ = write!(buffer, " [danger: {}]", step.zones.join(", "));
            }
            buffer.push('\n');
        }
        let _ = writeln!(buffer, "\nTotal distance: {:.0}m", self.total_distance);
        let _ = writeln!(
            buffer,
            "Average safety score: {:.2} (risk: {})",
            self.average_safety_score, self.risk_level
        );
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Route** _{} → {}_ ({} segments, mode: `{}`, risk: **{}**)",
            self.start.label, self.goal.label, self.hops, self.mode, self.risk_level
        );
        for step in &self.steps {
            let _ = write!(
                buffer,
                "* {:>2}. **{}** (`{}`)",
                step.index, step.label, step.id
            );
            if let Some(weight) = step.safety_weight {
                let _ = write!(buffer, " ×{}", weight);
            }
            buffer.push('\n');
        }
        let _ = writeln!(
            buffer,
            "\n_{:.0} m, average safety score {:.2}_",
            self.total_distance, self.average_safety_score
        );
        buffer
    }

    fn render_note(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "{} -> {} ({:.0}m, {} risk)",
            self.start.label, self.goal.label, self.total_distance, self.risk_level
        );
        for step in &self.steps {
            let _ = writeln!(buffer, "{}", step.label);
        }
        buffer
    }
}
