//! Safety weight policy applied to street segments.
//!
//! A policy is an ordered decision table of `(condition, weight)` rules. Rules
//! are evaluated top-down and the first matching rule decides the weight of a
//! segment; segments that match no rule receive the base weight. New penalty
//! rules are added by extending [`RiskCondition`], never by reshaping the
//! evaluation loop.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{Node, NodeId};
use crate::zones::{ZoneClassifier, ZoneContainment};

/// Weight applied to segments touching a danger zone in the reference policy.
pub const DANGER_ZONE_WEIGHT: f64 = 10.0;

/// Weight applied to segments that match no rule.
pub const BASE_WEIGHT: f64 = 1.0;

/// Predicate evaluated against both endpoints of a street segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskCondition {
    /// Either endpoint lies inside a danger zone.
    InDangerZone,
    /// Either endpoint is one of the listed nodes.
    TouchesNode { nodes: BTreeSet<NodeId> },
}

impl RiskCondition {
    /// Convenience constructor for [`RiskCondition::TouchesNode`].
    pub fn touches<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        RiskCondition::TouchesNode {
            nodes: nodes.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, from: &Node, to: &Node, classifier: &ZoneClassifier) -> bool {
        match self {
            RiskCondition::InDangerZone => {
                classifier.is_in_danger(&from.coordinate) || classifier.is_in_danger(&to.coordinate)
            }
            RiskCondition::TouchesNode { nodes } => {
                nodes.contains(&from.id) || nodes.contains(&to.id)
            }
        }
    }
}

/// A single entry of the decision table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRule {
    pub when: RiskCondition,
    pub weight: f64,
}

impl WeightRule {
    pub fn new(when: RiskCondition, weight: f64) -> Self {
        Self { when, weight }
    }
}

/// Ordered rule set turning segment geometry into a safety weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyPolicy {
    #[serde(default)]
    pub containment: ZoneContainment,
    #[serde(default)]
    pub rules: Vec<WeightRule>,
    #[serde(default = "default_base_weight")]
    pub base_weight: f64,
}

fn default_base_weight() -> f64 {
    BASE_WEIGHT
}

impl Default for SafetyPolicy {
    /// Penalize danger-zone segments by ×10, everything else ×1.
    fn default() -> Self {
        Self::uniform().with_rule(RiskCondition::InDangerZone, DANGER_ZONE_WEIGHT)
    }
}

impl SafetyPolicy {
    /// Policy that assigns the base weight to every segment.
    pub fn uniform() -> Self {
        Self {
            containment: ZoneContainment::BoundingBox,
            rules: Vec::new(),
            base_weight: BASE_WEIGHT,
        }
    }

    /// Append a rule at the lowest priority.
    pub fn with_rule(mut self, when: RiskCondition, weight: f64) -> Self {
        self.rules.push(WeightRule::new(when, weight));
        self
    }

    pub fn with_containment(mut self, containment: ZoneContainment) -> Self {
        self.containment = containment;
        self
    }

    /// Ensure every weight is a finite multiplier of at least 1.
    pub fn validate(&self) -> Result<()> {
        check_weight("base weight", self.base_weight)?;
        for (index, rule) in self.rules.iter().enumerate() {
            check_weight(&format!("rule {index}"), rule.weight)?;
        }
        Ok(())
    }

    /// Weight of the segment between `from` and `to`.
    ///
    /// The result does not depend on the direction of travel.
    pub fn weight_for(&self, from: &Node, to: &Node, classifier: &ZoneClassifier) -> f64 {
        self.rules
            .iter()
            .find(|rule| rule.when.matches(from, to, classifier))
            .map(|rule| rule.weight)
            .unwrap_or(self.base_weight)
    }
}

fn check_weight(label: &str, weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidPolicy {
            message: format!("{label} has weight {weight}; weights must be finite and >= 1"),
        })
    }
}
