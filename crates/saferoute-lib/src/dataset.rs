//! City dataset loading.
//!
//! A dataset is a JSON document describing the street graph of one city:
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "n1", "label": "Parque Caldas", "coordinate": { "lat": 2.4419, "lng": -76.6063 } }
//!   ],
//!   "connections": [["n1", "n2"]],
//!   "danger_zones": [
//!     { "id": "dz1", "name": "...", "polygon": [...], "risk_level": 8, "description": "..." }
//!   ],
//!   "policy": { "rules": [{ "when": { "kind": "in_danger_zone" }, "weight": 10 }] }
//! }
//! ```
//!
//! `policy` is optional and defaults to [`SafetyPolicy::default`].

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{build_graph, Graph, Node, NodeId};
use crate::policy::SafetyPolicy;
use crate::zones::DangerZone;

/// Environment variable overriding the default dataset location.
pub const DATASET_ENV: &str = "SAFEROUTE_DATASET";

/// Default filename for the dataset inside the platform data directory.
const DATASET_FILENAME: &str = "city.json";

/// In-memory city definition as read from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityDataset {
    pub nodes: Vec<Node>,
    pub connections: Vec<(NodeId, NodeId)>,
    #[serde(default)]
    pub danger_zones: Vec<DangerZone>,
    #[serde(default)]
    pub policy: SafetyPolicy,
}

impl CityDataset {
    /// Parse a dataset from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the weighted routing graph described by this dataset.
    pub fn build_graph(&self) -> Result<Graph> {
        build_graph(
            self.nodes.clone(),
            &self.connections,
            self.danger_zones.clone(),
            &self.policy,
        )
    }
}

/// Load a dataset from `path`.
pub fn load_dataset(path: &Path) -> Result<CityDataset> {
    if !path.exists() {
        return Err(Error::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    let dataset = CityDataset::from_json(&contents)?;
    info!(
        path = %path.display(),
        nodes = dataset.nodes.len(),
        connections = dataset.connections.len(),
        zones = dataset.danger_zones.len(),
        "loaded city dataset"
    );
    Ok(dataset)
}

/// Resolve the dataset location.
///
/// Precedence: the explicit path, then the `SAFEROUTE_DATASET` environment
/// variable, then `city.json` inside the platform data directory.
pub fn resolve_dataset_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(value) = env::var_os(DATASET_ENV) {
        if !value.is_empty() {
            let path = PathBuf::from(value);
            debug!(path = %path.display(), "using dataset from {}", DATASET_ENV);
            return Ok(path);
        }
    }

    default_dataset_path()
}

/// Platform-specific default dataset location.
pub fn default_dataset_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("org", "saferoute", "saferoute")
        .ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATASET_FILENAME))
}
