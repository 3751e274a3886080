//! SafeRoute library entry points.
//!
//! This crate builds a weighted street graph from nodes, street connections
//! and danger zones, then answers shortest and safest route queries over it.
//! Higher-level consumers (the CLI, or any hosting application) should only
//! depend on the functions exported here instead of reimplementing behavior.
//!
//! The graph is immutable once built and cheap to clone, so any number of
//! threads may query it concurrently.

#![deny(warnings)]

pub mod advice;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod graph;
pub mod output;
pub mod path;
pub mod policy;
pub mod routing;
pub mod stats;
pub mod zones;

pub use advice::{
    advise_or_fallback, provider_from_config, Advice, AdviceConfig, AdviceProvider, AdviceRequest,
    GenerativeAdviceClient, StaticAdvice,
};
pub use dataset::{load_dataset, resolve_dataset_path, CityDataset};
pub use error::{Error, Result};
pub use geo::{haversine_distance, Coordinate};
pub use graph::{build_graph, Edge, Graph, Node, NodeId};
pub use output::{RouteEndpoint, RouteRenderMode, RouteStep, RouteSummary};
pub use policy::{RiskCondition, SafetyPolicy, WeightRule};
pub use routing::{
    find_route, plan_route, RouteAlgorithm, RouteConstraints, RouteMode, RouteRequest,
};
pub use stats::{risk_profile, summarize_path, RiskLevel, RouteResult, SegmentRisk};
pub use zones::{is_in_zone, DangerZone, ZoneClassifier, ZoneContainment};
