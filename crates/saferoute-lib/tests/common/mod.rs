#![allow(dead_code)]

use std::path::PathBuf;

use saferoute_lib::{
    build_graph, load_dataset, risk_profile, Coordinate, DangerZone, Graph, Node, NodeId,
    RouteResult, SafetyPolicy,
};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn popayan_graph() -> Graph {
    let path = fixtures_dir().join("popayan.json");
    load_dataset(&path)
        .expect("load fixture popayan.json")
        .build_graph()
        .expect("fixture graph builds")
}

pub fn node(id: &str, lat: f64, lng: f64) -> Node {
    Node::new(id, id.to_uppercase(), Coordinate { lat, lng })
}

pub fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate { lat, lng }
}

pub fn link(from: &str, to: &str) -> (NodeId, NodeId) {
    (from.to_string(), to.to_string())
}

/// Axis-aligned rectangle zone spanning the given corners.
pub fn rect_zone(id: &str, south: f64, west: f64, north: f64, east: f64) -> DangerZone {
    DangerZone {
        id: id.to_string(),
        name: format!("Zone {id}"),
        polygon: vec![
            coord(south, west),
            coord(north, west),
            coord(north, east),
            coord(south, east),
        ],
        risk_level: 8,
        description: String::new(),
    }
}

/// Straight street A-B-C along the equator with a northern detour A-D-C;
/// the danger zone covers B only.
pub fn danger_detour_graph() -> Graph {
    let nodes = vec![
        node("a", 0.0, 0.0),
        node("b", 0.0, 0.001),
        node("c", 0.0, 0.002),
        node("d", 0.0005, 0.001),
    ];
    let connections = vec![
        link("a", "b"),
        link("b", "c"),
        link("a", "d"),
        link("d", "c"),
    ];
    let zone = rect_zone("dz", -0.0002, 0.0009, 0.0002, 0.0011);
    build_graph(nodes, &connections, vec![zone], &SafetyPolicy::default())
        .expect("detour graph builds")
}

/// Cost of a route under the safest-mode cost function.
pub fn weighted_cost(graph: &Graph, route: &RouteResult) -> f64 {
    risk_profile(graph, &route.path)
        .iter()
        .map(|segment| segment.distance * segment.safety_weight)
        .sum()
}

pub fn ids(list: &[&str]) -> Vec<NodeId> {
    list.iter().map(|id| id.to_string()).collect()
}
