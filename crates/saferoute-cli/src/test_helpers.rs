// Test utilities used across `saferoute-cli` unit tests.
// Kept under `#[cfg(test)]` so it is not part of the public crate API.
use saferoute_lib::{RiskLevel, RouteAlgorithm, RouteEndpoint, RouteMode, RouteStep, RouteSummary};

fn step(index: usize, id: &str, label: &str) -> RouteStep {
    RouteStep {
        index,
        id: id.to_string(),
        label: label.to_string(),
        distance: None,
        safety_weight: None,
        zones: Vec::new(),
    }
}

/// Three-stop route whose middle stop lies inside a danger zone.
pub fn sample_summary() -> RouteSummary {
    let mut market = step(1, "market", "Market");
    market.distance = Some(1111.7);
    market.safety_weight = Some(10.0);
    market.zones = vec!["Night Market".to_string()];

    let mut station = step(2, "station", "Station");
    station.distance = Some(1111.7);
    station.safety_weight = Some(10.0);

    RouteSummary {
        mode: RouteMode::Shortest,
        algorithm: RouteAlgorithm::Dijkstra,
        hops: 2,
        start: RouteEndpoint {
            id: "plaza".to_string(),
            label: "Plaza".to_string(),
        },
        goal: RouteEndpoint {
            id: "station".to_string(),
            label: "Station".to_string(),
        },
        steps: vec![step(0, "plaza", "Plaza"), market, station],
        total_distance: 2223.4,
        average_safety_score: 10.0,
        risk_level: RiskLevel::High,
    }
}
