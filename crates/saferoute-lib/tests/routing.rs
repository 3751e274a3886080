mod common;

use common::{danger_detour_graph, ids, link, node, popayan_graph};
use saferoute_lib::{
    build_graph, find_route, plan_route, Error, RiskLevel, RouteAlgorithm, RouteMode, RouteRequest,
    SafetyPolicy,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.5,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn three_node_line_is_traversed_in_order() {
    let nodes = vec![
        node("a", 0.0, 0.0),
        node("b", 0.0, 0.001),
        node("c", 0.0, 0.002),
    ];
    let graph = build_graph(
        nodes,
        &[link("a", "b"), link("b", "c")],
        Vec::new(),
        &SafetyPolicy::default(),
    )
    .unwrap();

    let route = find_route(&graph, "a", "c", RouteMode::Shortest)
        .unwrap()
        .expect("route exists");
    assert_eq!(route.path, ids(&["a", "b", "c"]));
    // One millidegree of longitude on the equator is roughly 111.19 m.
    assert!((route.total_distance - 222.39).abs() < 0.1);
    assert_eq!(route.average_safety_score, 1.0);
}

#[test]
fn safest_mode_detours_around_danger() {
    let graph = danger_detour_graph();

    let shortest = find_route(&graph, "a", "c", RouteMode::Shortest)
        .unwrap()
        .unwrap();
    assert_eq!(shortest.path, ids(&["a", "b", "c"]));
    assert_eq!(shortest.average_safety_score, 10.0);

    let safest = find_route(&graph, "a", "c", RouteMode::Safest)
        .unwrap()
        .unwrap();
    assert_eq!(safest.path, ids(&["a", "d", "c"]));
    assert_eq!(safest.average_safety_score, 1.0);
    assert!(safest.total_distance > shortest.total_distance);
}

#[test]
fn hospital_route_is_identical_in_both_modes() {
    let graph = popayan_graph();
    let expected = ids(&["n1", "n2", "n3", "n7", "n12", "n8"]);
    for mode in [RouteMode::Shortest, RouteMode::Safest] {
        let route = find_route(&graph, "n1", "n8", mode).unwrap().unwrap();
        assert_eq!(route.path, expected, "mode {mode}");
        assert_close(route.total_distance, 1118.68);
        assert_eq!(route.average_safety_score, 1.0);
        assert_eq!(route.risk_level(), RiskLevel::Low);
    }
}

#[test]
fn teatro_to_esquina_avoids_the_direct_street_when_safest() {
    let graph = popayan_graph();

    let shortest = find_route(&graph, "n6", "n9", RouteMode::Shortest)
        .unwrap()
        .unwrap();
    assert_eq!(shortest.path, ids(&["n6", "n9"]));
    assert_close(shortest.total_distance, 572.01);
    assert_eq!(shortest.average_safety_score, 10.0);
    assert_eq!(shortest.risk_level(), RiskLevel::High);

    let safest = find_route(&graph, "n6", "n9", RouteMode::Safest)
        .unwrap()
        .unwrap();
    assert_eq!(safest.path, ids(&["n6", "n1", "n4", "n9"]));
    assert_close(safest.total_distance, 645.96);
    assert_eq!(safest.average_safety_score, 4.0);
    assert_eq!(safest.risk_level(), RiskLevel::High);
}

#[test]
fn market_route_prefers_the_historic_centre_when_safest() {
    let graph = popayan_graph();

    let shortest = find_route(&graph, "n2", "n14", RouteMode::Shortest)
        .unwrap()
        .unwrap();
    assert_eq!(shortest.path, ids(&["n2", "n14"]));
    assert_close(shortest.total_distance, 741.73);

    let safest = find_route(&graph, "n2", "n14", RouteMode::Safest)
        .unwrap()
        .unwrap();
    assert_eq!(safest.path, ids(&["n2", "n1", "n13", "n14"]));
    assert_close(safest.total_distance, 1012.49);
    assert_eq!(safest.average_safety_score, 4.0);
}

#[test]
fn hospital_to_market_takes_the_long_way_round() {
    let graph = popayan_graph();
    let safest = find_route(&graph, "n8", "n14", RouteMode::Safest)
        .unwrap()
        .unwrap();
    assert_eq!(
        safest.path,
        ids(&["n8", "n12", "n7", "n3", "n2", "n1", "n13", "n14"])
    );
}

#[test]
fn identity_route_has_a_single_node() {
    let graph = popayan_graph();
    for mode in [RouteMode::Shortest, RouteMode::Safest] {
        let route = find_route(&graph, "n5", "n5", mode).unwrap().unwrap();
        assert_eq!(route.path, ids(&["n5"]));
        assert_eq!(route.total_distance, 0.0);
        assert_eq!(route.average_safety_score, 1.0);
        assert_eq!(route.hop_count(), 0);
    }
}

#[test]
fn disconnected_nodes_have_no_route() {
    let nodes = vec![
        node("a", 0.0, 0.0),
        node("b", 0.0, 0.001),
        node("island", 1.0, 1.0),
    ];
    let graph = build_graph(
        nodes,
        &[link("a", "b")],
        Vec::new(),
        &SafetyPolicy::default(),
    )
    .unwrap();

    for mode in [RouteMode::Shortest, RouteMode::Safest] {
        assert!(find_route(&graph, "a", "island", mode).unwrap().is_none());
        assert!(find_route(&graph, "island", "b", mode).unwrap().is_none());
    }
}

#[test]
fn unknown_endpoints_are_errors() {
    let graph = popayan_graph();

    let err = find_route(&graph, "n99", "n8", RouteMode::Safest).unwrap_err();
    assert!(matches!(err, Error::UnknownNode { ref id, .. } if id == "n99"));

    let err = find_route(&graph, "n1", "hospital", RouteMode::Shortest).unwrap_err();
    assert!(matches!(err, Error::UnknownNode { ref id, .. } if id == "hospital"));
}

#[test]
fn equal_cost_ties_prefer_the_smaller_identifier() {
    // Diamond with two mirror-image branches of identical length.
    let build = |north: &str, south: &str| {
        let nodes = vec![
            node("a", 0.0, 0.0),
            node(north, 0.001, 0.001),
            node(south, -0.001, 0.001),
            node("z", 0.0, 0.002),
        ];
        let connections = vec![
            link("a", south),
            link("a", north),
            link(south, "z"),
            link(north, "z"),
        ];
        build_graph(nodes, &connections, Vec::new(), &SafetyPolicy::default()).unwrap()
    };

    let graph = build("b", "c");
    let route = find_route(&graph, "a", "z", RouteMode::Shortest)
        .unwrap()
        .unwrap();
    assert_eq!(route.path, ids(&["a", "b", "z"]));

    let graph = build("c", "b");
    let route = find_route(&graph, "a", "z", RouteMode::Shortest)
        .unwrap()
        .unwrap();
    assert_eq!(route.path, ids(&["a", "b", "z"]));
}

#[test]
fn avoided_nodes_are_routed_around() {
    let graph = popayan_graph();
    let request = RouteRequest::new("n1", "n8", RouteMode::Safest).avoiding(["n3"]);
    let route = plan_route(&graph, &request).unwrap().unwrap();

    assert!(!route.path.iter().any(|id| id == "n3"));
    assert_eq!(route.path.first().map(String::as_str), Some("n1"));
    assert_eq!(route.path.last().map(String::as_str), Some("n8"));
}

#[test]
fn avoiding_an_endpoint_leaves_no_route() {
    let graph = popayan_graph();
    let request = RouteRequest::new("n1", "n8", RouteMode::Safest).avoiding(["n8"]);
    assert!(plan_route(&graph, &request).unwrap().is_none());
}

#[test]
fn avoiding_an_unknown_node_is_an_error() {
    let graph = popayan_graph();
    let request = RouteRequest::new("n1", "n8", RouteMode::Safest).avoiding(["n42"]);
    let err = plan_route(&graph, &request).unwrap_err();
    assert!(matches!(err, Error::UnknownNode { ref id, .. } if id == "n42"));
}

#[test]
fn a_star_matches_dijkstra_on_the_fixture() {
    let graph = popayan_graph();
    let request = RouteRequest::new("n8", "n10", RouteMode::Safest);
    let dijkstra = plan_route(&graph, &request).unwrap().unwrap();
    let a_star_request = request.clone().with_algorithm(RouteAlgorithm::AStar);
    let a_star = plan_route(&graph, &a_star_request).unwrap().unwrap();
    assert_eq!(a_star.path, dijkstra.path);
    assert!((a_star.total_distance - dijkstra.total_distance).abs() < 1e-9);
}
