mod common;

use common::{six_artists, unknown_id};
use soundpath_core::{
    Algorithm, CancelFlag, EngineError, ExploreOutcome, ExploreResult, SearchOptions,
};

fn options(min_similarity: f32, max_relations: usize, budget: usize) -> SearchOptions {
    SearchOptions {
        min_similarity: Some(min_similarity),
        max_relations: Some(max_relations),
        budget: Some(budget),
        ..Default::default()
    }
}

fn node_names(result: &ExploreResult) -> Vec<&str> {
    result
        .subgraph
        .nodes
        .iter()
        .map(|node| node.name.as_str())
        .collect()
}

#[test]
fn budget_stops_bfs_after_the_first_layer() {
    let fixture = six_artists();
    let engine = fixture.engine();

    let result = engine
        .explore_forward(
            fixture.id("Arcade Fire"),
            Algorithm::Bfs,
            &options(0.0, 10, 3),
        )
        .unwrap();

    assert_eq!(result.outcome, ExploreOutcome::Complete);
    assert_eq!(result.root.name, "Arcade Fire");
    let mut found = node_names(&result);
    found.sort_unstable();
    assert_eq!(found, vec!["Arcade Fire", "Beach House", "Caribou"]);
}

#[test]
fn bfs_layers_count_hops_from_the_root() {
    let fixture = six_artists();
    let engine = fixture.engine();

    let result = engine
        .explore_forward(
            fixture.id("Arcade Fire"),
            Algorithm::Bfs,
            &options(0.0, 10, 4),
        )
        .unwrap();

    assert_eq!(result.subgraph.nodes.len(), 4);
    for node in &result.subgraph.nodes {
        let expected = match node.name.as_str() {
            "Arcade Fire" => 0,
            "Beach House" | "Caribou" => 1,
            "Deerhunter" => 2,
            other => panic!("unexpected artist {other}"),
        };
        assert_eq!(node.layer, Some(expected), "layer of {}", node.name);
        assert!(node.cost.is_none());
    }
}

#[test]
fn emitted_edges_stay_inside_the_emitted_nodes() {
    let fixture = six_artists();
    let engine = fixture.engine();

    let result = engine
        .explore_forward(
            fixture.id("Arcade Fire"),
            Algorithm::Bfs,
            &options(0.5, 10, 10),
        )
        .unwrap();

    // The 0.5 floor prunes A→C and E→F.
    let mut found = node_names(&result);
    found.sort_unstable();
    assert_eq!(
        found,
        vec!["Arcade Fire", "Beach House", "Deerhunter", "Efterklang"]
    );

    let node_ids: Vec<_> = result.subgraph.nodes.iter().map(|node| node.id).collect();
    assert_eq!(result.subgraph.edges.len(), 3);
    for edge in &result.subgraph.edges {
        assert!(node_ids.contains(&edge.from));
        assert!(node_ids.contains(&edge.to));
        assert!(edge.similarity >= 0.5);
    }
}

#[test]
fn reverse_exploration_follows_incoming_edges() {
    let fixture = six_artists();
    let engine = fixture.engine();

    let result = engine
        .explore_reverse(
            fixture.id("Deerhunter"),
            Algorithm::Bfs,
            &options(0.0, 10, 10),
        )
        .unwrap();

    let mut found = node_names(&result);
    found.sort_unstable();
    assert_eq!(
        found,
        vec!["Arcade Fire", "Beach House", "Caribou", "Deerhunter", "Efterklang", "Fleet Foxes"]
    );

    // Edges keep their natural orientation: predecessors point at Deerhunter.
    let to_deerhunter: Vec<_> = result
        .subgraph
        .edges
        .iter()
        .filter(|edge| edge.to == fixture.id("Deerhunter"))
        .collect();
    assert_eq!(to_deerhunter.len(), 2);
    assert!(to_deerhunter
        .iter()
        .any(|edge| edge.from == fixture.id("Beach House") && edge.similarity == 0.8));
    assert!(to_deerhunter
        .iter()
        .any(|edge| edge.from == fixture.id("Caribou") && edge.similarity == 0.5));
}

#[test]
fn weighted_exploration_finalizes_cheapest_first() {
    let fixture = six_artists();
    let engine = fixture.engine();

    let result = engine
        .explore_forward(
            fixture.id("Arcade Fire"),
            Algorithm::Dijkstra,
            &options(0.0, 10, 4),
        )
        .unwrap();

    // The cheapest four: A itself, then B (0.9), D (0.9·0.8), E (·0.9);
    // C at 0.4 stays outside the budget.
    let mut found = node_names(&result);
    found.sort_unstable();
    assert_eq!(
        found,
        vec!["Arcade Fire", "Beach House", "Deerhunter", "Efterklang"]
    );

    for node in &result.subgraph.nodes {
        assert!(node.layer.is_none());
        let cost = node.cost.unwrap();
        if node.name == "Arcade Fire" {
            assert_eq!(cost, 0.0);
        } else {
            assert!(cost > 0.0);
        }
    }
}

#[test]
fn budget_of_one_returns_only_the_root() {
    let fixture = six_artists();
    let engine = fixture.engine();

    let result = engine
        .explore_forward(
            fixture.id("Arcade Fire"),
            Algorithm::Bfs,
            &options(0.0, 10, 1),
        )
        .unwrap();

    assert_eq!(node_names(&result), vec!["Arcade Fire"]);
    assert!(result.subgraph.edges.is_empty());
    assert_eq!(result.stats.artists_visited, 0);
}

#[test]
fn unknown_root_is_rejected() {
    let fixture = six_artists();
    let engine = fixture.engine();
    assert!(matches!(
        engine.explore_forward(unknown_id(), Algorithm::Bfs, &SearchOptions::default()),
        Err(EngineError::UnknownArtist(_))
    ));
}

#[test]
fn preset_cancel_flag_stops_exploration() {
    let fixture = six_artists();
    let engine = fixture.engine();

    let cancel = CancelFlag::new();
    cancel.cancel();
    let result = engine
        .explore_forward(
            fixture.id("Arcade Fire"),
            Algorithm::Bfs,
            &SearchOptions {
                cancel: Some(cancel),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(result.outcome, ExploreOutcome::Cancelled);
    assert_eq!(node_names(&result), vec!["Arcade Fire"]);
}

#[test]
fn exploration_is_deterministic() {
    let fixture = six_artists();
    let engine = fixture.engine();

    for algorithm in [Algorithm::Bfs, Algorithm::Dijkstra] {
        let first = engine
            .explore_forward(fixture.id("Arcade Fire"), algorithm, &options(0.0, 10, 5))
            .unwrap();
        let second = engine
            .explore_forward(fixture.id("Arcade Fire"), algorithm, &options(0.0, 10, 5))
            .unwrap();
        assert_eq!(node_names(&first), node_names(&second));
        assert_eq!(first.subgraph.edges, second.subgraph.edges);
        assert_eq!(first.stats.artists_visited, second.stats.artists_visited);
        assert_eq!(first.stats.edges_considered, second.stats.edges_considered);
    }
}
