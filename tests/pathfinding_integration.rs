//! Pathfinding integration tests
//!
//! Floors built through the public API, and Dijkstra checked against an
//! exhaustive search over small random graphs.

use dungeon_invasion::core::types::{GridPos, ObjectiveId, RoomId, RoomTypeId};
use dungeon_invasion::dungeon::{
    ConnectionKind, DungeonGraph, Floor, ObjectiveTarget, PathNode, Pathfinder, PathfindingOptions,
    PlacedRoom,
};
use proptest::prelude::*;

fn room(id: u32, x: i32, y: i32, fear: u32) -> PlacedRoom {
    PlacedRoom {
        id: RoomId(id),
        room_type: RoomTypeId::new("chamber"),
        anchor: GridPos::new(x, y),
        width: 3,
        height: 3,
        fear_level: fear,
    }
}

/// Entrance(1) | Hall(2) | Crypt(3, fear 6), with a long hallway 1 -> 4 -> 3 around it
fn test_floor() -> Floor {
    let mut floor = Floor::new(20, 12);
    floor.place_room(room(1, 0, 0, 0)).unwrap();
    floor.place_room(room(2, 3, 0, 0)).unwrap();
    floor.place_room(room(3, 6, 0, 6)).unwrap();
    floor.place_room(room(4, 3, 8, 0)).unwrap();
    floor.connect(RoomId(1), RoomId(4), ConnectionKind::Hallway);
    floor.connect(RoomId(4), RoomId(3), ConnectionKind::Portal);
    floor
}

#[test]
fn test_graph_from_floor_layout() {
    let graph = DungeonGraph::build(&test_floor());

    assert_eq!(graph.node_count(), 4);
    assert!(graph.are_adjacent(RoomId(1), RoomId(2)));
    assert!(graph.are_adjacent(RoomId(2), RoomId(3)));
    assert!(!graph.are_adjacent(RoomId(1), RoomId(3)));
    assert_eq!(graph.edge(RoomId(4), RoomId(3)).unwrap().base_cost, 0.5);
    // Hallway cost grows with the corridor between the rooms
    assert!(graph.edge(RoomId(1), RoomId(4)).unwrap().base_cost > 1.0);
    assert!(graph.is_consistent());
}

#[test]
fn test_morale_changes_the_route() {
    let graph = DungeonGraph::build(&test_floor());
    let pathfinder = Pathfinder::default();

    let terrified = pathfinder
        .find_path(&graph, RoomId(2), RoomId(3), &PathfindingOptions::default().with_morale(0.0))
        .unwrap();
    let brave = pathfinder
        .find_path(&graph, RoomId(2), RoomId(3), &PathfindingOptions::default().with_morale(100.0))
        .unwrap();

    // Same single hop, but full morale makes it cheaper
    assert_eq!(terrified.rooms, vec![RoomId(2), RoomId(3)]);
    assert!(brave.cost < terrified.cost);
}

#[test]
fn test_recalculate_refreshes_fear() {
    let mut floor = test_floor();
    let graph = DungeonGraph::build(&floor);
    floor.room_mut(RoomId(3)).unwrap().fear_level = 0;

    let updated = graph.recalculate(&floor, RoomId(3)).unwrap();

    assert_eq!(updated.node(RoomId(3)).unwrap().fear_level, 0);
    assert_eq!(graph.node(RoomId(3)).unwrap().fear_level, 6);
    assert_eq!(updated.edge_count(), graph.edge_count());
    assert!(graph.recalculate(&floor, RoomId(99)).is_none());
}

#[test]
fn test_objective_route_prefers_priority_on_ties() {
    let graph = DungeonGraph::build(&test_floor());
    let pathfinder = Pathfinder::default();
    let targets = [
        ObjectiveTarget {
            objective: ObjectiveId(1),
            room: RoomId(2),
            priority: 1,
        },
        ObjectiveTarget {
            objective: ObjectiveId(2),
            room: RoomId(2),
            priority: 5,
        },
    ];

    let route = pathfinder
        .find_with_objectives(&graph, RoomId(1), &targets, &PathfindingOptions::default())
        .unwrap();

    assert_eq!(route.objective, ObjectiveId(2));
    assert_eq!(route.path.rooms, vec![RoomId(1), RoomId(2)]);
}

/// Cheapest simple path by exhaustive search
fn brute_force(
    pathfinder: &Pathfinder,
    graph: &DungeonGraph,
    from: RoomId,
    to: RoomId,
    options: &PathfindingOptions,
) -> Option<f64> {
    fn walk(
        pathfinder: &Pathfinder,
        graph: &DungeonGraph,
        path: &mut Vec<RoomId>,
        to: RoomId,
        options: &PathfindingOptions,
        best: &mut Option<f64>,
    ) {
        let Some(&last) = path.last() else { return };
        if last == to {
            let cost = pathfinder.path_cost(graph, path, options);
            if cost.is_finite() && best.map_or(true, |b| cost < b) {
                *best = Some(cost);
            }
            return;
        }
        for edge in graph.edges_from(last) {
            if path.contains(&edge.to) || options.blocked_nodes.contains(&edge.to) {
                continue;
            }
            path.push(edge.to);
            walk(pathfinder, graph, path, to, options, best);
            path.pop();
        }
    }

    let mut best = None;
    walk(pathfinder, graph, &mut vec![from], to, options, &mut best);
    best
}

fn arb_graph() -> impl Strategy<Value = DungeonGraph> {
    (2u32..7).prop_flat_map(|n| {
        let fears = prop::collection::vec(0u32..6, n as usize);
        let links = prop::collection::vec((1..=n, 1..=n, 0.1f64..5.0), 0..(n as usize * 2));
        (fears, links).prop_map(move |(fears, links)| {
            let nodes = fears
                .iter()
                .enumerate()
                .map(|(i, &fear)| PathNode {
                    room_id: RoomId(i as u32 + 1),
                    room_type: RoomTypeId::new("chamber"),
                    position: GridPos::new(i as i32, 0),
                    fear_level: fear,
                })
                .collect();
            let links: Vec<_> = links
                .into_iter()
                .map(|(a, b, cost)| (RoomId(a), RoomId(b), cost))
                .collect();
            DungeonGraph::from_parts(nodes, &links)
        })
    })
}

proptest! {
    #[test]
    fn prop_dijkstra_matches_exhaustive_search(
        graph in arb_graph(),
        morale in 0.0f64..100.0,
        multiplier in 0.0f64..3.0,
    ) {
        let pathfinder = Pathfinder::default();
        let options = PathfindingOptions::default()
            .with_morale(morale)
            .with_fear_cost_multiplier(multiplier);
        let last = graph.node_count() as u32;

        for to in 2..=last {
            let found = pathfinder.find_path(&graph, RoomId(1), RoomId(to), &options);
            let expected = brute_force(&pathfinder, &graph, RoomId(1), RoomId(to), &options);

            match (found, expected) {
                (Some(path), Some(best)) => {
                    prop_assert!((path.cost - best).abs() < 1e-9);
                    prop_assert_eq!(path.rooms.first(), Some(&RoomId(1)));
                    prop_assert_eq!(path.rooms.last(), Some(&RoomId(to)));
                    let recomputed = pathfinder.path_cost(&graph, &path.rooms, &options);
                    prop_assert!((recomputed - path.cost).abs() < 1e-9);
                }
                (None, None) => {}
                (found, expected) => prop_assert!(false, "dijkstra {:?} vs exhaustive {:?}", found, expected),
            }
        }
    }

    #[test]
    fn prop_queries_are_deterministic(graph in arb_graph(), morale in 0.0f64..100.0) {
        let pathfinder = Pathfinder::default();
        let options = PathfindingOptions::default().with_morale(morale);
        let last = RoomId(graph.node_count() as u32);

        let first = pathfinder.find_path(&graph, RoomId(1), last, &options);
        let second = pathfinder.find_path(&graph, RoomId(1), last, &options);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_fear_cost_monotone(fear in 0u32..10, morale in 0.0f64..100.0, extra in 0u32..5, lift in 0.0f64..50.0) {
        let curve = Pathfinder::default().curve;
        let base = curve.multiplier(fear, morale, 1.0);
        prop_assert!(curve.multiplier(fear + extra, morale, 1.0) >= base);
        prop_assert!(curve.multiplier(fear, morale + lift, 1.0) <= base);
        prop_assert!(base >= 1.0);
    }
}
