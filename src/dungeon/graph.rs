//! Room graph built from a floor
//!
//! One node per placed room, one symmetric edge pair per wall adjacency or
//! explicit connection. The graph is a value: layout changes produce a new
//! graph rather than editing this one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{GridPos, RoomId, RoomTypeId};
use crate::dungeon::floor::{ConnectionKind, Floor};
use crate::dungeon::tiles::corridor_length;

/// Base cost between rooms that share a wall
pub const ADJACENT_ROOM_COST: f64 = 1.0;

/// Added hallway cost per corridor tile
pub const HALLWAY_TILE_COST: f64 = 0.25;

/// Snapshot of a room at graph-build time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub room_id: RoomId,
    pub room_type: RoomTypeId,
    pub position: GridPos,
    pub fear_level: u32,
}

/// Directed traversal from one room to another
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathEdge {
    pub from: RoomId,
    pub to: RoomId,
    pub base_cost: f64,
}

/// Navigable graph of one floor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DungeonGraph {
    nodes: BTreeMap<RoomId, PathNode>,
    adjacency: BTreeMap<RoomId, Vec<PathEdge>>,
}

impl DungeonGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full rebuild from a floor
    pub fn build(floor: &Floor) -> Self {
        let mut graph = Self::new();

        for room in &floor.rooms {
            graph.insert_node(PathNode {
                room_id: room.id,
                room_type: room.room_type.clone(),
                position: room.anchor,
                fear_level: room.fear_level,
            });
        }

        for (a, b) in floor.adjacent_room_pairs() {
            graph.link(a, b, ADJACENT_ROOM_COST);
        }

        for connection in &floor.connections {
            let cost = match (connection.cost, connection.kind) {
                (Some(cost), _) => cost,
                (None, ConnectionKind::Hallway) => {
                    match corridor_length(&floor.grid, connection.from, connection.to) {
                        Some(tiles) => {
                            ConnectionKind::Hallway.default_cost() + tiles as f64 * HALLWAY_TILE_COST
                        }
                        None => ConnectionKind::Hallway.default_cost(),
                    }
                }
                (None, kind) => kind.default_cost(),
            };
            graph.link(connection.from, connection.to, cost);
        }

        tracing::debug!(
            "Built dungeon graph for floor {}: {} rooms, {} edges",
            floor.depth,
            graph.node_count(),
            graph.edge_count()
        );
        debug_assert!(graph.is_consistent());
        graph
    }

    /// Build a graph directly from nodes and undirected links
    ///
    /// Same rules as `build`: links to unknown rooms and self-links are
    /// ignored, duplicate pairs keep the cheaper cost.
    pub fn from_parts(nodes: Vec<PathNode>, links: &[(RoomId, RoomId, f64)]) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.insert_node(node);
        }
        for &(a, b, cost) in links {
            graph.link(a, b, cost);
        }
        debug_assert!(graph.is_consistent());
        graph
    }

    fn insert_node(&mut self, node: PathNode) {
        self.adjacency.entry(node.room_id).or_default();
        self.nodes.insert(node.room_id, node);
    }

    /// Add the symmetric edge pair between two known rooms
    fn link(&mut self, a: RoomId, b: RoomId, cost: f64) {
        if a == b || !self.nodes.contains_key(&a) || !self.nodes.contains_key(&b) {
            return;
        }
        let cost = cost.max(0.0);
        self.upsert_edge(a, b, cost);
        self.upsert_edge(b, a, cost);
    }

    fn upsert_edge(&mut self, from: RoomId, to: RoomId, cost: f64) {
        let edges = self.adjacency.entry(from).or_default();
        match edges.iter_mut().find(|e| e.to == to) {
            Some(existing) => existing.base_cost = existing.base_cost.min(cost),
            None => edges.push(PathEdge {
                from,
                to,
                base_cost: cost,
            }),
        }
    }

    /// New graph with one room's fear level refreshed from the floor
    ///
    /// Edges are left untouched. Returns None if the room is unknown to the
    /// graph or the floor; callers then fall back to a full rebuild.
    pub fn recalculate(&self, floor: &Floor, room_id: RoomId) -> Option<DungeonGraph> {
        let room = floor.room(room_id)?;
        let mut graph = self.clone();
        let node = graph.nodes.get_mut(&room_id)?;
        node.fear_level = room.fear_level;
        Some(graph)
    }

    pub fn node(&self, room_id: RoomId) -> Option<&PathNode> {
        self.nodes.get(&room_id)
    }

    pub fn contains(&self, room_id: RoomId) -> bool {
        self.nodes.contains_key(&room_id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PathNode> {
        self.nodes.values()
    }

    /// Outgoing edges in stable insertion order
    pub fn edges_from(&self, room_id: RoomId) -> &[PathEdge] {
        self.adjacency
            .get(&room_id)
            .map(|edges| edges.as_slice())
            .unwrap_or(&[])
    }

    pub fn edge(&self, from: RoomId, to: RoomId) -> Option<&PathEdge> {
        self.edges_from(from).iter().find(|e| e.to == to)
    }

    pub fn are_adjacent(&self, from: RoomId, to: RoomId) -> bool {
        self.edge(from, to).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Directed edge count (each adjacency counts twice)
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every adjacency key has a node, no duplicate or self edges, every edge mirrored
    pub fn is_consistent(&self) -> bool {
        self.adjacency.iter().all(|(from, edges)| {
            self.nodes.contains_key(from)
                && edges.iter().enumerate().all(|(i, edge)| {
                    edge.from == *from
                        && edge.to != *from
                        && self.nodes.contains_key(&edge.to)
                        && !edges[..i].iter().any(|earlier| earlier.to == edge.to)
                        && self.edge(edge.to, edge.from).is_some()
                })
        })
    }
}
