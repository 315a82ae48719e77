//! Fear-weighted shortest paths over the room graph
//!
//! Dijkstra, since edge costs are non-negative but not uniform. Entering a
//! room costs its edge's base cost scaled by the room's fear, softened by
//! invader morale. Ties go to the path discovered first, which is fixed by
//! the graph's edge order, so results are deterministic.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::config::FearCurve;
use crate::core::types::{ObjectiveId, RoomId};
use crate::dungeon::graph::{DungeonGraph, PathEdge};

/// Per-query parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathfindingOptions {
    /// Current invader morale
    pub morale: f64,
    /// Scales the fear term; 0 ignores fear entirely
    pub fear_cost_multiplier: f64,
    /// Rooms that cannot be entered (destroyed, sealed)
    pub blocked_nodes: BTreeSet<RoomId>,
}

impl Default for PathfindingOptions {
    fn default() -> Self {
        Self {
            morale: 50.0,
            fear_cost_multiplier: 1.0,
            blocked_nodes: BTreeSet::new(),
        }
    }
}

impl PathfindingOptions {
    pub fn with_morale(mut self, morale: f64) -> Self {
        self.morale = morale;
        self
    }

    pub fn with_fear_cost_multiplier(mut self, multiplier: f64) -> Self {
        self.fear_cost_multiplier = multiplier;
        self
    }

    pub fn blocking(mut self, room: RoomId) -> Self {
        self.blocked_nodes.insert(room);
        self
    }

    /// Options for a party that ignores fear (defenders, emboldened invaders)
    pub fn fearless() -> Self {
        Self::default().with_fear_cost_multiplier(0.0)
    }
}

/// A route between two rooms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// Rooms from start to goal inclusive
    pub rooms: Vec<RoomId>,
    pub cost: f64,
}

impl PathResult {
    /// Room after the start, if the path goes anywhere
    pub fn next_step(&self) -> Option<RoomId> {
        self.rooms.get(1).copied()
    }
}

/// A room an invader wants to reach, with its tie-break priority
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveTarget {
    pub objective: ObjectiveId,
    pub room: RoomId,
    pub priority: i32,
}

/// Route chosen toward the best objective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveRoute {
    pub objective: ObjectiveId,
    pub path: PathResult,
}

/// Shortest-path queries with a fixed fear curve
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pathfinder {
    pub curve: FearCurve,
}

/// Heap entry: cost, then discovery order, so equal costs pop first-found first
type QueueEntry = Reverse<(OrderedFloat<f64>, u64, RoomId)>;

/// Distances and predecessors from one start room
struct ShortestPathTree {
    start: RoomId,
    dist: AHashMap<RoomId, f64>,
    prev: AHashMap<RoomId, RoomId>,
}

impl ShortestPathTree {
    fn path_to(&self, goal: RoomId) -> Option<PathResult> {
        let cost = *self.dist.get(&goal)?;
        let mut rooms = vec![goal];
        let mut current = goal;
        while current != self.start {
            current = *self.prev.get(&current)?;
            rooms.push(current);
        }
        rooms.reverse();
        Some(PathResult { rooms, cost })
    }
}

impl Pathfinder {
    pub fn new(curve: FearCurve) -> Self {
        Self { curve }
    }

    /// Fear multiplier for entering `room`
    pub fn fear_multiplier(&self, graph: &DungeonGraph, room: RoomId, options: &PathfindingOptions) -> f64 {
        let fear = graph.node(room).map(|n| n.fear_level).unwrap_or(0);
        self.curve
            .multiplier(fear, options.morale, options.fear_cost_multiplier)
    }

    /// Effective cost of traversing an edge; infinite into a blocked room
    pub fn get_cost(&self, graph: &DungeonGraph, edge: &PathEdge, options: &PathfindingOptions) -> f64 {
        if options.blocked_nodes.contains(&edge.to) || !graph.contains(edge.to) {
            return f64::INFINITY;
        }
        edge.base_cost * self.fear_multiplier(graph, edge.to, options)
    }

    /// Lowest-cost route between two rooms
    ///
    /// Returns None for unknown or blocked endpoints, disconnected rooms, and
    /// `from == to` (the graph has no self-loops).
    pub fn find_path(
        &self,
        graph: &DungeonGraph,
        from: RoomId,
        to: RoomId,
        options: &PathfindingOptions,
    ) -> Option<PathResult> {
        if from == to || !graph.contains(to) || options.blocked_nodes.contains(&to) {
            return None;
        }
        let tree = self.search(graph, from, options, Some(to))?;
        tree.path_to(to)
    }

    /// Route to the cheapest reachable objective room
    ///
    /// Equal costs prefer the higher priority, then the earlier target. A
    /// target in the start room is reached at cost 0.
    pub fn find_with_objectives(
        &self,
        graph: &DungeonGraph,
        from: RoomId,
        targets: &[ObjectiveTarget],
        options: &PathfindingOptions,
    ) -> Option<ObjectiveRoute> {
        let tree = self.search(graph, from, options, None)?;

        let mut best: Option<(&ObjectiveTarget, f64)> = None;
        for target in targets {
            if options.blocked_nodes.contains(&target.room) && target.room != from {
                continue;
            }
            let Some(&cost) = tree.dist.get(&target.room) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((current, best_cost)) => {
                    cost < best_cost || (cost == best_cost && target.priority > current.priority)
                }
            };
            if better {
                best = Some((target, cost));
            }
        }

        let (target, _) = best?;
        let path = tree.path_to(target.room)?;
        tracing::debug!(
            "Objective route from {} to {} (cost {:.2}, {} rooms)",
            from,
            target.room,
            path.cost,
            path.rooms.len()
        );
        Some(ObjectiveRoute {
            objective: target.objective,
            path,
        })
    }

    /// Sum of effective costs along a room sequence; infinite if any hop is missing
    pub fn path_cost(&self, graph: &DungeonGraph, rooms: &[RoomId], options: &PathfindingOptions) -> f64 {
        rooms
            .windows(2)
            .map(|hop| match graph.edge(hop[0], hop[1]) {
                Some(edge) => self.get_cost(graph, edge, options),
                None => f64::INFINITY,
            })
            .sum()
    }

    /// Dijkstra from `from`; stops early once `goal` is settled
    fn search(
        &self,
        graph: &DungeonGraph,
        from: RoomId,
        options: &PathfindingOptions,
        goal: Option<RoomId>,
    ) -> Option<ShortestPathTree> {
        if !graph.contains(from) || options.blocked_nodes.contains(&from) {
            return None;
        }

        let mut dist: AHashMap<RoomId, f64> = AHashMap::new();
        let mut prev: AHashMap<RoomId, RoomId> = AHashMap::new();
        let mut settled: BTreeSet<RoomId> = BTreeSet::new();
        let mut open: BinaryHeap<QueueEntry> = BinaryHeap::new();
        let mut sequence = 0u64;

        dist.insert(from, 0.0);
        open.push(Reverse((OrderedFloat(0.0), sequence, from)));

        while let Some(Reverse((OrderedFloat(cost), _, current))) = open.pop() {
            if !settled.insert(current) {
                continue;
            }
            if goal == Some(current) {
                break;
            }

            for edge in graph.edges_from(current) {
                let step = self.get_cost(graph, edge, options);
                if !step.is_finite() {
                    continue;
                }
                let tentative = cost + step;
                let known = dist.get(&edge.to).copied().unwrap_or(f64::INFINITY);
                // Strict improvement only: the first-found of equal paths stays
                if tentative < known {
                    dist.insert(edge.to, tentative);
                    prev.insert(edge.to, current);
                    sequence += 1;
                    open.push(Reverse((OrderedFloat(tentative), sequence, edge.to)));
                }
            }
        }

        Some(ShortestPathTree {
            start: from,
            dist,
            prev,
        })
    }
}
