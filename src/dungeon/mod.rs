//! Dungeon layout input and navigation
//!
//! A floor comes in read-only from the layout subsystem. The room graph is
//! rebuilt from it whenever the layout changes; pathfinding never mutates it.

pub mod floor;
pub mod graph;
pub mod pathfinding;
pub mod tiles;

pub use floor::{Connection, ConnectionKind, Floor, FloorGrid, PlacedRoom};
pub use graph::{DungeonGraph, PathEdge, PathNode, ADJACENT_ROOM_COST, HALLWAY_TILE_COST};
pub use pathfinding::{
    ObjectiveRoute, ObjectiveTarget, PathResult, Pathfinder, PathfindingOptions,
};
pub use tiles::{corridor_length, find_room_to_room_path, find_tile_path};
