//! Tile-level pathing on the occupancy grid
//!
//! Breadth-first search over 4-connected tiles. Used for corridor movement and
//! for measuring the corridor between two rooms that share no wall.

use std::collections::VecDeque;

use ahash::AHashMap;

use crate::core::types::{GridPos, RoomId};
use crate::dungeon::floor::FloorGrid;

/// Shortest 4-directional path between two tiles across empty floor
///
/// Tiles of the rooms holding the start and goal are passable, so a walk can
/// begin or end anywhere inside a room; other rooms obstruct. The path
/// includes both endpoints. Returns None if no route exists.
pub fn find_tile_path(grid: &FloorGrid, start: GridPos, goal: GridPos) -> Option<Vec<GridPos>> {
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let endpoints = [grid.occupant(start), grid.occupant(goal)];
    bfs(
        grid,
        &[start],
        |pos| pos == goal,
        |pos| match grid.occupant(pos) {
            None => true,
            occupant => pos == goal || endpoints.contains(&occupant),
        },
    )
}

/// Shortest tile route from any tile of `from` to any tile of `to`
///
/// Tiles belonging to either room are passable along with empty floor; any
/// other room's tiles obstruct. The first tile lies in `from`, the last in `to`.
pub fn find_room_to_room_path(grid: &FloorGrid, from: RoomId, to: RoomId) -> Option<Vec<GridPos>> {
    let sources = grid.tiles_of(from);
    if sources.is_empty() || from == to {
        return None;
    }

    bfs(
        grid,
        &sources,
        |pos| grid.occupant(pos) == Some(to),
        |pos| match grid.occupant(pos) {
            None => true,
            Some(room) => room == from || room == to,
        },
    )
}

/// Number of empty corridor tiles crossed between two rooms
pub fn corridor_length(grid: &FloorGrid, from: RoomId, to: RoomId) -> Option<usize> {
    let path = find_room_to_room_path(grid, from, to)?;
    Some(path.iter().filter(|&&pos| !grid.is_occupied(pos)).count())
}

fn bfs(
    grid: &FloorGrid,
    sources: &[GridPos],
    is_goal: impl Fn(GridPos) -> bool,
    passable: impl Fn(GridPos) -> bool,
) -> Option<Vec<GridPos>> {
    let mut came_from: AHashMap<GridPos, Option<GridPos>> = AHashMap::new();
    let mut frontier = VecDeque::new();

    for &source in sources {
        came_from.insert(source, None);
        frontier.push_back(source);
    }

    while let Some(current) = frontier.pop_front() {
        if is_goal(current) {
            return Some(reconstruct_path(&came_from, current));
        }

        for next in current.neighbors4() {
            if !grid.in_bounds(next) || came_from.contains_key(&next) || !passable(next) {
                continue;
            }
            came_from.insert(next, Some(current));
            frontier.push_back(next);
        }
    }

    None
}

fn reconstruct_path(came_from: &AHashMap<GridPos, Option<GridPos>>, mut current: GridPos) -> Vec<GridPos> {
    let mut path = vec![current];
    while let Some(&Some(prev)) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
