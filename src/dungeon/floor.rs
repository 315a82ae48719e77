//! Floor layout as handed over by the dungeon-layout subsystem
//!
//! The engine only reads a floor: room footprints on an occupancy grid plus
//! explicit connections (hallways, stairs, elevators, portals).

use serde::{Deserialize, Serialize};

use crate::core::error::{InvasionError, Result};
use crate::core::types::{GridPos, RoomId, RoomTypeId};

/// How two rooms are linked besides sharing a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    Hallway,
    Stairs,
    Elevator,
    Portal,
}

impl ConnectionKind {
    /// Base traversal cost when the connection carries no explicit cost
    pub fn default_cost(self) -> f64 {
        match self {
            ConnectionKind::Hallway => 1.0,
            ConnectionKind::Stairs => 2.0,
            ConnectionKind::Elevator => 1.5,
            ConnectionKind::Portal => 0.5,
        }
    }
}

/// Explicit link between two rooms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: RoomId,
    pub to: RoomId,
    pub kind: ConnectionKind,
    /// Overrides the kind's default cost
    #[serde(default)]
    pub cost: Option<f64>,
}

/// A room placed on the floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedRoom {
    pub id: RoomId,
    pub room_type: RoomTypeId,
    /// Top-left tile of the footprint
    pub anchor: GridPos,
    pub width: u32,
    pub height: u32,
    /// How intimidating the room is to invaders
    #[serde(default)]
    pub fear_level: u32,
}

impl PlacedRoom {
    pub fn tiles(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.height as i32).flat_map(move |dy| {
            (0..self.width as i32).map(move |dx| GridPos::new(self.anchor.x + dx, self.anchor.y + dy))
        })
    }
}

/// Occupancy grid: each tile is empty or belongs to one room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorGrid {
    width: u32,
    height: u32,
    cells: Vec<Option<RoomId>>,
}

impl FloorGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Room occupying a tile; `None` for empty or out-of-bounds tiles
    pub fn occupant(&self, pos: GridPos) -> Option<RoomId> {
        self.index(pos).and_then(|i| self.cells[i])
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.occupant(pos).is_some()
    }

    pub fn set(&mut self, pos: GridPos, room: Option<RoomId>) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = room;
        }
    }

    /// All tiles of a room in row-major order
    pub fn tiles_of(&self, room: RoomId) -> Vec<GridPos> {
        let mut tiles = Vec::new();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let pos = GridPos::new(x, y);
                if self.occupant(pos) == Some(room) {
                    tiles.push(pos);
                }
            }
        }
        tiles
    }
}

/// One dungeon floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub depth: u32,
    pub grid: FloorGrid,
    pub rooms: Vec<PlacedRoom>,
    pub connections: Vec<Connection>,
}

impl Floor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            depth: 1,
            grid: FloorGrid::new(width, height),
            rooms: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Place a rectangular room; fails on overlap, duplicate id, or leaving the grid
    pub fn place_room(&mut self, room: PlacedRoom) -> Result<()> {
        if self.room(room.id).is_some() {
            return Err(InvasionError::InvalidScenario(format!(
                "{} placed twice",
                room.id
            )));
        }

        for tile in room.tiles() {
            if !self.grid.in_bounds(tile) {
                return Err(InvasionError::InvalidScenario(format!(
                    "{} leaves the floor at ({}, {})",
                    room.id, tile.x, tile.y
                )));
            }
            if let Some(other) = self.grid.occupant(tile) {
                return Err(InvasionError::InvalidScenario(format!(
                    "{} overlaps {} at ({}, {})",
                    room.id, other, tile.x, tile.y
                )));
            }
        }

        let tiles: Vec<GridPos> = room.tiles().collect();
        for tile in tiles {
            self.grid.set(tile, Some(room.id));
        }
        self.rooms.push(room);
        Ok(())
    }

    pub fn connect(&mut self, from: RoomId, to: RoomId, kind: ConnectionKind) {
        self.connections.push(Connection {
            from,
            to,
            kind,
            cost: None,
        });
    }

    pub fn room(&self, id: RoomId) -> Option<&PlacedRoom> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut PlacedRoom> {
        self.rooms.iter_mut().find(|r| r.id == id)
    }

    /// Pairs of rooms whose footprints share a tile edge, each pair once, lower id first
    pub fn adjacent_room_pairs(&self) -> Vec<(RoomId, RoomId)> {
        let mut pairs = Vec::new();
        for y in 0..self.grid.height() as i32 {
            for x in 0..self.grid.width() as i32 {
                let pos = GridPos::new(x, y);
                let Some(here) = self.grid.occupant(pos) else {
                    continue;
                };
                // East and south are enough to see every shared edge once
                for next in [GridPos::new(x + 1, y), GridPos::new(x, y + 1)] {
                    if let Some(there) = self.grid.occupant(next) {
                        if there != here {
                            let pair = (here.min(there), here.max(there));
                            if !pairs.contains(&pair) {
                                pairs.push(pair);
                            }
                        }
                    }
                }
            }
        }
        pairs
    }
}
