//! Dungeon Invasion - turn-based raid engine
//!
//! Invaders path through a fear-weighted room graph toward their objectives
//! while the dungeon's defenders fight back, one initiative round at a time.

pub mod combat;
pub mod content;
pub mod core;
pub mod dungeon;
pub mod invasion;
pub mod scenario;
