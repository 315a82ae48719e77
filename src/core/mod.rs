pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use config::{FearCurve, InvasionConfig};
pub use error::{InvasionError, Result};
pub use rng::{seeded, RollSource, ScriptedRolls};
pub use types::*;
