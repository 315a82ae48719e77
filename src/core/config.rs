//! Invasion configuration with documented constants
//!
//! All tunable numbers live here. Values load from TOML (every field is
//! optional and falls back to its default) and are validated once before an
//! invasion starts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{InvasionError, Result};

/// Shape of the fear penalty applied to room traversal
///
/// `multiplier = 1 + fear * per_level * fear_cost_multiplier * (1 - morale_relief * morale / max_morale)`
///
/// With `morale_relief <= 1` the bracket never goes negative, so cost only
/// grows with fear and only shrinks with morale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FearCurve {
    /// Extra cost fraction per fear level at zero morale
    ///
    /// At 0.4 a fear-5 room costs 3x its base cost to a terrified party.
    pub per_level: f64,

    /// Fraction of the fear penalty cancelled by full morale
    pub morale_relief: f64,

    /// Morale value treated as "full"
    pub max_morale: f64,
}

impl Default for FearCurve {
    fn default() -> Self {
        Self {
            per_level: 0.4,
            morale_relief: 0.75,
            max_morale: 100.0,
        }
    }
}

impl FearCurve {
    /// Cost multiplier for entering a room of `fear_level`
    pub fn multiplier(&self, fear_level: u32, morale: f64, fear_cost_multiplier: f64) -> f64 {
        let morale_ratio = if self.max_morale > 0.0 {
            (morale / self.max_morale).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let relief = 1.0 - self.morale_relief.clamp(0.0, 1.0) * morale_ratio;
        1.0 + fear_level as f64 * self.per_level * fear_cost_multiplier.max(0.0) * relief
    }
}

/// Configuration for one invasion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvasionConfig {
    // === TURN LIMIT ===
    /// Rounds before the invasion times out with `turn_limit_reached`
    pub max_turns: u32,

    // === ALTAR ===
    pub altar_max_hp: i32,

    /// Defense used when an invader rolls to strike the altar
    pub altar_defense: i32,

    // === PATHFINDING ===
    pub fear: FearCurve,

    // === MORALE ===
    /// Invaders break and flee once morale drops to or below this
    pub morale_break_threshold: f64,

    /// Morale lost per fallen invader
    pub morale_loss_per_casualty: f64,

    /// Morale gained whenever an objective completes
    pub morale_gain_per_objective: f64,

    /// Morale gained when a courage-type ability resolves
    pub courage_morale_bonus: f64,

    // === OBJECTIVES ===
    /// Treasure units to steal before a steal-treasure objective completes
    ///
    /// Each living invader standing in the vault at round end steals one.
    pub treasure_goal: u32,

    /// Distinct rooms that must be scouted for a scout objective
    pub scout_goal: u32,

    // === REWARDS ===
    /// Reward multiplier bonus at full secondary-objective completion
    ///
    /// At 0.5, completing every secondary objective yields a 1.5x multiplier.
    pub secondary_reward_bonus: f64,
}

impl Default for InvasionConfig {
    fn default() -> Self {
        Self {
            max_turns: 30,
            altar_max_hp: 100,
            altar_defense: 5,
            fear: FearCurve::default(),
            morale_break_threshold: 20.0,
            morale_loss_per_casualty: 15.0,
            morale_gain_per_objective: 10.0,
            courage_morale_bonus: 10.0,
            treasure_goal: 3,
            scout_goal: 4,
            secondary_reward_bonus: 0.5,
        }
    }
}

impl InvasionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: InvasionConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_turns == 0 {
            return Err(InvasionError::InvalidConfig(
                "max_turns must be at least 1".into(),
            ));
        }

        if self.altar_max_hp <= 0 {
            return Err(InvasionError::InvalidConfig(format!(
                "altar_max_hp ({}) must be positive",
                self.altar_max_hp
            )));
        }

        if self.fear.per_level < 0.0 || self.fear.max_morale <= 0.0 {
            return Err(InvasionError::InvalidConfig(
                "fear.per_level must be >= 0 and fear.max_morale > 0".into(),
            ));
        }

        // Relief above 1 would make high-morale fear rooms cheaper than plain ones
        if !(0.0..=1.0).contains(&self.fear.morale_relief) {
            return Err(InvasionError::InvalidConfig(format!(
                "fear.morale_relief ({}) must be within 0..=1",
                self.fear.morale_relief
            )));
        }

        if self.treasure_goal == 0 || self.scout_goal == 0 {
            return Err(InvasionError::InvalidConfig(
                "treasure_goal and scout_goal must be at least 1".into(),
            ));
        }

        if self.secondary_reward_bonus < 0.0 {
            return Err(InvasionError::InvalidConfig(
                "secondary_reward_bonus must not be negative".into(),
            ));
        }

        Ok(())
    }
}
