//! Static content definitions
//!
//! Authored data for invaders, their abilities, and ability effects. The
//! engine only reads these, through `ContentLookup`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::{AbilityId, EffectId, InvaderDefId};

/// What an ability effect does when it resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Percentage of caster attack dealt to each target
    Damage,
    /// Percentage of caster max hp restored
    SelfHeal,
    /// Chance (percent) to disarm the target
    Disarm,
    /// Attack bonus percentage while active
    Amplify,
    /// Defense bonus percentage while active
    Shield,
    /// Number of rooms revealed
    Scout,
    /// Fear ignored while active; lifts party morale
    Courage,
    /// Strips every status effect from the target
    Dispel,
}

impl EffectKind {
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Damage => "damage",
            EffectKind::SelfHeal => "self_heal",
            EffectKind::Disarm => "disarm",
            EffectKind::Amplify => "amplify",
            EffectKind::Shield => "shield",
            EffectKind::Scout => "scout",
            EffectKind::Courage => "courage",
            EffectKind::Dispel => "dispel",
        }
    }

    /// Effects that leave a timed status on their targets
    pub fn leaves_status(self) -> bool {
        matches!(
            self,
            EffectKind::Disarm | EffectKind::Amplify | EffectKind::Shield | EffectKind::Courage
        )
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Who an ability lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityTarget {
    /// Only the caster
    #[serde(rename = "self")]
    SelfOnly,
    /// First id of the supplied targets
    Single,
    /// Every supplied target
    Aoe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDefinition {
    pub id: EffectId,
    pub kind: EffectKind,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub name: String,
    pub effect: EffectId,
    /// Magnitude; meaning depends on the effect kind
    pub value: f64,
    /// Rounds before the ability can be used again
    pub cooldown: u32,
    /// Rounds a resulting status lasts (0 = instant)
    #[serde(default)]
    pub duration: u32,
    pub target: AbilityTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvaderDefinition {
    pub id: InvaderDefId,
    pub name: String,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    #[serde(default)]
    pub abilities: Vec<AbilityId>,
}
