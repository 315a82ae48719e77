//! Status effects and ability cooldowns
//!
//! Everything counts down once per round and bottoms out at zero. Statuses
//! that reach zero are removed on the same tick.

use serde::{Deserialize, Serialize};

use crate::combat::abilities::AbilityResult;
use crate::content::EffectKind;
use crate::core::types::{AbilityId, CombatantId};

/// A timed effect on a combatant, named by its effect kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub effect: EffectKind,
    pub remaining: u32,
    pub magnitude: f64,
    pub source: Option<CombatantId>,
}

impl StatusEffect {
    pub fn new(effect: EffectKind, remaining: u32, magnitude: f64) -> Self {
        Self {
            effect,
            remaining,
            magnitude,
            source: None,
        }
    }

    pub fn from_source(mut self, source: CombatantId) -> Self {
        self.source = Some(source);
        self
    }
}

/// Cooldown and persistence of one ability on one invader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityState {
    pub ability: AbilityId,
    pub cooldown: u32,
    /// Set while a persistent effect from this ability is running
    pub is_active: bool,
    pub remaining_duration: u32,
}

impl AbilityState {
    pub fn new(ability: AbilityId) -> Self {
        Self {
            ability,
            cooldown: 0,
            is_active: false,
            remaining_duration: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown == 0
    }

    fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.is_active {
            self.remaining_duration = self.remaining_duration.saturating_sub(1);
            if self.remaining_duration == 0 {
                self.is_active = false;
            }
        }
    }
}

/// Advance every ability cooldown by one round
pub fn tick_abilities(abilities: &mut [AbilityState]) {
    for ability in abilities {
        ability.tick();
    }
}

/// Advance every status by one round; returns the kinds that expired
pub fn tick_statuses(statuses: &mut Vec<StatusEffect>) -> Vec<EffectKind> {
    let mut expired = Vec::new();
    statuses.retain_mut(|status| {
        status.remaining = status.remaining.saturating_sub(1);
        if status.remaining == 0 {
            expired.push(status.effect);
            false
        } else {
            true
        }
    });
    expired
}

/// Apply or refresh a status; refreshing overwrites, never stacks
pub fn apply_status(statuses: &mut Vec<StatusEffect>, status: StatusEffect) {
    if status.remaining == 0 {
        return;
    }
    match statuses.iter_mut().find(|s| s.effect == status.effect) {
        Some(existing) => *existing = status,
        None => statuses.push(status),
    }
}

/// Remove every status at once; returns how many were cleared
pub fn dispel(statuses: &mut Vec<StatusEffect>) -> usize {
    let cleared = statuses.len();
    statuses.clear();
    cleared
}

/// Put the resolved ability on cooldown; false if the caster lacks it
pub fn start_cooldown(abilities: &mut [AbilityState], result: &AbilityResult) -> bool {
    let Some(state) = abilities.iter_mut().find(|a| a.ability == result.ability) else {
        return false;
    };
    state.cooldown = result.cooldown;
    state.remaining_duration = result.duration;
    state.is_active = result.duration > 0;
    true
}
