//! Combatants: the shared turn-taking record for both sides
//!
//! Hit points and status effects live here for defenders and invaders alike.
//! Invader-only data (definition, ability cooldowns) lives in
//! `InvaderInstance`, keyed by the same id.

use serde::{Deserialize, Serialize};

use crate::combat::status::{AbilityState, StatusEffect};
use crate::content::{EffectKind, InvaderDefinition};
use crate::core::types::{AbilityId, CombatantId, GridPos, InvaderDefId, RoomId, Side};

/// Who picks a combatant's action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    /// The host must submit each action
    Player,
    /// Chosen by the built-in policy
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub side: Side,
    pub name: String,
    pub speed: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub has_acted: bool,
    pub position: Option<GridPos>,
    pub room: Option<RoomId>,
    pub controller: Controller,
    pub statuses: Vec<StatusEffect>,
}

impl Combatant {
    pub fn new(
        id: CombatantId,
        side: Side,
        name: impl Into<String>,
        max_hp: i32,
        attack: i32,
        defense: i32,
        speed: i32,
    ) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            id,
            side,
            name: name.into(),
            speed,
            hp: max_hp,
            max_hp,
            attack,
            defense,
            has_acted: false,
            position: None,
            room: None,
            controller: Controller::Auto,
            statuses: Vec::new(),
        }
    }

    /// Invader combatant with stats taken from its definition
    pub fn from_definition(id: CombatantId, def: &InvaderDefinition) -> Self {
        Self::new(
            id,
            Side::Invader,
            def.name.clone(),
            def.max_hp,
            def.attack,
            def.defense,
            def.speed,
        )
    }

    pub fn in_room(mut self, room: RoomId, position: GridPos) -> Self {
        self.room = Some(room);
        self.position = Some(position);
        self
    }

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = controller;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Subtract damage, clamped at 0; returns true if this killed the combatant
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.hp = (self.hp - amount.max(0)).clamp(0, self.max_hp);
        was_alive && !self.is_alive()
    }

    /// Restore hp up to max; dead combatants stay dead
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.is_alive() {
            return 0;
        }
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    pub fn status(&self, kind: EffectKind) -> Option<&StatusEffect> {
        self.statuses.iter().find(|s| s.effect == kind)
    }

    pub fn has_status(&self, kind: EffectKind) -> bool {
        self.status(kind).is_some()
    }

    pub fn is_disarmed(&self) -> bool {
        self.has_status(EffectKind::Disarm)
    }

    pub fn hp_fraction(&self) -> f64 {
        self.hp as f64 / self.max_hp as f64
    }

    /// Copy with status modifiers folded into attack and defense
    pub fn effective(&self) -> Combatant {
        let mut effective = self.clone();
        if let Some(amp) = self.status(EffectKind::Amplify) {
            effective.attack += (self.attack as f64 * amp.magnitude / 100.0).round() as i32;
        }
        if let Some(shield) = self.status(EffectKind::Shield) {
            effective.defense += (self.defense as f64 * shield.magnitude / 100.0).round() as i32;
        }
        effective
    }
}

/// Invader-only state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvaderInstance {
    pub id: CombatantId,
    pub definition: InvaderDefId,
    pub abilities: Vec<AbilityState>,
}

impl InvaderInstance {
    /// One ability state per ability the definition grants
    pub fn new(id: CombatantId, def: &InvaderDefinition) -> Self {
        Self {
            id,
            definition: def.id.clone(),
            abilities: def.abilities.iter().cloned().map(AbilityState::new).collect(),
        }
    }

    pub fn ability(&self, id: &AbilityId) -> Option<&AbilityState> {
        self.abilities.iter().find(|a| &a.ability == id)
    }

    pub fn ability_mut(&mut self, id: &AbilityId) -> Option<&mut AbilityState> {
        self.abilities.iter_mut().find(|a| &a.ability == id)
    }

    /// Abilities off cooldown, in definition order
    pub fn ready_abilities(&self) -> impl Iterator<Item = &AbilityState> {
        self.abilities.iter().filter(|a| a.is_ready())
    }
}
