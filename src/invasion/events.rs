//! Outbound invasion events
//!
//! The engine appends events as it resolves actions; the host drains them
//! whenever it likes (animation, combat log, replay files).

use serde::{Deserialize, Serialize};

use crate::combat::resolution::CombatResult;
use crate::content::EffectKind;
use crate::core::types::{AbilityId, CombatantId, ObjectiveId, RoomId, Round};
use crate::invasion::engine::{InvasionEndReason, InvasionOutcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvasionEvent {
    pub round: Round,
    pub event_type: InvasionEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvasionEventType {
    InvasionStarted,
    RoundStarted,
    CombatantMoved {
        combatant: CombatantId,
        from: RoomId,
        to: RoomId,
    },
    AttackResolved {
        attacker: CombatantId,
        defender: CombatantId,
        result: CombatResult,
    },
    AltarAttacked {
        attacker: CombatantId,
        hit: bool,
        damage: i32,
        altar_hp: i32,
    },
    AbilityActivated {
        caster: CombatantId,
        ability: AbilityId,
        effect: EffectKind,
        targets: Vec<CombatantId>,
        value: f64,
    },
    AbilityFizzled {
        caster: CombatantId,
        ability: AbilityId,
    },
    StatusExpired {
        combatant: CombatantId,
        effect: EffectKind,
    },
    RoomScouted {
        combatant: CombatantId,
        room: RoomId,
    },
    TreasureStolen {
        combatant: CombatantId,
        total: u32,
    },
    CombatantDied {
        combatant: CombatantId,
    },
    ObjectiveCompleted {
        objective: ObjectiveId,
    },
    Waited {
        combatant: CombatantId,
    },
    MoraleChanged {
        morale: f64,
    },
    InvasionEnded {
        outcome: InvasionOutcome,
        reason: InvasionEndReason,
    },
}

/// Append-only queue of events since the last drain
#[derive(Debug, Clone, Default)]
pub struct InvasionEventLog {
    events: Vec<InvasionEvent>,
}

impl InvasionEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, round: Round, event_type: InvasionEventType, description: String) {
        self.events.push(InvasionEvent {
            round,
            event_type,
            description,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InvasionEvent> {
        self.events.iter()
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<InvasionEvent> {
        std::mem::take(&mut self.events)
    }
}
