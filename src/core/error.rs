use thiserror::Error;

use crate::core::types::{CombatantId, InvaderDefId, RoomId};

#[derive(Error, Debug)]
pub enum InvasionError {
    #[error("Room not found: {0}")]
    UnknownRoom(RoomId),

    #[error("Combatant not found: {0}")]
    UnknownCombatant(CombatantId),

    #[error("Invader definition not found: {0}")]
    UnknownInvaderDefinition(InvaderDefId),

    #[error("Illegal action for {combatant}: {reason}")]
    IllegalAction {
        combatant: CombatantId,
        reason: String,
    },

    #[error("Not waiting on {0} to act")]
    NotAwaitingAction(CombatantId),

    #[error("Invasion has already finished")]
    InvasionFinished,

    #[error("Cannot change the dungeon while a round is in progress")]
    RoundInProgress,

    #[error("Player input required for {0}")]
    PlayerInputRequired(CombatantId),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InvasionError {
    pub(crate) fn illegal(combatant: CombatantId, reason: impl Into<String>) -> Self {
        Self::IllegalAction {
            combatant,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InvasionError>;
