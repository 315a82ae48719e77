//! The invasion itself: roster, turn order, objectives, and the state machine
//! that runs them

pub mod combatant;
pub mod engine;
pub mod events;
pub mod objectives;
pub mod policy;
pub mod state;
pub mod turn;

pub use combatant::{Combatant, Controller, InvaderInstance};
pub use engine::{
    AdvanceResult, DetailedInvasionResult, InvasionEndReason, InvasionEngine, InvasionOutcome,
};
pub use events::{InvasionEvent, InvasionEventLog, InvasionEventType};
pub use objectives::{
    all_primary_completed, evaluate_objectives, secondary_completion_ratio, InvasionObjective,
    ObjectiveContext, ObjectiveKind,
};
pub use policy::{choose_action, PolicyContext};
pub use state::{DefenderSpawn, InvaderSpawn, InvasionSetup, InvasionState};
pub use turn::{initiative_order, AttackTarget, CombatAction, TurnPhase, TurnQueue};
