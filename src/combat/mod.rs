pub mod abilities;
pub mod resolution;
pub mod status;

pub use abilities::{resolve_ability, AbilityResult};
pub use resolution::{resolve_attack, resolve_with_roll, roll_d20, CombatResult};
pub use status::{
    apply_status, dispel, start_cooldown, tick_abilities, tick_statuses, AbilityState,
    StatusEffect,
};
