//! Single attack resolution
//!
//! d20 + attack against defense + 10. Natural 20 always hits, natural 1
//! always misses, and any hit deals at least 1 damage.

use serde::{Deserialize, Serialize};

use crate::core::rng::RollSource;
use crate::invasion::combatant::Combatant;

/// Bonus added to defense to form the target number
pub const DEFENSE_BASE: i32 = 10;
pub const NATURAL_HIT: u32 = 20;
pub const NATURAL_MISS: u32 = 1;

/// Outcome of one attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    pub hit: bool,
    pub roll: u32,
    pub damage: i32,
    pub defender_hp: i32,
    pub defender_dead: bool,
}

/// Roll a twenty-sided die: `floor(unit * 20) + 1`
pub fn roll_d20(rng: &mut impl RollSource) -> u32 {
    let face = (rng.next_unit() * 20.0).floor() as i64 + 1;
    face.clamp(1, 20) as u32
}

/// Does `roll` hit given the stats?
pub fn is_hit(roll: u32, attack: i32, defense: i32) -> bool {
    match roll {
        NATURAL_HIT => true,
        NATURAL_MISS => false,
        _ => roll as i32 + attack >= defense + DEFENSE_BASE,
    }
}

/// Damage dealt by a successful hit
pub fn hit_damage(attack: i32, defense: i32) -> i32 {
    (attack - defense).max(1)
}

/// Resolve one attack; pure, the defender is not modified
pub fn resolve_attack(
    attacker: &Combatant,
    defender: &Combatant,
    rng: &mut impl RollSource,
) -> CombatResult {
    let roll = roll_d20(rng);
    resolve_with_roll(attacker, defender, roll)
}

/// Resolve with a known roll (replays, previews)
pub fn resolve_with_roll(attacker: &Combatant, defender: &Combatant, roll: u32) -> CombatResult {
    let hit = is_hit(roll, attacker.attack, defender.defense);
    let damage = if hit {
        hit_damage(attacker.attack, defender.defense)
    } else {
        0
    };
    let defender_hp = (defender.hp - damage).max(0);

    CombatResult {
        hit,
        roll,
        damage,
        defender_hp,
        defender_dead: defender_hp == 0,
    }
}
