//! Ability resolution
//!
//! Pure: computes what an ability would do and returns it. Cooldowns,
//! statuses and hp changes are applied by the caller.

use serde::{Deserialize, Serialize};

use crate::content::{AbilityTarget, ContentLookup, EffectKind};
use crate::core::rng::RollSource;
use crate::core::types::{AbilityId, CombatantId};
use crate::invasion::combatant::{Combatant, InvaderInstance};

/// What a resolved ability does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityResult {
    pub ability: AbilityId,
    pub caster: CombatantId,
    pub effect: EffectKind,
    /// Combatants the effect lands on
    pub targets: Vec<CombatantId>,
    /// Magnitude; meaning depends on the effect kind
    pub value: f64,
    /// Rounds a resulting status lasts
    pub duration: u32,
    /// Cooldown to put the ability on
    pub cooldown: u32,
}

impl AbilityResult {
    /// Disarm-style effects report success as value 1
    pub fn succeeded(&self) -> bool {
        match self.effect {
            EffectKind::Disarm => self.value >= 1.0,
            _ => true,
        }
    }
}

/// Resolve `ability` cast by `invader`, whose body on the field is `caster`
///
/// `target_ids` are the candidates chosen by the caller; the ability's target
/// mode picks from them. Damage scales with the caster's effective attack, so
/// an active amplify boosts it. Returns None when the ability is on cooldown,
/// not granted to this invader, references missing content, or has no target.
pub fn resolve_ability(
    invader: &InvaderInstance,
    caster: &Combatant,
    ability: &AbilityId,
    target_ids: &[CombatantId],
    content: &impl ContentLookup,
    rng: &mut impl RollSource,
) -> Option<AbilityResult> {
    let state = invader.ability(ability)?;
    if state.cooldown > 0 {
        return None;
    }

    debug_assert_eq!(invader.id, caster.id, "caster does not match invader");
    content.invader(&invader.definition)?;
    let ability_def = content.ability(ability)?;
    let effect = content.effect(&ability_def.effect)?.kind;

    let targets = match ability_def.target {
        AbilityTarget::SelfOnly => vec![invader.id],
        AbilityTarget::Aoe => target_ids.to_vec(),
        AbilityTarget::Single => target_ids.first().copied().into_iter().collect(),
    };
    if targets.is_empty() {
        return None;
    }

    let value = match effect {
        EffectKind::Damage => (caster.effective().attack as f64 * ability_def.value / 100.0).round(),
        EffectKind::SelfHeal => (caster.max_hp as f64 * ability_def.value / 100.0).round(),
        EffectKind::Disarm => {
            if rng.next_unit() * 100.0 <= ability_def.value {
                1.0
            } else {
                0.0
            }
        }
        EffectKind::Amplify | EffectKind::Shield | EffectKind::Scout => ability_def.value,
        EffectKind::Courage | EffectKind::Dispel => 0.0,
    };

    Some(AbilityResult {
        ability: ability.clone(),
        caster: invader.id,
        effect,
        targets,
        value,
        duration: ability_def.duration,
        cooldown: ability_def.cooldown,
    })
}
