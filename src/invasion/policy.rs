//! Built-in action selection
//!
//! Invaders pursue objectives and fight whatever blocks them; auto-controlled
//! defenders hunt the nearest invader. Both are deterministic given the state.

use crate::content::{AbilityTarget, ContentLookup, EffectKind};
use crate::core::types::{AbilityId, CombatantId, RoomId, Side};
use crate::dungeon::graph::DungeonGraph;
use crate::dungeon::pathfinding::{ObjectiveTarget, Pathfinder, PathfindingOptions};
use crate::invasion::combatant::Combatant;
use crate::invasion::objectives::{open_targets, ObjectiveKind};
use crate::invasion::state::InvasionState;
use crate::invasion::turn::{AttackTarget, CombatAction};

/// Read-only view handed to the policies
pub struct PolicyContext<'a, C: ContentLookup> {
    pub state: &'a InvasionState,
    pub graph: &'a DungeonGraph,
    pub pathfinder: &'a Pathfinder,
    pub content: &'a C,
}

impl<'a, C: ContentLookup> PolicyContext<'a, C> {
    fn options(&self, fearless: bool) -> PathfindingOptions {
        let mut options = PathfindingOptions {
            morale: self.state.morale,
            blocked_nodes: self.state.sealed_rooms.clone(),
            ..Default::default()
        };
        if fearless {
            options.fear_cost_multiplier = 0.0;
        }
        options
    }
}

/// Pick an action for whoever `actor` is
pub fn choose_action<C: ContentLookup>(ctx: &PolicyContext<'_, C>, actor: CombatantId) -> CombatAction {
    match ctx.state.combatant(actor) {
        Some(c) if c.is_alive() => match c.side {
            Side::Invader => invader_action(ctx, c),
            Side::Defender => defender_action(ctx, c),
        },
        _ => CombatAction::Wait,
    }
}

/// Lowest hp first; roster order breaks ties
fn weakest<'a>(candidates: impl Iterator<Item = &'a Combatant>) -> Option<&'a Combatant> {
    candidates.fold(None, |best: Option<&Combatant>, c| match best {
        Some(b) if b.hp <= c.hp => Some(b),
        _ => Some(c),
    })
}

/// Ready ability of the given effect kind, in definition order
fn ready_ability<C: ContentLookup>(
    ctx: &PolicyContext<'_, C>,
    actor: CombatantId,
    kind: EffectKind,
) -> Option<(AbilityId, AbilityTarget)> {
    let invader = ctx.state.invader(actor)?;
    invader.ready_abilities().find_map(|state| {
        let def = ctx.content.ability(&state.ability)?;
        let effect = ctx.content.effect(&def.effect)?;
        (effect.kind == kind).then(|| (state.ability.clone(), def.target))
    })
}

/// Cast a ready ability of `kind`; with no explicit targets it lands on the caster
fn cast<C: ContentLookup>(
    ctx: &PolicyContext<'_, C>,
    actor: CombatantId,
    kind: EffectKind,
    targets: Vec<CombatantId>,
) -> Option<CombatAction> {
    let (ability, mode) = ready_ability(ctx, actor, kind)?;
    let targets = match mode {
        AbilityTarget::SelfOnly => Vec::new(),
        AbilityTarget::Single | AbilityTarget::Aoe if targets.is_empty() => vec![actor],
        AbilityTarget::Single | AbilityTarget::Aoe => targets,
    };
    Some(CombatAction::Ability { ability, targets })
}

fn objective_open(state: &InvasionState, kind: ObjectiveKind) -> bool {
    state.objectives.iter().any(|o| o.kind == kind && !o.is_completed)
}

fn invader_action<C: ContentLookup>(ctx: &PolicyContext<'_, C>, me: &Combatant) -> CombatAction {
    let state = ctx.state;
    let Some(room) = me.room else {
        return CombatAction::Wait;
    };

    // Patch up first
    if me.hp_fraction() < 0.5 {
        if let Some(action) = cast(ctx, me.id, EffectKind::SelfHeal, Vec::new()) {
            return action;
        }
    }

    // Shake off a disarm
    if me.is_disarmed() {
        if let Some(action) = cast(ctx, me.id, EffectKind::Dispel, vec![me.id]) {
            return action;
        }
    }

    let foes: Vec<&Combatant> = state.living_in_room(Side::Defender, room).collect();
    if let Some(target) = weakest(foes.iter().copied()) {
        if let Some((ability, mode)) = ready_ability(ctx, me.id, EffectKind::Damage) {
            let targets = match mode {
                AbilityTarget::Aoe => foes.iter().map(|c| c.id).collect(),
                _ => vec![target.id],
            };
            return CombatAction::Ability { ability, targets };
        }
        for buff in [EffectKind::Amplify, EffectKind::Shield] {
            if !me.has_status(buff) {
                if let Some(action) = cast(ctx, me.id, buff, Vec::new()) {
                    return action;
                }
            }
        }
        if !target.is_disarmed() {
            if let Some(action) = cast(ctx, me.id, EffectKind::Disarm, vec![target.id]) {
                return action;
            }
        }
        if !me.is_disarmed() {
            return CombatAction::Attack {
                target: AttackTarget::Combatant(target.id),
            };
        }
    }

    if room == state.altar_room
        && state.altar_hp > 0
        && !me.is_disarmed()
        && objective_open(state, ObjectiveKind::DestroyAltar)
    {
        return CombatAction::Attack {
            target: AttackTarget::Altar,
        };
    }

    if objective_open(state, ObjectiveKind::Scout) {
        if let Some(action) = cast(ctx, me.id, EffectKind::Scout, Vec::new()) {
            return action;
        }
    }

    // Rally a shaken party before pressing on
    if state.morale < ctx.pathfinder.curve.max_morale / 2.0 && !me.has_status(EffectKind::Courage) {
        if let Some(action) = cast(ctx, me.id, EffectKind::Courage, Vec::new()) {
            return action;
        }
    }

    let mut targets = open_targets(&state.objectives, |id| {
        state.combatant(id).filter(|c| c.is_alive()).and_then(|c| c.room)
    });
    // Altar objectives may omit the room; the altar's room is always known
    let roomless_altars = state
        .objectives
        .iter()
        .filter(|o| o.kind == ObjectiveKind::DestroyAltar && !o.is_completed && o.target_room.is_none());
    for objective in roomless_altars {
        targets.push(ObjectiveTarget {
            objective: objective.id,
            room: state.altar_room,
            priority: objective.priority,
        });
    }

    let options = ctx.options(me.has_status(EffectKind::Courage));
    ctx.pathfinder
        .find_with_objectives(ctx.graph, room, &targets, &options)
        .and_then(|route| route.path.next_step())
        .map(|to| CombatAction::Move { to })
        .unwrap_or(CombatAction::Wait)
}

fn defender_action<C: ContentLookup>(ctx: &PolicyContext<'_, C>, me: &Combatant) -> CombatAction {
    let state = ctx.state;
    let Some(room) = me.room else {
        return CombatAction::Wait;
    };

    if let Some(target) = weakest(state.living_in_room(Side::Invader, room)) {
        if me.is_disarmed() {
            return CombatAction::Wait;
        }
        return CombatAction::Attack {
            target: AttackTarget::Combatant(target.id),
        };
    }

    // Step toward the closest invader; earlier roster entries win ties
    let options = ctx.options(true);
    let mut best: Option<(f64, RoomId)> = None;
    for invader in state.living(Side::Invader) {
        let Some(goal) = invader.room else { continue };
        let Some(path) = ctx.pathfinder.find_path(ctx.graph, room, goal, &options) else {
            continue;
        };
        let Some(step) = path.next_step() else { continue };
        if best.map_or(true, |(cost, _)| path.cost < cost) {
            best = Some((path.cost, step));
        }
    }

    best.map(|(_, to)| CombatAction::Move { to })
        .unwrap_or(CombatAction::Wait)
}
