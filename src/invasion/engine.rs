//! Invasion state machine
//!
//! Each round: rebuild initiative -> every living combatant acts -> statuses
//! and cooldowns tick -> treasure and objectives update -> terminal checks.
//! Player-controlled defenders suspend the loop until the host submits an
//! action for them.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::combat::abilities::{resolve_ability, AbilityResult};
use crate::combat::resolution::{hit_damage, is_hit, resolve_attack, roll_d20};
use crate::combat::status::{apply_status, dispel, start_cooldown, tick_abilities, tick_statuses, StatusEffect};
use crate::content::{ContentLookup, EffectKind};
use crate::core::config::InvasionConfig;
use crate::core::error::{InvasionError, Result};
use crate::core::rng::RollSource;
use crate::core::types::{AbilityId, CombatantId, InvasionId, ObjectiveId, RoomId, Round, Side};
use crate::dungeon::graph::DungeonGraph;
use crate::dungeon::pathfinding::Pathfinder;
use crate::invasion::combatant::Controller;
use crate::invasion::events::{InvasionEvent, InvasionEventLog, InvasionEventType};
use crate::invasion::objectives::{
    all_primary_completed, evaluate_objectives, primary_tally, secondary_completion_ratio,
    secondary_tally, ObjectiveKind,
};
use crate::invasion::policy::{choose_action, PolicyContext};
use crate::invasion::state::{InvasionSetup, InvasionState};
use crate::invasion::turn::{AttackTarget, CombatAction, TurnPhase, TurnQueue};

/// Result from the defending dungeon's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvasionOutcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvasionEndReason {
    AltarDestroyed,
    AllInvadersEliminated,
    TurnLimitReached,
    ObjectivesCompleted,
    MoraleBroken,
}

/// Final report of a finished invasion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedInvasionResult {
    pub invasion_id: InvasionId,
    pub outcome: InvasionOutcome,
    pub reason: InvasionEndReason,
    pub turns_taken: Round,
    pub defenders_lost: usize,
    pub invaders_lost: usize,
    pub objectives_completed: usize,
    pub objectives_total: usize,
    pub primary_completed: usize,
    pub primary_total: usize,
    pub secondary_completed: usize,
    pub secondary_total: usize,
    pub reward_multiplier: f64,
    pub altar_hp_remaining: i32,
}

/// Where `advance` stopped
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceResult {
    /// A player-controlled defender must act via `submit_action`
    AwaitingDefender(CombatantId),
    RoundComplete(Round),
    Finished(DetailedInvasionResult),
}

/// Drives one invasion from setup to result
pub struct InvasionEngine<C: ContentLookup> {
    state: InvasionState,
    queue: TurnQueue,
    graph: DungeonGraph,
    content: C,
    config: InvasionConfig,
    pathfinder: Pathfinder,
    events: InvasionEventLog,
    awaiting: Option<CombatantId>,
    result: Option<DetailedInvasionResult>,
}

impl<C: ContentLookup> InvasionEngine<C> {
    pub fn new(setup: &InvasionSetup, graph: DungeonGraph, content: C, config: InvasionConfig) -> Result<Self> {
        config.validate()?;
        let state = InvasionState::from_setup(setup, &graph, &content, &config)?;

        let mut events = InvasionEventLog::new();
        events.push(
            0,
            InvasionEventType::InvasionStarted,
            format!(
                "{} invaders against {} defenders",
                state.initial_invaders, state.initial_defenders
            ),
        );
        tracing::info!(
            "Invasion {} started: {} invaders, {} defenders, {} objectives, {} turn limit",
            state.id,
            state.initial_invaders,
            state.initial_defenders,
            state.objectives.len(),
            state.max_turns
        );

        Ok(Self {
            pathfinder: Pathfinder::new(config.fear),
            state,
            queue: TurnQueue::new(),
            graph,
            content,
            config,
            events,
            awaiting: None,
            result: None,
        })
    }

    pub fn state(&self) -> &InvasionState {
        &self.state
    }

    pub fn queue(&self) -> &TurnQueue {
        &self.queue
    }

    pub fn graph(&self) -> &DungeonGraph {
        &self.graph
    }

    pub fn config(&self) -> &InvasionConfig {
        &self.config
    }

    pub fn result(&self) -> Option<&DetailedInvasionResult> {
        self.result.as_ref()
    }

    pub fn awaiting(&self) -> Option<CombatantId> {
        self.awaiting
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    /// What the built-in policy would do for `id` right now
    pub fn suggest_action(&self, id: CombatantId) -> CombatAction {
        let ctx = PolicyContext {
            state: &self.state,
            graph: &self.graph,
            pathfinder: &self.pathfinder,
            content: &self.content,
        };
        choose_action(&ctx, id)
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<InvasionEvent> {
        self.events.drain()
    }

    /// Run turns until player input is needed, the round ends, or the invasion ends
    pub fn advance(&mut self, rng: &mut impl RollSource) -> Result<AdvanceResult> {
        if let Some(result) = &self.result {
            return Ok(AdvanceResult::Finished(result.clone()));
        }
        if let Some(id) = self.awaiting {
            return Ok(AdvanceResult::AwaitingDefender(id));
        }

        loop {
            match self.queue.phase() {
                TurnPhase::RoundStart => {
                    if !self.queue.start_round(&mut self.state.combatants) {
                        // Nobody left standing on either side
                        let result = self.finish(InvasionOutcome::Victory, InvasionEndReason::AllInvadersEliminated);
                        return Ok(AdvanceResult::Finished(result));
                    }
                    self.state.round = self.queue.round();
                    self.events.push(
                        self.state.round,
                        InvasionEventType::RoundStarted,
                        format!("Round {}", self.state.round),
                    );
                    tracing::debug!("Round {} order: {:?}", self.state.round, self.queue.order());
                }
                TurnPhase::InProgress => {
                    let Some(id) = self.queue.current(&self.state.combatants) else {
                        continue;
                    };
                    let player_defender = self
                        .state
                        .combatant(id)
                        .map(|c| c.side == Side::Defender && c.controller == Controller::Player)
                        .unwrap_or(false);
                    if player_defender {
                        self.awaiting = Some(id);
                        return Ok(AdvanceResult::AwaitingDefender(id));
                    }

                    let action = self.suggest_action(id);
                    if let Err(err) = self.execute(id, &action, rng) {
                        tracing::warn!("Policy action for {} rejected ({}), waiting instead", id, err);
                        self.wait(id);
                    }
                    self.queue.advance(&mut self.state.combatants);
                }
                TurnPhase::RoundEnd => {
                    let round = self.end_round();
                    if let Some((outcome, reason)) = self.check_end() {
                        return Ok(AdvanceResult::Finished(self.finish(outcome, reason)));
                    }
                    self.queue.finish_round();
                    return Ok(AdvanceResult::RoundComplete(round));
                }
            }
        }
    }

    /// Act for the player-controlled defender the engine is waiting on
    ///
    /// Illegal actions are rejected and the defender keeps its turn.
    pub fn submit_action(
        &mut self,
        id: CombatantId,
        action: CombatAction,
        rng: &mut impl RollSource,
    ) -> Result<()> {
        if self.result.is_some() {
            return Err(InvasionError::InvasionFinished);
        }
        if self.awaiting != Some(id) {
            return Err(InvasionError::NotAwaitingAction(id));
        }

        if let Err(err) = self.execute(id, &action, rng) {
            tracing::warn!("Rejected action from {}: {}", id, err);
            return Err(err);
        }
        self.awaiting = None;
        self.queue.advance(&mut self.state.combatants);
        Ok(())
    }

    /// Advance until the invasion ends; fails if a player defender needs input
    pub fn run_to_completion(&mut self, rng: &mut impl RollSource) -> Result<DetailedInvasionResult> {
        loop {
            match self.advance(rng)? {
                AdvanceResult::Finished(result) => return Ok(result),
                AdvanceResult::AwaitingDefender(id) => return Err(InvasionError::PlayerInputRequired(id)),
                AdvanceResult::RoundComplete(_) => {}
            }
        }
    }

    /// Host override of invader morale
    pub fn set_morale(&mut self, morale: f64) {
        let previous = self.state.morale;
        self.state.morale = morale.clamp(0.0, self.config.fear.max_morale);
        if self.state.morale != previous {
            self.push_morale();
        }
    }

    /// Break the invaders' nerve; takes effect at the next round end
    pub fn signal_morale_broken(&mut self) {
        self.state.morale_broken = true;
    }

    /// Swap in a rebuilt graph between rounds
    pub fn replace_graph(&mut self, graph: DungeonGraph) -> Result<()> {
        if self.queue.phase() != TurnPhase::RoundStart || self.awaiting.is_some() {
            return Err(InvasionError::RoundInProgress);
        }
        if !graph.contains(self.state.altar_room) {
            return Err(InvasionError::UnknownRoom(self.state.altar_room));
        }
        for combatant in self.state.combatants.iter().filter(|c| c.is_alive()) {
            if let Some(room) = combatant.room.filter(|r| !graph.contains(*r)) {
                return Err(InvasionError::UnknownRoom(room));
            }
        }
        tracing::debug!("Dungeon graph replaced ({} rooms)", graph.node_count());
        self.graph = graph;
        Ok(())
    }

    fn execute(&mut self, id: CombatantId, action: &CombatAction, rng: &mut impl RollSource) -> Result<()> {
        let actor = self
            .state
            .combatant(id)
            .ok_or(InvasionError::UnknownCombatant(id))?;
        if !actor.is_alive() {
            return Err(InvasionError::illegal(id, "dead combatants cannot act"));
        }

        match action {
            CombatAction::Move { to } => self.move_to(id, *to),
            CombatAction::Attack {
                target: AttackTarget::Combatant(target),
            } => self.attack(id, *target, rng),
            CombatAction::Attack {
                target: AttackTarget::Altar,
            } => self.attack_altar(id, rng),
            CombatAction::Ability { ability, targets } => self.use_ability(id, ability, targets, rng),
            CombatAction::Wait => {
                self.wait(id);
                Ok(())
            }
        }
    }

    fn wait(&mut self, id: CombatantId) {
        self.events.push(
            self.state.round,
            InvasionEventType::Waited { combatant: id },
            format!("{} waits", id),
        );
    }

    fn move_to(&mut self, id: CombatantId, to: RoomId) -> Result<()> {
        let from = self
            .state
            .room_of(id)
            .ok_or_else(|| InvasionError::illegal(id, "not standing in a room"))?;
        if !self.graph.are_adjacent(from, to) {
            return Err(InvasionError::illegal(id, format!("{} is not adjacent to {}", to, from)));
        }
        if self.state.sealed_rooms.contains(&to) {
            return Err(InvasionError::illegal(id, format!("{} is sealed", to)));
        }
        let position = self.graph.node(to).map(|n| n.position);

        let Some(mover) = self.state.combatant_mut(id) else {
            return Err(InvasionError::UnknownCombatant(id));
        };
        mover.room = Some(to);
        mover.position = position;
        let side = mover.side;

        if side == Side::Invader {
            self.state.visited_rooms.insert(to);
            self.state.scouted_rooms.insert(to);
        }
        tracing::debug!("{} moves {} -> {}", id, from, to);
        self.events.push(
            self.state.round,
            InvasionEventType::CombatantMoved {
                combatant: id,
                from,
                to,
            },
            format!("{} moves from {} to {}", id, from, to),
        );
        Ok(())
    }

    fn attack(&mut self, id: CombatantId, target: CombatantId, rng: &mut impl RollSource) -> Result<()> {
        let attacker = self
            .state
            .combatant(id)
            .ok_or(InvasionError::UnknownCombatant(id))?;
        let defender = self
            .state
            .combatant(target)
            .ok_or(InvasionError::UnknownCombatant(target))?;

        if attacker.is_disarmed() {
            return Err(InvasionError::illegal(id, "disarmed"));
        }
        if !defender.is_alive() {
            return Err(InvasionError::illegal(id, format!("{} is already dead", target)));
        }
        if defender.side == attacker.side {
            return Err(InvasionError::illegal(id, "cannot attack an ally"));
        }
        if defender.room.is_none() || defender.room != attacker.room {
            return Err(InvasionError::illegal(id, format!("{} is not in the same room", target)));
        }

        let result = resolve_attack(&attacker.effective(), &defender.effective(), rng);
        tracing::debug!(
            "{} attacks {}: roll {} {} for {}",
            id,
            target,
            result.roll,
            if result.hit { "hits" } else { "misses" },
            result.damage
        );
        self.events.push(
            self.state.round,
            InvasionEventType::AttackResolved {
                attacker: id,
                defender: target,
                result,
            },
            format!("{} attacks {} (roll {}, {} damage)", id, target, result.roll, result.damage),
        );
        self.damage(target, result.damage);
        Ok(())
    }

    fn attack_altar(&mut self, id: CombatantId, rng: &mut impl RollSource) -> Result<()> {
        let attacker = self
            .state
            .combatant(id)
            .ok_or(InvasionError::UnknownCombatant(id))?;
        if attacker.side != Side::Invader {
            return Err(InvasionError::illegal(id, "only invaders attack the altar"));
        }
        if attacker.room != Some(self.state.altar_room) {
            return Err(InvasionError::illegal(id, "not in the altar room"));
        }
        if attacker.is_disarmed() {
            return Err(InvasionError::illegal(id, "disarmed"));
        }
        if self.state.altar_hp <= 0 {
            return Err(InvasionError::illegal(id, "the altar is already destroyed"));
        }

        let attack = attacker.effective().attack;
        let roll = roll_d20(rng);
        let hit = is_hit(roll, attack, self.config.altar_defense);
        let damage = if hit {
            hit_damage(attack, self.config.altar_defense)
        } else {
            0
        };
        self.state.altar_hp = (self.state.altar_hp - damage).max(0);

        tracing::debug!("{} strikes the altar: roll {}, {} damage", id, roll, damage);
        self.events.push(
            self.state.round,
            InvasionEventType::AltarAttacked {
                attacker: id,
                hit,
                damage,
                altar_hp: self.state.altar_hp,
            },
            format!("{} strikes the altar for {} ({} left)", id, damage, self.state.altar_hp),
        );
        Ok(())
    }

    fn use_ability(
        &mut self,
        id: CombatantId,
        ability: &AbilityId,
        targets: &[CombatantId],
        rng: &mut impl RollSource,
    ) -> Result<()> {
        let invader = self
            .state
            .invader(id)
            .ok_or_else(|| InvasionError::illegal(id, "only invaders have abilities"))?;
        let caster = self
            .state
            .combatant(id)
            .ok_or(InvasionError::UnknownCombatant(id))?;
        let hostile = self
            .content
            .ability(ability)
            .and_then(|def| self.content.effect(&def.effect))
            .map_or(false, |effect| matches!(effect.kind, EffectKind::Damage | EffectKind::Disarm));

        for &target in targets {
            let victim = self
                .state
                .combatant(target)
                .ok_or(InvasionError::UnknownCombatant(target))?;
            if !victim.is_alive() {
                return Err(InvasionError::illegal(id, format!("{} is already dead", target)));
            }
            if hostile {
                if victim.side == caster.side {
                    return Err(InvasionError::illegal(id, "cannot attack an ally"));
                }
                if victim.room.is_none() || victim.room != caster.room {
                    return Err(InvasionError::illegal(id, format!("{} is not in the same room", target)));
                }
            }
        }

        let Some(result) = resolve_ability(invader, caster, ability, targets, &self.content, rng) else {
            tracing::debug!("{} tried {} with no effect", id, ability);
            self.events.push(
                self.state.round,
                InvasionEventType::AbilityFizzled {
                    caster: id,
                    ability: ability.clone(),
                },
                format!("{}'s {} has no effect", id, ability),
            );
            return Ok(());
        };

        if let Some(invader) = self.state.invader_mut(id) {
            start_cooldown(&mut invader.abilities, &result);
        }
        tracing::debug!(
            "{} uses {} ({}, value {}) on {:?}",
            id,
            result.ability,
            result.effect,
            result.value,
            result.targets
        );
        self.events.push(
            self.state.round,
            InvasionEventType::AbilityActivated {
                caster: id,
                ability: result.ability.clone(),
                effect: result.effect,
                targets: result.targets.clone(),
                value: result.value,
            },
            format!("{} uses {}", id, result.ability),
        );

        self.apply_ability(&result);
        Ok(())
    }

    fn apply_ability(&mut self, result: &AbilityResult) {
        match result.effect {
            EffectKind::Damage => {
                for &target in &result.targets {
                    self.damage(target, result.value as i32);
                }
            }
            EffectKind::SelfHeal => {
                if let Some(caster) = self.state.combatant_mut(result.caster) {
                    caster.heal(result.value as i32);
                }
            }
            EffectKind::Disarm => {
                if result.succeeded() {
                    self.apply_to_targets(result, 1.0);
                }
            }
            EffectKind::Amplify | EffectKind::Shield => self.apply_to_targets(result, result.value),
            EffectKind::Courage => {
                self.apply_to_targets(result, 0.0);
                self.state
                    .adjust_morale(self.config.courage_morale_bonus, self.config.fear.max_morale);
                self.push_morale();
            }
            EffectKind::Scout => self.scout(result.caster, result.value.max(0.0) as usize),
            EffectKind::Dispel => {
                for &target in &result.targets {
                    if let Some(combatant) = self.state.combatant_mut(target) {
                        dispel(&mut combatant.statuses);
                    }
                }
            }
        }
    }

    fn apply_to_targets(&mut self, result: &AbilityResult, magnitude: f64) {
        for &target in &result.targets {
            if let Some(combatant) = self.state.combatant_mut(target) {
                let status = StatusEffect::new(result.effect, result.duration, magnitude).from_source(result.caster);
                apply_status(&mut combatant.statuses, status);
            }
        }
    }

    /// Reveal up to `count` unscouted rooms, breadth-first from the caster's room
    fn scout(&mut self, caster: CombatantId, count: usize) {
        let Some(start) = self.state.room_of(caster) else {
            return;
        };
        let mut seen = BTreeSet::from([start]);
        let mut frontier = VecDeque::from([start]);
        let mut revealed = Vec::new();

        while let Some(room) = frontier.pop_front() {
            if revealed.len() >= count {
                break;
            }
            for edge in self.graph.edges_from(room) {
                if !seen.insert(edge.to) {
                    continue;
                }
                frontier.push_back(edge.to);
                if !self.state.scouted_rooms.contains(&edge.to) && revealed.len() < count {
                    revealed.push(edge.to);
                }
            }
        }

        for room in revealed {
            self.state.scouted_rooms.insert(room);
            self.events.push(
                self.state.round,
                InvasionEventType::RoomScouted {
                    combatant: caster,
                    room,
                },
                format!("{} scouts {}", caster, room),
            );
        }
    }

    fn damage(&mut self, target: CombatantId, amount: i32) {
        let Some(combatant) = self.state.combatant_mut(target) else {
            return;
        };
        let killed = combatant.take_damage(amount);
        let side = combatant.side;
        debug_assert!(combatant.hp >= 0 && combatant.hp <= combatant.max_hp, "hp out of range");
        if !killed {
            return;
        }

        self.state.slain.insert(target);
        tracing::debug!("{} dies", target);
        self.events.push(
            self.state.round,
            InvasionEventType::CombatantDied { combatant: target },
            format!("{} dies", target),
        );
        if side == Side::Invader {
            self.state
                .adjust_morale(-self.config.morale_loss_per_casualty, self.config.fear.max_morale);
            self.push_morale();
        }
    }

    fn push_morale(&mut self) {
        self.events.push(
            self.state.round,
            InvasionEventType::MoraleChanged {
                morale: self.state.morale,
            },
            format!("Invader morale now {:.0}", self.state.morale),
        );
    }

    /// Round-end bookkeeping; returns the round that just ended
    fn end_round(&mut self) -> Round {
        let round = self.state.round;

        for combatant in self.state.combatants.iter_mut().filter(|c| c.is_alive()) {
            for effect in tick_statuses(&mut combatant.statuses) {
                self.events.push(
                    round,
                    InvasionEventType::StatusExpired {
                        combatant: combatant.id,
                        effect,
                    },
                    format!("{} wears off {}", effect, combatant.id),
                );
            }
        }
        for invader in &mut self.state.invaders {
            tick_abilities(&mut invader.abilities);
        }

        self.steal_treasure();

        let context = self.state.objective_context(&self.config);
        let completed: Vec<ObjectiveId> = evaluate_objectives(&mut self.state.objectives, &context);
        for objective in completed {
            tracing::debug!("Objective {:?} completed", objective);
            self.events.push(
                round,
                InvasionEventType::ObjectiveCompleted { objective },
                format!("Objective {} completed", objective.0),
            );
            self.state
                .adjust_morale(self.config.morale_gain_per_objective, self.config.fear.max_morale);
            self.push_morale();
        }

        round
    }

    /// Each living invader standing in an open vault carries off one unit
    fn steal_treasure(&mut self) {
        let vaults: BTreeSet<RoomId> = self
            .state
            .objectives
            .iter()
            .filter(|o| o.kind == ObjectiveKind::StealTreasure && !o.is_completed)
            .filter_map(|o| o.target_room)
            .collect();
        if vaults.is_empty() {
            return;
        }

        let thieves: Vec<CombatantId> = self
            .state
            .living(Side::Invader)
            .filter(|c| c.room.map_or(false, |r| vaults.contains(&r)))
            .map(|c| c.id)
            .collect();
        for thief in thieves {
            self.state.treasure_stolen += 1;
            self.events.push(
                self.state.round,
                InvasionEventType::TreasureStolen {
                    combatant: thief,
                    total: self.state.treasure_stolen,
                },
                format!("{} steals treasure ({} total)", thief, self.state.treasure_stolen),
            );
        }
    }

    /// Terminal conditions, highest priority first
    fn check_end(&self) -> Option<(InvasionOutcome, InvasionEndReason)> {
        let state = &self.state;

        if state.altar_hp <= 0 {
            return Some((InvasionOutcome::Defeat, InvasionEndReason::AltarDestroyed));
        }

        if state.living_count(Side::Invader) == 0 {
            return Some((InvasionOutcome::Victory, InvasionEndReason::AllInvadersEliminated));
        }

        if state.round >= state.max_turns {
            let (done, total) = primary_tally(&state.objectives);
            let outcome = if total > 0 && done * 2 >= total {
                InvasionOutcome::Defeat
            } else {
                InvasionOutcome::Victory
            };
            return Some((outcome, InvasionEndReason::TurnLimitReached));
        }

        if all_primary_completed(&state.objectives) {
            return Some((InvasionOutcome::Defeat, InvasionEndReason::ObjectivesCompleted));
        }

        if state.morale_broken || state.morale <= self.config.morale_break_threshold {
            return Some((InvasionOutcome::Victory, InvasionEndReason::MoraleBroken));
        }

        None
    }

    fn finish(&mut self, outcome: InvasionOutcome, reason: InvasionEndReason) -> DetailedInvasionResult {
        let state = &mut self.state;
        state.is_active = false;

        let (primary_completed, primary_total) = primary_tally(&state.objectives);
        let (secondary_completed, secondary_total) = secondary_tally(&state.objectives);
        let ratio = secondary_completion_ratio(&state.objectives);

        let result = DetailedInvasionResult {
            invasion_id: state.id,
            outcome,
            reason,
            turns_taken: state.round,
            defenders_lost: state.defenders_lost(),
            invaders_lost: state.invaders_lost(),
            objectives_completed: primary_completed + secondary_completed,
            objectives_total: primary_total + secondary_total,
            primary_completed,
            primary_total,
            secondary_completed,
            secondary_total,
            reward_multiplier: 1.0 + self.config.secondary_reward_bonus * ratio,
            altar_hp_remaining: state.altar_hp,
        };

        tracing::info!(
            "Invasion {} ended after {} rounds: {:?} ({:?}), {} invaders and {} defenders lost",
            result.invasion_id,
            result.turns_taken,
            outcome,
            reason,
            result.invaders_lost,
            result.defenders_lost
        );
        self.events.push(
            result.turns_taken,
            InvasionEventType::InvasionEnded { outcome, reason },
            format!("Invasion ended: {:?} ({:?})", outcome, reason),
        );
        self.result = Some(result.clone());
        result
    }
}
