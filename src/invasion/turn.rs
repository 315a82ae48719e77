//! Initiative and turn order
//!
//! Each round: drop the dead, sort by speed, then hand out one action per
//! combatant. Equal speed goes to defenders first, then to whoever was
//! registered earlier, so the order never depends on anything but the roster.

use serde::{Deserialize, Serialize};

use crate::core::types::{AbilityId, CombatantId, Round, RoomId};
use crate::invasion::combatant::Combatant;

/// Phase of the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurnPhase {
    #[default]
    RoundStart,
    InProgress,
    RoundEnd,
}

/// What an attack is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackTarget {
    Combatant(CombatantId),
    Altar,
}

/// One action taken on a combatant's turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatAction {
    /// Step into an adjacent room
    Move { to: RoomId },
    Attack { target: AttackTarget },
    Ability {
        ability: AbilityId,
        targets: Vec<CombatantId>,
    },
    Wait,
}

/// Initiative order for the living combatants in `roster`
///
/// Speed descending, then defenders before invaders, then roster order.
pub fn initiative_order(roster: &[Combatant]) -> Vec<CombatantId> {
    let mut living: Vec<(usize, &Combatant)> = roster
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_alive())
        .collect();

    living.sort_by(|(ia, a), (ib, b)| {
        b.speed
            .cmp(&a.speed)
            .then_with(|| a.side.cmp(&b.side))
            .then_with(|| ia.cmp(ib))
    });

    living.into_iter().map(|(_, c)| c.id).collect()
}

/// Round-robin initiative queue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnQueue {
    order: Vec<CombatantId>,
    current_index: usize,
    round: Round,
    phase: TurnPhase,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn order(&self) -> &[CombatantId] {
        &self.order
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Rebuild for the next round
    ///
    /// Returns false when nobody is left alive; the round counter is not
    /// advanced in that case.
    pub fn start_round(&mut self, roster: &mut [Combatant]) -> bool {
        let order = initiative_order(roster);
        if order.is_empty() {
            self.order.clear();
            self.current_index = 0;
            self.phase = TurnPhase::RoundEnd;
            return false;
        }

        for combatant in roster.iter_mut() {
            combatant.has_acted = false;
        }

        self.order = order;
        self.current_index = 0;
        self.round += 1;
        self.phase = TurnPhase::InProgress;
        true
    }

    /// Whose turn it is, skipping anyone who died earlier this round
    pub fn current(&mut self, roster: &[Combatant]) -> Option<CombatantId> {
        if self.phase != TurnPhase::InProgress {
            return None;
        }
        while let Some(&id) = self.order.get(self.current_index) {
            if roster.iter().any(|c| c.id == id && c.is_alive()) {
                return Some(id);
            }
            self.current_index += 1;
        }
        self.phase = TurnPhase::RoundEnd;
        None
    }

    /// Mark the current combatant as having acted and move on
    pub fn advance(&mut self, roster: &mut [Combatant]) {
        if self.phase != TurnPhase::InProgress {
            return;
        }
        debug_assert!(self.current_index < self.order.len(), "turn index out of range");

        if let Some(&id) = self.order.get(self.current_index) {
            if let Some(combatant) = roster.iter_mut().find(|c| c.id == id) {
                combatant.has_acted = true;
            }
        }
        self.current_index += 1;
        if self.current_index >= self.order.len() {
            self.phase = TurnPhase::RoundEnd;
        }
    }

    pub fn is_round_complete(&self) -> bool {
        self.phase == TurnPhase::RoundEnd
    }

    /// Hand control back to round start after the end-of-round bookkeeping
    pub fn finish_round(&mut self) {
        if self.phase == TurnPhase::RoundEnd {
            self.phase = TurnPhase::RoundStart;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Side;

    fn unit(id: u32, side: Side, speed: i32) -> Combatant {
        Combatant::new(CombatantId(id), side, format!("u{id}"), 10, 5, 5, speed)
    }

    #[test]
    fn test_order_by_speed_then_side_then_registration() {
        let roster = vec![
            unit(1, Side::Invader, 5),
            unit(2, Side::Defender, 3),
            unit(3, Side::Defender, 5),
            unit(4, Side::Invader, 9),
            unit(5, Side::Defender, 5),
        ];

        let order = initiative_order(&roster);

        assert_eq!(
            order,
            vec![CombatantId(4), CombatantId(3), CombatantId(5), CombatantId(1), CombatantId(2)]
        );
    }

    #[test]
    fn test_round_lifecycle() {
        let mut roster = vec![unit(1, Side::Defender, 4), unit(2, Side::Invader, 6)];
        let mut queue = TurnQueue::new();

        assert!(queue.start_round(&mut roster));
        assert_eq!(queue.round(), 1);
        assert_eq!(queue.phase(), TurnPhase::InProgress);

        assert_eq!(queue.current(&roster), Some(CombatantId(2)));
        queue.advance(&mut roster);
        assert_eq!(queue.current(&roster), Some(CombatantId(1)));
        queue.advance(&mut roster);

        assert!(queue.is_round_complete());
        assert!(roster.iter().all(|c| c.has_acted));

        queue.finish_round();
        assert!(queue.start_round(&mut roster));
        assert_eq!(queue.round(), 2);
        assert!(roster.iter().all(|c| !c.has_acted));
    }

    #[test]
    fn test_dead_dropped_on_rebuild_and_skipped_mid_round() {
        let mut roster = vec![
            unit(1, Side::Defender, 9),
            unit(2, Side::Invader, 5),
            unit(3, Side::Invader, 1),
        ];
        let mut queue = TurnQueue::new();
        queue.start_round(&mut roster);

        assert_eq!(queue.current(&roster), Some(CombatantId(1)));
        // Defender kills invader 2 on its turn
        roster[1].take_damage(100);
        queue.advance(&mut roster);

        assert_eq!(queue.current(&roster), Some(CombatantId(3)));
        queue.advance(&mut roster);
        assert!(queue.is_round_complete());

        queue.finish_round();
        queue.start_round(&mut roster);
        assert_eq!(queue.order(), &[CombatantId(1), CombatantId(3)]);
    }

    #[test]
    fn test_empty_roster_signals_completion() {
        let mut roster = vec![unit(1, Side::Invader, 3)];
        roster[0].take_damage(100);
        let mut queue = TurnQueue::new();

        assert!(!queue.start_round(&mut roster));
        assert_eq!(queue.round(), 0);
        assert_eq!(queue.current(&roster), None);
    }
}
