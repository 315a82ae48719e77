//! Invasion objectives and their evaluation
//!
//! Each objective is checked on its own against a snapshot of the invasion.
//! Progress only ever rises and completion never reverts.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::{CombatantId, ObjectiveId, RoomId};
use crate::dungeon::pathfinding::ObjectiveTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    DestroyAltar,
    SlayMonster,
    RescuePrisoner,
    StealTreasure,
    SealPortal,
    Scout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvasionObjective {
    pub id: ObjectiveId,
    pub kind: ObjectiveKind,
    #[serde(default)]
    pub target_room: Option<RoomId>,
    #[serde(default)]
    pub target_entity: Option<CombatantId>,
    pub is_primary: bool,
    /// Higher wins when two objective rooms are equally far
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub is_completed: bool,
    /// 0-100
    #[serde(default)]
    pub progress: f64,
}

impl InvasionObjective {
    pub fn new(id: ObjectiveId, kind: ObjectiveKind, is_primary: bool) -> Self {
        Self {
            id,
            kind,
            target_room: None,
            target_entity: None,
            is_primary,
            priority: if is_primary { 2 } else { 1 },
            is_completed: false,
            progress: 0.0,
        }
    }

    pub fn at_room(mut self, room: RoomId) -> Self {
        self.target_room = Some(room);
        self
    }

    pub fn against(mut self, entity: CombatantId) -> Self {
        self.target_entity = Some(entity);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Raise progress; never lowers it, and 100 marks completion
    fn record_progress(&mut self, progress: f64) -> bool {
        self.progress = self.progress.max(progress.clamp(0.0, 100.0));
        if !self.is_completed && self.progress >= 100.0 {
            self.is_completed = true;
            return true;
        }
        false
    }
}

/// World facts the objectives are judged against
#[derive(Debug, Clone, Default)]
pub struct ObjectiveContext {
    pub altar_hp: i32,
    pub altar_max_hp: i32,
    /// Combatants that have died
    pub slain: BTreeSet<CombatantId>,
    /// Rooms currently holding a living invader
    pub occupied_rooms: BTreeSet<RoomId>,
    pub treasure_stolen: u32,
    pub treasure_goal: u32,
    pub rooms_scouted: usize,
    pub scout_goal: u32,
}

fn ratio(done: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        100.0
    } else {
        done / goal * 100.0
    }
}

/// Re-evaluate every objective; returns the ids completed by this call
pub fn evaluate_objectives(
    objectives: &mut [InvasionObjective],
    ctx: &ObjectiveContext,
) -> Vec<ObjectiveId> {
    let mut completed = Vec::new();

    for objective in objectives.iter_mut() {
        if objective.is_completed {
            continue;
        }

        let progress = match objective.kind {
            ObjectiveKind::DestroyAltar => {
                if ctx.altar_hp <= 0 {
                    100.0
                } else {
                    ratio((ctx.altar_max_hp - ctx.altar_hp) as f64, ctx.altar_max_hp as f64)
                }
            }
            ObjectiveKind::SlayMonster => match objective.target_entity {
                Some(target) if ctx.slain.contains(&target) => 100.0,
                _ => 0.0,
            },
            ObjectiveKind::RescuePrisoner | ObjectiveKind::SealPortal => match objective.target_room {
                Some(room) if ctx.occupied_rooms.contains(&room) => 100.0,
                _ => 0.0,
            },
            ObjectiveKind::StealTreasure => {
                ratio(ctx.treasure_stolen as f64, ctx.treasure_goal as f64)
            }
            ObjectiveKind::Scout => ratio(ctx.rooms_scouted as f64, ctx.scout_goal as f64),
        };

        if objective.record_progress(progress) {
            completed.push(objective.id);
        }
    }

    completed
}

/// True only if there is at least one primary objective and all are done
pub fn all_primary_completed(objectives: &[InvasionObjective]) -> bool {
    let mut primaries = objectives.iter().filter(|o| o.is_primary).peekable();
    primaries.peek().is_some() && primaries.all(|o| o.is_completed)
}

/// (completed, total) primary objectives
pub fn primary_tally(objectives: &[InvasionObjective]) -> (usize, usize) {
    tally(objectives.iter().filter(|o| o.is_primary))
}

/// (completed, total) secondary objectives
pub fn secondary_tally(objectives: &[InvasionObjective]) -> (usize, usize) {
    tally(objectives.iter().filter(|o| !o.is_primary))
}

fn tally<'a>(objectives: impl Iterator<Item = &'a InvasionObjective>) -> (usize, usize) {
    objectives.fold((0, 0), |(done, total), o| {
        (done + usize::from(o.is_completed), total + 1)
    })
}

/// Fraction of secondary objectives completed; 0 when there are none
pub fn secondary_completion_ratio(objectives: &[InvasionObjective]) -> f64 {
    let (done, total) = secondary_tally(objectives);
    if total == 0 {
        0.0
    } else {
        done as f64 / total as f64
    }
}

/// Rooms of open objectives, as pathfinding targets
///
/// Slay-monster objectives target wherever the monster currently stands.
pub fn open_targets(
    objectives: &[InvasionObjective],
    locate: impl Fn(CombatantId) -> Option<RoomId>,
) -> Vec<ObjectiveTarget> {
    objectives
        .iter()
        .filter(|o| !o.is_completed)
        .filter_map(|o| {
            let room = match o.kind {
                ObjectiveKind::SlayMonster => o.target_entity.and_then(&locate).or(o.target_room),
                _ => o.target_room,
            }?;
            Some(ObjectiveTarget {
                objective: o.id,
                room,
                priority: o.priority,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ObjectiveContext {
        ObjectiveContext {
            altar_hp: 100,
            altar_max_hp: 100,
            treasure_goal: 3,
            scout_goal: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_altar_progress_tracks_damage() {
        let mut objectives = vec![InvasionObjective::new(ObjectiveId(1), ObjectiveKind::DestroyAltar, true)];
        let mut c = ctx();

        c.altar_hp = 60;
        assert!(evaluate_objectives(&mut objectives, &c).is_empty());
        assert_eq!(objectives[0].progress, 40.0);

        c.altar_hp = 0;
        assert_eq!(evaluate_objectives(&mut objectives, &c), vec![ObjectiveId(1)]);
        assert!(objectives[0].is_completed);
    }

    #[test]
    fn test_progress_never_decreases() {
        let mut objectives = vec![InvasionObjective::new(ObjectiveId(1), ObjectiveKind::DestroyAltar, true)];
        let mut c = ctx();

        c.altar_hp = 50;
        evaluate_objectives(&mut objectives, &c);
        // Altar repaired
        c.altar_hp = 90;
        evaluate_objectives(&mut objectives, &c);

        assert_eq!(objectives[0].progress, 50.0);
    }

    #[test]
    fn test_completion_is_sticky() {
        let mut objectives = vec![InvasionObjective::new(ObjectiveId(1), ObjectiveKind::SealPortal, true)
            .at_room(RoomId(4))];
        let mut c = ctx();
        c.occupied_rooms.insert(RoomId(4));
        assert_eq!(evaluate_objectives(&mut objectives, &c), vec![ObjectiveId(1)]);

        c.occupied_rooms.clear();
        assert!(evaluate_objectives(&mut objectives, &c).is_empty());
        assert!(objectives[0].is_completed);
    }

    #[test]
    fn test_slay_treasure_and_scout() {
        let mut objectives = vec![
            InvasionObjective::new(ObjectiveId(1), ObjectiveKind::SlayMonster, false).against(CombatantId(3)),
            InvasionObjective::new(ObjectiveId(2), ObjectiveKind::StealTreasure, false).at_room(RoomId(2)),
            InvasionObjective::new(ObjectiveId(3), ObjectiveKind::Scout, false),
        ];
        let mut c = ctx();
        c.treasure_stolen = 1;
        c.rooms_scouted = 2;

        assert!(evaluate_objectives(&mut objectives, &c).is_empty());
        assert!((objectives[1].progress - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(objectives[2].progress, 50.0);

        c.slain.insert(CombatantId(3));
        c.treasure_stolen = 3;
        c.rooms_scouted = 5;
        assert_eq!(
            evaluate_objectives(&mut objectives, &c),
            vec![ObjectiveId(1), ObjectiveId(2), ObjectiveId(3)]
        );
    }

    #[test]
    fn test_primary_gate_and_secondary_ratio() {
        let mut objectives = vec![
            InvasionObjective::new(ObjectiveId(1), ObjectiveKind::DestroyAltar, true),
            InvasionObjective::new(ObjectiveId(2), ObjectiveKind::Scout, false),
            InvasionObjective::new(ObjectiveId(3), ObjectiveKind::StealTreasure, false),
        ];
        assert!(!all_primary_completed(&objectives));
        assert_eq!(secondary_completion_ratio(&objectives), 0.0);

        objectives[0].is_completed = true;
        objectives[1].is_completed = true;
        assert!(all_primary_completed(&objectives));
        assert_eq!(secondary_completion_ratio(&objectives), 0.5);
        assert_eq!(primary_tally(&objectives), (1, 1));
        assert_eq!(secondary_tally(&objectives), (1, 2));
    }

    #[test]
    fn test_no_primaries_never_completes() {
        let objectives = vec![InvasionObjective::new(ObjectiveId(1), ObjectiveKind::Scout, false)];
        assert!(!all_primary_completed(&objectives));
    }

    #[test]
    fn test_open_targets_follow_monster() {
        let mut objectives = vec![
            InvasionObjective::new(ObjectiveId(1), ObjectiveKind::SlayMonster, true).against(CombatantId(8)),
            InvasionObjective::new(ObjectiveId(2), ObjectiveKind::Scout, false),
            InvasionObjective::new(ObjectiveId(3), ObjectiveKind::SealPortal, false).at_room(RoomId(5)),
        ];
        objectives[2].is_completed = true;

        let targets = open_targets(&objectives, |id| (id == CombatantId(8)).then_some(RoomId(9)));

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].room, RoomId(9));
        assert_eq!(targets[0].priority, 2);
    }
}
