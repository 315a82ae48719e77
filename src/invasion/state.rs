//! Invasion setup and live state

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::content::ContentLookup;
use crate::core::config::InvasionConfig;
use crate::core::error::{InvasionError, Result};
use crate::core::types::{CombatantId, InvaderDefId, InvasionId, RoomId, Round, Side};
use crate::dungeon::graph::DungeonGraph;
use crate::invasion::combatant::{Combatant, Controller, InvaderInstance};
use crate::invasion::objectives::{InvasionObjective, ObjectiveContext};

fn default_morale() -> f64 {
    100.0
}

/// A dungeon monster present when the invasion starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenderSpawn {
    pub id: CombatantId,
    pub name: String,
    pub room: RoomId,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    #[serde(default)]
    pub controller: Controller,
}

/// An invader entering through `room`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvaderSpawn {
    pub definition: InvaderDefId,
    pub room: RoomId,
}

/// Everything needed to start an invasion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvasionSetup {
    #[serde(default)]
    pub invasion_id: Option<InvasionId>,
    #[serde(default)]
    pub defenders: Vec<DefenderSpawn>,
    pub invaders: Vec<InvaderSpawn>,
    #[serde(default)]
    pub objectives: Vec<InvasionObjective>,
    pub altar_room: RoomId,
    #[serde(default = "default_morale")]
    pub starting_morale: f64,
    /// Rooms nobody may enter
    #[serde(default)]
    pub sealed_rooms: BTreeSet<RoomId>,
    /// Overrides `InvasionConfig::max_turns`
    #[serde(default)]
    pub max_turns: Option<u32>,
}

impl InvasionSetup {
    pub fn new(altar_room: RoomId) -> Self {
        Self {
            invasion_id: None,
            defenders: Vec::new(),
            invaders: Vec::new(),
            objectives: Vec::new(),
            altar_room,
            starting_morale: default_morale(),
            sealed_rooms: BTreeSet::new(),
            max_turns: None,
        }
    }
}

/// Live state of one invasion, owned by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvasionState {
    pub id: InvasionId,
    pub round: Round,
    pub max_turns: u32,

    // Altar
    pub altar_room: RoomId,
    pub altar_hp: i32,
    pub altar_max_hp: i32,

    /// Both sides, in registration order
    pub combatants: Vec<Combatant>,
    pub invaders: Vec<InvaderInstance>,
    pub objectives: Vec<InvasionObjective>,

    // Casualty tracking
    pub initial_defenders: usize,
    pub initial_invaders: usize,
    pub slain: BTreeSet<CombatantId>,

    // Invader party
    pub morale: f64,
    pub morale_broken: bool,
    pub visited_rooms: BTreeSet<RoomId>,
    pub scouted_rooms: BTreeSet<RoomId>,
    pub treasure_stolen: u32,

    pub sealed_rooms: BTreeSet<RoomId>,
    pub is_active: bool,
}

impl InvasionState {
    /// Build the starting state; fails on unknown rooms, definitions or duplicate ids
    pub fn from_setup(
        setup: &InvasionSetup,
        graph: &DungeonGraph,
        content: &impl ContentLookup,
        config: &InvasionConfig,
    ) -> Result<Self> {
        if !graph.contains(setup.altar_room) {
            return Err(InvasionError::UnknownRoom(setup.altar_room));
        }
        if setup.invaders.is_empty() {
            return Err(InvasionError::InvalidScenario(
                "an invasion needs at least one invader".into(),
            ));
        }

        let mut combatants = Vec::with_capacity(setup.defenders.len() + setup.invaders.len());
        let mut used = BTreeSet::new();

        for spawn in &setup.defenders {
            let node = graph
                .node(spawn.room)
                .ok_or(InvasionError::UnknownRoom(spawn.room))?;
            if !used.insert(spawn.id) {
                return Err(InvasionError::InvalidScenario(format!(
                    "duplicate defender id {}",
                    spawn.id
                )));
            }
            let defender = Combatant::new(
                spawn.id,
                Side::Defender,
                spawn.name.clone(),
                spawn.max_hp,
                spawn.attack,
                spawn.defense,
                spawn.speed,
            )
            .in_room(spawn.room, node.position)
            .with_controller(spawn.controller);
            combatants.push(defender);
        }

        // Invaders take ids after the highest defender id
        let mut next_id = used.iter().next_back().map(|id| id.0 + 1).unwrap_or(1);
        let mut invaders = Vec::with_capacity(setup.invaders.len());
        let mut visited_rooms = BTreeSet::new();

        for spawn in &setup.invaders {
            let node = graph
                .node(spawn.room)
                .ok_or(InvasionError::UnknownRoom(spawn.room))?;
            let definition = content
                .invader(&spawn.definition)
                .ok_or_else(|| InvasionError::UnknownInvaderDefinition(spawn.definition.clone()))?;

            let id = CombatantId(next_id);
            next_id += 1;

            combatants.push(Combatant::from_definition(id, definition).in_room(spawn.room, node.position));
            invaders.push(InvaderInstance::new(id, definition));
            visited_rooms.insert(spawn.room);
        }

        for objective in &setup.objectives {
            if let Some(room) = objective.target_room {
                if !graph.contains(room) {
                    return Err(InvasionError::UnknownRoom(room));
                }
            }
            if let Some(target) = objective.target_entity {
                if !used.contains(&target) {
                    return Err(InvasionError::UnknownCombatant(target));
                }
            }
        }

        let scouted_rooms = visited_rooms.clone();

        Ok(Self {
            id: setup.invasion_id.unwrap_or_default(),
            round: 0,
            max_turns: setup.max_turns.unwrap_or(config.max_turns),
            altar_room: setup.altar_room,
            altar_hp: config.altar_max_hp,
            altar_max_hp: config.altar_max_hp,
            initial_defenders: setup.defenders.len(),
            initial_invaders: invaders.len(),
            combatants,
            invaders,
            objectives: setup.objectives.clone(),
            slain: BTreeSet::new(),
            morale: setup.starting_morale.clamp(0.0, config.fear.max_morale),
            morale_broken: false,
            visited_rooms,
            scouted_rooms,
            treasure_stolen: 0,
            sealed_rooms: setup.sealed_rooms.clone(),
            is_active: true,
        })
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn invader(&self, id: CombatantId) -> Option<&InvaderInstance> {
        self.invaders.iter().find(|i| i.id == id)
    }

    pub fn invader_mut(&mut self, id: CombatantId) -> Option<&mut InvaderInstance> {
        self.invaders.iter_mut().find(|i| i.id == id)
    }

    /// Living combatants on one side, in registration order
    pub fn living(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.combatants
            .iter()
            .filter(move |c| c.side == side && c.is_alive())
    }

    pub fn living_count(&self, side: Side) -> usize {
        self.living(side).count()
    }

    /// Living combatants of `side` standing in `room`
    pub fn living_in_room(&self, side: Side, room: RoomId) -> impl Iterator<Item = &Combatant> {
        self.living(side).filter(move |c| c.room == Some(room))
    }

    pub fn defenders_lost(&self) -> usize {
        self.initial_defenders - self.living_count(Side::Defender)
    }

    pub fn invaders_lost(&self) -> usize {
        self.initial_invaders - self.living_count(Side::Invader)
    }

    pub fn room_of(&self, id: CombatantId) -> Option<RoomId> {
        self.combatant(id).and_then(|c| c.room)
    }

    /// Rooms currently holding a living invader
    pub fn occupied_rooms(&self) -> BTreeSet<RoomId> {
        self.living(Side::Invader).filter_map(|c| c.room).collect()
    }

    pub fn objective_context(&self, config: &InvasionConfig) -> ObjectiveContext {
        ObjectiveContext {
            altar_hp: self.altar_hp,
            altar_max_hp: self.altar_max_hp,
            slain: self.slain.clone(),
            occupied_rooms: self.occupied_rooms(),
            treasure_stolen: self.treasure_stolen,
            treasure_goal: config.treasure_goal,
            rooms_scouted: self.scouted_rooms.len(),
            scout_goal: config.scout_goal,
        }
    }

    /// Move morale by `delta`, clamped to the configured range
    pub fn adjust_morale(&mut self, delta: f64, max_morale: f64) -> f64 {
        self.morale = (self.morale + delta).clamp(0.0, max_morale);
        self.morale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLibrary;
    use crate::dungeon::graph::PathNode;
    use crate::core::types::{GridPos, ObjectiveId, RoomTypeId};
    use crate::invasion::objectives::ObjectiveKind;

    fn graph() -> DungeonGraph {
        let node = |id: u32| PathNode {
            room_id: RoomId(id),
            room_type: RoomTypeId::new("hall"),
            position: GridPos::new(id as i32 * 4, 0),
            fear_level: 0,
        };
        DungeonGraph::from_parts(
            vec![node(1), node(2), node(3)],
            &[(RoomId(1), RoomId(2), 1.0), (RoomId(2), RoomId(3), 1.0)],
        )
    }

    fn goblin(id: u32, room: u32) -> DefenderSpawn {
        DefenderSpawn {
            id: CombatantId(id),
            name: "Goblin".into(),
            room: RoomId(room),
            max_hp: 12,
            attack: 5,
            defense: 3,
            speed: 4,
            controller: Controller::Auto,
        }
    }

    fn setup() -> InvasionSetup {
        let mut setup = InvasionSetup::new(RoomId(3));
        setup.defenders = vec![goblin(1, 2), goblin(5, 3)];
        setup.invaders = vec![
            InvaderSpawn {
                definition: InvaderDefId::new("warrior"),
                room: RoomId(1),
            },
            InvaderSpawn {
                definition: InvaderDefId::new("rogue"),
                room: RoomId(1),
            },
        ];
        setup
    }

    #[test]
    fn test_from_setup_registers_both_sides() {
        let library = ContentLibrary::standard();
        let state = InvasionState::from_setup(&setup(), &graph(), &library, &InvasionConfig::default()).unwrap();

        let ids: Vec<u32> = state.combatants.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![1, 5, 6, 7]);
        assert_eq!(state.invaders.len(), 2);
        assert_eq!(state.initial_defenders, 2);
        assert_eq!(state.altar_hp, 100);
        assert_eq!(state.max_turns, 30);
        assert_eq!(state.combatant(CombatantId(6)).unwrap().position, Some(GridPos::new(4, 0)));
        assert!(state.scouted_rooms.contains(&RoomId(1)));
    }

    #[test]
    fn test_unknown_room_rejected() {
        let library = ContentLibrary::standard();
        let mut bad = setup();
        bad.invaders[0].room = RoomId(42);

        let err = InvasionState::from_setup(&bad, &graph(), &library, &InvasionConfig::default()).unwrap_err();
        assert!(matches!(err, InvasionError::UnknownRoom(RoomId(42))));
    }

    #[test]
    fn test_unknown_definition_rejected() {
        let library = ContentLibrary::standard();
        let mut bad = setup();
        bad.invaders[1].definition = InvaderDefId::new("dragon");

        let err = InvasionState::from_setup(&bad, &graph(), &library, &InvasionConfig::default()).unwrap_err();
        assert!(matches!(err, InvasionError::UnknownInvaderDefinition(_)));
    }

    #[test]
    fn test_slay_objective_must_name_a_defender() {
        let library = ContentLibrary::standard();
        let mut bad = setup();
        bad.objectives = vec![
            InvasionObjective::new(ObjectiveId(1), ObjectiveKind::SlayMonster, true).against(CombatantId(99)),
        ];

        let err = InvasionState::from_setup(&bad, &graph(), &library, &InvasionConfig::default()).unwrap_err();
        assert!(matches!(err, InvasionError::UnknownCombatant(CombatantId(99))));
    }

    #[test]
    fn test_casualties_and_occupancy() {
        let library = ContentLibrary::standard();
        let mut state = InvasionState::from_setup(&setup(), &graph(), &library, &InvasionConfig::default()).unwrap();

        state.combatant_mut(CombatantId(6)).unwrap().take_damage(1000);
        state.combatant_mut(CombatantId(1)).unwrap().take_damage(1000);

        assert_eq!(state.invaders_lost(), 1);
        assert_eq!(state.defenders_lost(), 1);
        assert_eq!(state.occupied_rooms(), BTreeSet::from([RoomId(1)]));
        assert_eq!(state.living_in_room(Side::Defender, RoomId(3)).count(), 1);
    }

    #[test]
    fn test_morale_clamped() {
        let library = ContentLibrary::standard();
        let mut state = InvasionState::from_setup(&setup(), &graph(), &library, &InvasionConfig::default()).unwrap();
        assert_eq!(state.adjust_morale(50.0, 100.0), 100.0);
        assert_eq!(state.adjust_morale(-250.0, 100.0), 0.0);
    }
}
