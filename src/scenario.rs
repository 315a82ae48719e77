//! Scenario files for the headless runner
//!
//! A scenario bundles a floor layout, optional extra content, the invasion
//! setup and config overrides in one TOML document.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::content::{ContentFile, ContentLibrary};
use crate::core::config::InvasionConfig;
use crate::core::error::{InvasionError, Result};
use crate::dungeon::floor::{Connection, Floor, PlacedRoom};
use crate::dungeon::graph::DungeonGraph;
use crate::invasion::state::InvasionSetup;

fn default_true() -> bool {
    true
}

/// Floor section of a scenario file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorLayout {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub rooms: Vec<PlacedRoom>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl FloorLayout {
    /// Place every room on a fresh grid, rejecting overlaps and dangling connections
    pub fn build(&self) -> Result<Floor> {
        let mut floor = Floor::new(self.width, self.height);
        floor.depth = self.depth;
        for room in &self.rooms {
            floor.place_room(room.clone())?;
        }
        for connection in &self.connections {
            for end in [connection.from, connection.to] {
                if floor.room(end).is_none() {
                    return Err(InvasionError::UnknownRoom(end));
                }
            }
            floor.connections.push(connection.clone());
        }
        Ok(floor)
    }
}

/// On-disk scenario document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub config: InvasionConfig,
    /// Start from the built-in invader roster before adding `content`
    #[serde(default = "default_true")]
    pub standard_content: bool,
    #[serde(default)]
    pub content: ContentFile,
    pub floor: FloorLayout,
    pub setup: InvasionSetup,
}

/// A loaded scenario, ready to hand to the engine
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub config: InvasionConfig,
    pub content: ContentLibrary,
    pub floor: Floor,
    pub setup: InvasionSetup,
}

impl Scenario {
    pub fn from_file(file: ScenarioFile) -> Result<Self> {
        file.config.validate()?;
        let floor = file.floor.build()?;

        let mut content = if file.standard_content {
            ContentLibrary::standard()
        } else {
            ContentLibrary::new()
        };
        content.extend(file.content);
        let problems = content.validate();
        if !problems.is_empty() {
            tracing::warn!("Scenario '{}' has {} content problems", file.name, problems.len());
        }

        Ok(Self {
            name: file.name,
            config: file.config,
            content,
            floor,
            setup: file.setup,
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ScenarioFile = toml::from_str(contents)?;
        Self::from_file(file)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn graph(&self) -> DungeonGraph {
        DungeonGraph::build(&self.floor)
    }
}
