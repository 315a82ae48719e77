//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placed room on a floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

/// Anyone who takes turns: defenders and invaders share one id space
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "combatant#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectiveId(pub u32);

/// Unique identifier for one invasion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvasionId(pub Uuid);

impl InvasionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InvasionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvasionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! content_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

content_id!(
    /// Room type as authored in content data (e.g. "crypt", "treasury")
    RoomTypeId
);
content_id!(
    /// Static invader definition key
    InvaderDefId
);
content_id!(
    /// Static ability definition key
    AbilityId
);
content_id!(
    /// Static ability effect key
    EffectId
);

/// Round counter (one round = every living combatant acts once)
pub type Round = u32;

/// Tile position on a floor grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// 4-directional neighbours in fixed N, E, S, W order
    pub fn neighbors4(&self) -> [GridPos; 4] {
        [
            GridPos::new(self.x, self.y - 1),
            GridPos::new(self.x + 1, self.y),
            GridPos::new(self.x, self.y + 1),
            GridPos::new(self.x - 1, self.y),
        ]
    }
}

/// Which side of the invasion a combatant fights for
///
/// Ordering matters: defenders sort before invaders when initiative ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Defender,
    Invader,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Defender => Side::Invader,
            Side::Invader => Side::Defender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defenders_sort_before_invaders() {
        assert!(Side::Defender < Side::Invader);
        assert_eq!(Side::Invader.opponent(), Side::Defender);
    }

    #[test]
    fn test_neighbor_order_is_fixed() {
        let p = GridPos::new(2, 2);
        assert_eq!(
            p.neighbors4(),
            [
                GridPos::new(2, 1),
                GridPos::new(3, 2),
                GridPos::new(2, 3),
                GridPos::new(1, 2)
            ]
        );
        assert_eq!(p.manhattan(&GridPos::new(0, 5)), 5);
    }

    #[test]
    fn test_content_ids_serialize_as_plain_strings() {
        let id = AbilityId::new("power_strike");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"power_strike\"");
        assert_eq!(RoomId(3).to_string(), "room#3");
    }
}
