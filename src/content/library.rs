//! Content lookup capability and the in-memory library behind it

use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::content::definitions::{
    AbilityDefinition, AbilityTarget, EffectDefinition, EffectKind, InvaderDefinition,
};
use crate::core::error::Result;
use crate::core::types::{AbilityId, EffectId, InvaderDefId};

/// Resolves content ids to definitions; missing ids are `None`, never a panic
pub trait ContentLookup {
    fn invader(&self, id: &InvaderDefId) -> Option<&InvaderDefinition>;
    fn ability(&self, id: &AbilityId) -> Option<&AbilityDefinition>;
    fn effect(&self, id: &EffectId) -> Option<&EffectDefinition>;
}

impl<T: ContentLookup + ?Sized> ContentLookup for &T {
    fn invader(&self, id: &InvaderDefId) -> Option<&InvaderDefinition> {
        (**self).invader(id)
    }
    fn ability(&self, id: &AbilityId) -> Option<&AbilityDefinition> {
        (**self).ability(id)
    }
    fn effect(&self, id: &EffectId) -> Option<&EffectDefinition> {
        (**self).effect(id)
    }
}

impl<T: ContentLookup + ?Sized> ContentLookup for Arc<T> {
    fn invader(&self, id: &InvaderDefId) -> Option<&InvaderDefinition> {
        (**self).invader(id)
    }
    fn ability(&self, id: &AbilityId) -> Option<&AbilityDefinition> {
        (**self).ability(id)
    }
    fn effect(&self, id: &EffectId) -> Option<&EffectDefinition> {
        (**self).effect(id)
    }
}

impl<T: ContentLookup + ?Sized> ContentLookup for Rc<T> {
    fn invader(&self, id: &InvaderDefId) -> Option<&InvaderDefinition> {
        (**self).invader(id)
    }
    fn ability(&self, id: &AbilityId) -> Option<&AbilityDefinition> {
        (**self).ability(id)
    }
    fn effect(&self, id: &EffectId) -> Option<&EffectDefinition> {
        (**self).effect(id)
    }
}

/// On-disk shape of a content file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentFile {
    pub invaders: Vec<InvaderDefinition>,
    pub abilities: Vec<AbilityDefinition>,
    pub effects: Vec<EffectDefinition>,
}

/// Hash-indexed content store
#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    invaders: AHashMap<InvaderDefId, InvaderDefinition>,
    abilities: AHashMap<AbilityId, AbilityDefinition>,
    effects: AHashMap<EffectId, EffectDefinition>,
}

impl ContentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(file: ContentFile) -> Self {
        let mut library = Self::new();
        library.extend(file);
        library
    }

    /// Add definitions; later entries replace earlier ones with the same id
    pub fn extend(&mut self, file: ContentFile) {
        for invader in file.invaders {
            self.insert_invader(invader);
        }
        for ability in file.abilities {
            self.insert_ability(ability);
        }
        for effect in file.effects {
            self.insert_effect(effect);
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ContentFile = toml::from_str(contents)?;
        let library = Self::from_file(file);
        library.validate();
        Ok(library)
    }

    /// Load content from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn insert_invader(&mut self, def: InvaderDefinition) {
        self.invaders.insert(def.id.clone(), def);
    }

    pub fn insert_ability(&mut self, def: AbilityDefinition) {
        self.abilities.insert(def.id.clone(), def);
    }

    pub fn insert_effect(&mut self, def: EffectDefinition) {
        self.effects.insert(def.id.clone(), def);
    }

    pub fn invader_count(&self) -> usize {
        self.invaders.len()
    }

    /// Dangling references, sorted for stable output
    ///
    /// Lookups degrade gracefully, so these are logged rather than rejected.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for invader in self.invaders.values() {
            for ability in &invader.abilities {
                if !self.abilities.contains_key(ability) {
                    problems.push(format!(
                        "invader '{}' grants unknown ability '{}'",
                        invader.id, ability
                    ));
                }
            }
            if invader.max_hp <= 0 {
                problems.push(format!("invader '{}' has no hit points", invader.id));
            }
        }

        for ability in self.abilities.values() {
            if !self.effects.contains_key(&ability.effect) {
                problems.push(format!(
                    "ability '{}' uses unknown effect '{}'",
                    ability.id, ability.effect
                ));
            }
        }

        problems.sort();
        for problem in &problems {
            tracing::warn!("Content problem: {}", problem);
        }
        problems
    }

    /// Built-in raiding party used by the runner and tests
    pub fn standard() -> Self {
        let mut library = Self::new();

        for (id, kind) in [
            ("strike", EffectKind::Damage),
            ("mend", EffectKind::SelfHeal),
            ("disarm", EffectKind::Disarm),
            ("battle_fury", EffectKind::Amplify),
            ("ward", EffectKind::Shield),
            ("reveal", EffectKind::Scout),
            ("rally", EffectKind::Courage),
            ("purge", EffectKind::Dispel),
        ] {
            library.insert_effect(EffectDefinition {
                id: EffectId::new(id),
                kind,
                description: String::new(),
            });
        }

        let abilities = [
            ("power_strike", "Power Strike", "strike", 150.0, 3, 0, AbilityTarget::Single),
            ("fireball", "Fireball", "strike", 120.0, 4, 0, AbilityTarget::Aoe),
            ("second_wind", "Second Wind", "mend", 30.0, 4, 0, AbilityTarget::SelfOnly),
            ("disarming_blow", "Disarming Blow", "disarm", 60.0, 3, 2, AbilityTarget::Single),
            ("war_cry", "War Cry", "battle_fury", 25.0, 5, 3, AbilityTarget::SelfOnly),
            ("shield_wall", "Shield Wall", "ward", 50.0, 4, 2, AbilityTarget::SelfOnly),
            ("scout_ahead", "Scout Ahead", "reveal", 3.0, 3, 0, AbilityTarget::SelfOnly),
            ("rallying_shout", "Rallying Shout", "rally", 0.0, 6, 3, AbilityTarget::SelfOnly),
            ("dispel_magic", "Dispel Magic", "purge", 0.0, 4, 0, AbilityTarget::Single),
        ];
        for (id, name, effect, value, cooldown, duration, target) in abilities {
            library.insert_ability(AbilityDefinition {
                id: AbilityId::new(id),
                name: name.to_string(),
                effect: EffectId::new(effect),
                value,
                cooldown,
                duration,
                target,
            });
        }

        let invaders: [(&str, &str, i32, i32, i32, i32, &[&str]); 5] = [
            ("warrior", "Warrior", 40, 8, 6, 4, &["power_strike", "war_cry"]),
            ("rogue", "Rogue", 26, 7, 4, 8, &["disarming_blow", "scout_ahead"]),
            ("mage", "Mage", 20, 10, 2, 5, &["fireball", "dispel_magic"]),
            ("cleric", "Cleric", 30, 5, 5, 3, &["second_wind", "rallying_shout"]),
            ("paladin", "Paladin", 45, 7, 8, 2, &["shield_wall", "second_wind"]),
        ];
        for (id, name, max_hp, attack, defense, speed, abilities) in invaders {
            library.insert_invader(InvaderDefinition {
                id: InvaderDefId::new(id),
                name: name.to_string(),
                max_hp,
                attack,
                defense,
                speed,
                abilities: abilities.iter().map(|a| AbilityId::new(*a)).collect(),
            });
        }

        library
    }
}

impl ContentLookup for ContentLibrary {
    fn invader(&self, id: &InvaderDefId) -> Option<&InvaderDefinition> {
        self.invaders.get(id)
    }

    fn ability(&self, id: &AbilityId) -> Option<&AbilityDefinition> {
        self.abilities.get(id)
    }

    fn effect(&self, id: &EffectId) -> Option<&EffectDefinition> {
        self.effects.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_library_is_consistent() {
        let library = ContentLibrary::standard();
        assert!(library.validate().is_empty());
        assert_eq!(library.invader_count(), 5);

        let warrior = library.invader(&InvaderDefId::new("warrior")).unwrap();
        assert_eq!(warrior.attack, 8);
        let strike = library.ability(&AbilityId::new("power_strike")).unwrap();
        assert_eq!(library.effect(&strike.effect).unwrap().kind, EffectKind::Damage);
    }

    #[test]
    fn test_missing_ids_resolve_to_none() {
        let library = ContentLibrary::standard();
        assert!(library.invader(&InvaderDefId::new("dragon")).is_none());
        assert!(library.ability(&AbilityId::new("meteor")).is_none());
    }

    #[test]
    fn test_load_from_toml_and_report_dangling_refs() {
        let library = ContentLibrary::from_toml_str(
            r#"
            [[invaders]]
            id = "thief"
            name = "Thief"
            max_hp = 12
            attack = 4
            defense = 2
            speed = 9
            abilities = ["smoke_bomb", "pickpocket"]

            [[abilities]]
            id = "smoke_bomb"
            name = "Smoke Bomb"
            effect = "haze"
            value = 40.0
            cooldown = 3
            duration = 2
            target = "aoe"
            "#,
        )
        .unwrap();

        let thief = library.invader(&InvaderDefId::new("thief")).unwrap();
        assert_eq!(thief.speed, 9);

        let problems = library.validate();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("unknown effect 'haze'"));
        assert!(problems[1].contains("unknown ability 'pickpocket'"));
    }

    #[test]
    fn test_lookup_through_shared_handles() {
        fn count_known(lookup: &impl ContentLookup) -> usize {
            ["warrior", "rogue", "lich"]
                .iter()
                .filter(|id| lookup.invader(&InvaderDefId::new(**id)).is_some())
                .count()
        }

        let library = Arc::new(ContentLibrary::standard());
        assert_eq!(count_known(&library), 2);
        assert_eq!(count_known(&&*library), 2);
    }
}
