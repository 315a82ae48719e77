//! Invader, ability and effect definitions
//!
//! Loaded by the content subsystem and looked up by id. The engine sees only
//! the `ContentLookup` trait, so tests can supply synthetic content.

pub mod definitions;
pub mod library;

pub use definitions::{
    AbilityDefinition, AbilityTarget, EffectDefinition, EffectKind, InvaderDefinition,
};
pub use library::{ContentFile, ContentLibrary, ContentLookup};
