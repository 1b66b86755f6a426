//! Core types for Pyre: the persisted side of a dice-pool character.
//!
//! This crate defines the records the rules engine reads and the typed
//! patches it writes back. It knows nothing about derived values; those are
//! recomputed by `pyre-mechanics` on every pass.

/// Abilities, stat keys, and addressable ability references.
pub mod ability;
/// The character record and actor kinds.
pub mod character;
/// Error types used throughout the crate.
pub mod error;
/// Stable identifiers for characters and owned items.
pub mod id;
/// Owned items: skills, traits, reputations, possessions, armor.
pub mod item;
/// Forgiving numeric parsing for partially initialized records.
pub mod lenient;
/// Typed partial updates with revision tokens.
pub mod patch;
/// Per-character settings.
pub mod settings;
/// Shades and the worst-of ordering.
pub mod shade;
/// Wound slots and severity bands.
pub mod wound;

/// Re-export ability types.
pub use ability::{Ability, StatKey, StatRef, Stats};
/// Re-export character types.
pub use character::{ActorKind, CharacterRecord};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export identifiers.
pub use id::{CharacterId, ItemId};
/// Re-export item types.
pub use item::{Item, ItemKind};
/// Re-export patch types.
pub use patch::{Patch, PtgsAction, Update};
/// Re-export settings.
pub use settings::Settings;
/// Re-export shade.
pub use shade::Shade;
/// Re-export wound types.
pub use wound::{WOUND_SLOTS, WoundBand, WoundSlot, Wounds};
