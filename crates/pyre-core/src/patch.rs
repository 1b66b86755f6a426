//! Typed partial updates.
//!
//! Every write the engine makes is expressed as a [`Patch`]: a list of
//! explicit setter operations on addressable abilities and fields, built
//! against a known record revision. A persistence layer applies a patch
//! whole or not at all.

use serde::{Deserialize, Serialize};

use crate::ability::StatRef;
use crate::id::ItemId;
use crate::wound::{WOUND_SLOTS, WoundBand};

/// Which pain flag a successful test may switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PtgsAction {
    /// Shrug it off.
    Shrugging,
    /// Grit your teeth.
    Gritting,
}

/// A single explicit write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
pub enum Update {
    /// Overwrite the logged test counts of an ability.
    SetTests {
        /// The ability.
        target: StatRef,
        /// New routine count.
        routine: u32,
        /// New difficult count.
        difficult: u32,
        /// New challenging count.
        challenging: u32,
    },
    /// Zero all logged tests and set a new exponent.
    Advance {
        /// The ability.
        target: StatRef,
        /// The new exponent.
        exponent: u32,
    },
    /// Overwrite the fate spent on an ability.
    SetAbilityFate {
        /// The ability.
        target: StatRef,
        /// New fate-spent count.
        fate: u32,
    },
    /// Overwrite the character's available fate points.
    SetFate(u32),
    /// Switch a pain flag.
    SetPtgs {
        /// Which flag.
        action: PtgsAction,
        /// New value.
        value: bool,
    },
    /// Store recomputed wound bands.
    SetWoundBands([WoundBand; WOUND_SLOTS]),
    /// Equip or unequip an armor item.
    SetEquipped {
        /// The armor item.
        item: ItemId,
        /// New state.
        equipped: bool,
    },
    /// Overwrite the funds dice.
    SetFunds(u32),
    /// Overwrite the resources tax.
    SetResourcesTax(u32),
    /// Reduce Resources after being taxed to zero: new exponent and tax,
    /// logged tests cleared.
    DegradeResources {
        /// New resources exponent.
        exponent: u32,
        /// New resources tax.
        tax: u32,
    },
}

/// A set of updates to apply atomically.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Patch {
    /// Revision of the record this patch was computed from.
    pub base_revision: u64,
    /// Updates in application order.
    pub updates: Vec<Update>,
}

impl Patch {
    /// Start an empty patch against a revision.
    pub fn new(base_revision: u64) -> Self {
        Self {
            base_revision,
            updates: Vec::new(),
        }
    }

    /// Append an update.
    pub fn with(mut self, update: Update) -> Self {
        self.updates.push(update);
        self
    }

    /// Append an update in place.
    pub fn push(&mut self, update: Update) {
        self.updates.push(update);
    }

    /// True if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}
