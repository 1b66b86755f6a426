//! Physical tolerance: wound dice and the superficial-wound obstacle.

use pyre_core::{WOUND_SLOTS, WoundBand, Wounds};
use serde::{Deserialize, Serialize};

/// Superficial wounds at or above this count cost a wound die.
const SUPERFICIAL_DIE_AT: u32 = 3;

/// Aggregate pain derived from the wound grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PainTally {
    /// Wounds sitting in superficial slots.
    pub superficial_count: u32,
    /// Dice removed from most rolls.
    pub wound_dice: u32,
    /// Obstacle added by superficial wounds (0 or 1).
    pub ob_penalty: u32,
}

impl PainTally {
    /// Tally the grid using the given bands (one per slot).
    pub fn compute(
        wounds: &Wounds,
        bands: &[WoundBand; WOUND_SLOTS],
        ignore_superficial: bool,
    ) -> Self {
        let mut superficial_count: u32 = 0;
        let mut wound_dice: u32 = 0;
        for (slot, band) in wounds.slots.iter().zip(bands) {
            let count = slot.severity_count;
            if *band == WoundBand::Superficial {
                superficial_count = superficial_count.saturating_add(count);
            } else {
                let dice = count.saturating_mul(band.wound_dice_weight());
                wound_dice = wound_dice.saturating_add(dice);
            }
        }

        let mut ob_penalty = 0;
        if superficial_count >= SUPERFICIAL_DIE_AT {
            wound_dice = wound_dice.saturating_add(1);
        } else if !wounds.shrugging && superficial_count >= 1 && !ignore_superficial {
            ob_penalty = 1;
        }
        if wounds.gritting && wound_dice > 0 {
            wound_dice -= 1;
        }

        Self {
            superficial_count,
            wound_dice,
            ob_penalty,
        }
    }
}
