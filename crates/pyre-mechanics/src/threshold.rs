//! Wound-severity thresholds.
//!
//! The wound grid is split into bands by six cut points derived from
//! Forte and mortal-wound capacity. Cut points are computed top-down from
//! the mortal wound so each one sits strictly below the next.

use pyre_core::{WOUND_SLOTS, WoundBand};
use serde::{Deserialize, Serialize};

/// Mortal-wound capacity used when none has been derived.
pub const DEFAULT_MORTAL_WOUND: i32 = 15;

/// Forte exponent used when none is set.
pub const DEFAULT_FORTE: i32 = 1;

/// The six wound cut points: `su <= li < mi < se < tr < mo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Superficial.
    pub su: i32,
    /// Light.
    pub li: i32,
    /// Midi.
    pub mi: i32,
    /// Severe.
    pub se: i32,
    /// Traumatic.
    pub tr: i32,
    /// Mortal.
    pub mo: i32,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self::compute(DEFAULT_MORTAL_WOUND, DEFAULT_FORTE)
    }
}

impl ThresholdSet {
    /// Compute cut points from mortal-wound capacity and Forte.
    ///
    /// Forte is clamped to at least 1. Mortal wound is clamped to at least
    /// `su + 4`, the smallest capacity that leaves room for four distinct
    /// cut points above superficial.
    pub fn compute(mortal_wound: i32, forte: i32) -> Self {
        let forte = forte.max(1);
        let su = forte / 2 + 1;
        let max_gap = forte / 2 + forte % 2;
        let step = |n: i32| su.saturating_add(max_gap.saturating_mul(n));
        let mo = mortal_wound.max(su.saturating_add(4));
        let tr = (mo - 1).min(step(4));
        let se = (tr - 1).min(step(3));
        let mi = (se - 1).min(step(2));
        let li = (mi - 1).min(step(1));
        Self {
            su,
            li,
            mi,
            se,
            tr,
            mo,
        }
    }

    /// Compute with the documented defaults for unset inputs.
    pub fn from_optional(mortal_wound: Option<i32>, forte: Option<i32>) -> Self {
        Self::compute(
            mortal_wound.unwrap_or(DEFAULT_MORTAL_WOUND),
            forte.unwrap_or(DEFAULT_FORTE),
        )
    }

    /// Band for a 1-based slot index. Each cut point is checked in turn;
    /// the first one the slot falls below decides.
    pub fn band_for_slot(&self, slot: i32) -> WoundBand {
        if slot < self.su {
            WoundBand::Bruise
        } else if slot < self.li {
            WoundBand::Superficial
        } else if slot < self.mi {
            WoundBand::Light
        } else if slot < self.se {
            WoundBand::Midi
        } else if slot < self.tr {
            WoundBand::Severe
        } else if slot < self.mo {
            WoundBand::Traumatic
        } else {
            WoundBand::Mortal
        }
    }

    /// Bands for all sixteen slots.
    pub fn bands(&self) -> [WoundBand; WOUND_SLOTS] {
        std::array::from_fn(|i| self.band_for_slot(i as i32 + 1))
    }
}

impl std::fmt::Display for ThresholdSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Su {} Li {} Mi {} Se {} Tr {} Mo {}",
            self.su, self.li, self.mi, self.se, self.tr, self.mo
        )
    }
}
