use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lenient;

/// Number of wound slots on the physical tolerance grid.
pub const WOUND_SLOTS: usize = 16;

/// Severity band of a wound slot, from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WoundBand {
    /// Below the superficial threshold.
    #[default]
    Bruise,
    /// Superficial wound.
    Superficial,
    /// Light wound.
    Light,
    /// Midi wound.
    Midi,
    /// Severe wound.
    Severe,
    /// Traumatic wound.
    Traumatic,
    /// Mortal wound.
    Mortal,
}

impl WoundBand {
    /// How many wound dice one wound of this band costs. Superficial
    /// wounds are tallied separately and cost none directly.
    pub fn wound_dice_weight(self) -> u32 {
        match self {
            Self::Light => 1,
            Self::Midi => 2,
            Self::Severe => 3,
            Self::Traumatic => 4,
            Self::Bruise | Self::Superficial | Self::Mortal => 0,
        }
    }
}

impl fmt::Display for WoundBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bruise => write!(f, "bruise"),
            Self::Superficial => write!(f, "superficial"),
            Self::Light => write!(f, "light"),
            Self::Midi => write!(f, "midi"),
            Self::Severe => write!(f, "severe"),
            Self::Traumatic => write!(f, "traumatic"),
            Self::Mortal => write!(f, "mortal"),
        }
    }
}

/// One slot of the wound grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WoundSlot {
    /// How many wounds sit in this slot.
    #[serde(rename = "amount", deserialize_with = "lenient::u32_field")]
    pub severity_count: u32,
    /// Band assigned on the last recomputation. Never edited by hand.
    #[serde(rename = "threshold")]
    pub band: WoundBand,
}

/// The wound grid plus the two player-toggled pain flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Wounds {
    /// Slots 1 through 16, stored zero-based.
    pub slots: [WoundSlot; WOUND_SLOTS],
    /// Shrug-it-off is active.
    pub shrugging: bool,
    /// Grit-your-teeth is active.
    pub gritting: bool,
}

impl Wounds {
    /// Record `count` wounds in a 1-based slot. Out-of-range slots are ignored.
    pub fn set(&mut self, slot: usize, count: u32) {
        if let Some(s) = slot.checked_sub(1).and_then(|i| self.slots.get_mut(i)) {
            s.severity_count = count;
        }
    }

    /// Current bands of all slots, in order.
    pub fn bands(&self) -> [WoundBand; WOUND_SLOTS] {
        self.slots.map(|s| s.band)
    }

    /// Overwrite the assigned bands.
    pub fn assign_bands(&mut self, bands: &[WoundBand; WOUND_SLOTS]) {
        for (slot, band) in self.slots.iter_mut().zip(bands) {
            slot.band = *band;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bands_are_ordered() {
        assert!(WoundBand::Bruise < WoundBand::Superficial);
        assert!(WoundBand::Traumatic < WoundBand::Mortal);
    }

    #[test]
    fn weights() {
        assert_eq!(WoundBand::Superficial.wound_dice_weight(), 0);
        assert_eq!(WoundBand::Light.wound_dice_weight(), 1);
        assert_eq!(WoundBand::Traumatic.wound_dice_weight(), 4);
    }

    #[test]
    fn slot_reads_radio_button_array() {
        let slot: WoundSlot =
            serde_json::from_value(json!({"amount": ["2"], "threshold": "light"})).unwrap();
        assert_eq!(slot.severity_count, 2);
        assert_eq!(slot.band, WoundBand::Light);
    }

    #[test]
    fn set_is_one_based() {
        let mut w = Wounds::default();
        w.set(1, 3);
        w.set(16, 1);
        w.set(0, 9);
        w.set(17, 9);
        assert_eq!(w.slots[0].severity_count, 3);
        assert_eq!(w.slots[15].severity_count, 1);
        assert_eq!(w.slots.iter().map(|s| s.severity_count).sum::<u32>(), 4);
    }

    #[test]
    fn assign_bands_overwrites() {
        let mut w = Wounds::default();
        let mut bands = [WoundBand::Bruise; WOUND_SLOTS];
        bands[15] = WoundBand::Mortal;
        w.assign_bands(&bands);
        assert_eq!(w.bands(), bands);
    }
}
