//! Attributes computed from stats: reflexes, mortal wound, sustained-spell
//! limits, hesitation.

use pyre_core::{Shade, Stats};
use serde::{Deserialize, Serialize};

/// Added to the Power/Forte average to get mortal-wound capacity.
const MORTAL_WOUND_BASE: u32 = 6;

/// Hesitation is this minus Will.
const HESITATION_BASE: i32 = 10;

/// An exponent with its shade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadedExponent {
    /// Exponent; may go negative for heavily wounded reflexes.
    pub exponent: i32,
    /// Shade.
    pub shade: Shade,
}

impl std::fmt::Display for ShadedExponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.shade, self.exponent)
    }
}

/// How many spells can be sustained, and at what obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SustainedLimits {
    /// Number of spells that can be sustained.
    pub max_sustained: i32,
    /// Highest total obstacle of sustained spells.
    pub max_ob_sustained: i32,
}

fn average(sum: u32, count: u32, round_up: bool) -> u32 {
    if round_up {
        sum.div_ceil(count)
    } else {
        sum / count
    }
}

fn signed(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Reflexes: average of Perception, Agility, and Speed, less wound dice.
///
/// The shade is the worst of the three. A mixed-shade character gets one
/// die back for each component lighter than that worst shade.
pub fn reflexes(stats: &Stats, wound_dice: u32, round_up: bool) -> ShadedExponent {
    let parts = [&stats.perception, &stats.agility, &stats.speed];
    let sum = parts
        .iter()
        .fold(0u32, |acc, a| acc.saturating_add(a.exponent));
    let mut exponent = signed(average(sum, 3, round_up)) - signed(wound_dice);

    let shade = Shade::worst(parts.iter().map(|a| a.shade)).unwrap_or_default();
    let lighter = match shade {
        Shade::Black => parts.iter().filter(|a| a.shade != Shade::Black).count(),
        Shade::Gray => parts.iter().filter(|a| a.shade == Shade::White).count(),
        Shade::White => 0,
    };
    exponent = exponent.saturating_add(lighter as i32);

    ShadedExponent { exponent, shade }
}

/// Mortal wound: average of Power and Forte plus six, one more when their
/// shades differ. The shade is the worse of the two.
pub fn mortal_wound(stats: &Stats, round_up: bool) -> ShadedExponent {
    let power = &stats.power;
    let forte = &stats.forte;
    let sum = power.exponent.saturating_add(forte.exponent);
    let mut exponent = average(sum, 2, round_up).saturating_add(MORTAL_WOUND_BASE);
    if power.shade != forte.shade {
        exponent = exponent.saturating_add(1);
    }
    ShadedExponent {
        exponent: signed(exponent),
        shade: power.shade.worst_of(forte.shade),
    }
}

/// Sustained-spell limits from Will and Forte.
pub fn sustained(stats: &Stats, wound_dice: u32, forte_tax: u32) -> SustainedLimits {
    let wd = signed(wound_dice);
    SustainedLimits {
        max_sustained: signed(stats.will.exponent).saturating_sub(wd).saturating_sub(1),
        max_ob_sustained: signed(stats.forte.exponent)
            .saturating_sub(wd)
            .saturating_sub(signed(forte_tax))
            .saturating_sub(1),
    }
}

/// Hesitation from Will.
pub fn hesitation(stats: &Stats) -> i32 {
    HESITATION_BASE - signed(stats.will.exponent)
}
