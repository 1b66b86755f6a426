//! Advancement: test targets, the per-ability tracking state machine, and
//! the resolver that applies a confirmed advancement.
//!
//! An ability logs routine, difficult, and challenging tests up to the
//! targets for its exponent. Once a band with a target is full the ability
//! is eligible; the engine proposes `exponent + 1` and the caller decides
//! whether to confirm. Nothing here talks to a UI.

pub mod resolver;
pub mod tracker;

pub use resolver::resolve_advancement;
pub use tracker::{TestLog, TestOutcome, TrackedAbility, TrackingState, record_test};

use std::fmt;
use std::str::FromStr;

use pyre_core::{Ability, StatKey, StatRef};
use serde::{Deserialize, Serialize};

/// Above this exponent routine tests no longer count.
const ROUTINE_CUTOFF: u32 = 5;

/// Difficulty group of a test, as reported by the roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestDifficulty {
    /// Routine.
    Routine,
    /// Difficult.
    Difficult,
    /// Challenging.
    Challenging,
    /// Counts as difficult while difficult tests are needed, else routine.
    #[serde(rename = "Routine/Difficult")]
    RoutineOrDifficult,
}

impl FromStr for TestDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "routine" | "r" => Ok(Self::Routine),
            "difficult" | "d" => Ok(Self::Difficult),
            "challenging" | "c" => Ok(Self::Challenging),
            "routine/difficult" | "routine-difficult" | "rd" => Ok(Self::RoutineOrDifficult),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

impl fmt::Display for TestDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routine => write!(f, "Routine"),
            Self::Difficult => write!(f, "Difficult"),
            Self::Challenging => write!(f, "Challenging"),
            Self::RoutineOrDifficult => write!(f, "Routine/Difficult"),
        }
    }
}

/// A single test counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestBand {
    /// Routine tests.
    Routine,
    /// Difficult tests.
    Difficult,
    /// Challenging tests.
    Challenging,
}

impl fmt::Display for TestBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routine => write!(f, "routine"),
            Self::Difficult => write!(f, "difficult"),
            Self::Challenging => write!(f, "challenging"),
        }
    }
}

/// Tests needed in each band before an ability may advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestsNeeded {
    /// Routine tests needed (0 when routine tests do not count).
    pub routine: u32,
    /// Difficult tests needed.
    pub difficult: u32,
    /// Challenging tests needed.
    pub challenging: u32,
}

impl TestsNeeded {
    /// Targets for a lookup exponent.
    pub fn for_exponent(exponent: u32, counts_routine: bool) -> Self {
        let routine = if counts_routine && exponent < ROUTINE_CUTOFF {
            exponent.max(1)
        } else {
            0
        };
        let challenging = if exponent < ROUTINE_CUTOFF {
            1
        } else {
            exponent / 2 - 1
        };
        Self {
            routine,
            difficult: exponent.div_ceil(2).max(1),
            challenging,
        }
    }

    /// Target for one band.
    pub fn get(&self, band: TestBand) -> u32 {
        match band {
            TestBand::Routine => self.routine,
            TestBand::Difficult => self.difficult,
            TestBand::Challenging => self.challenging,
        }
    }
}

/// Logged counts of an ability, read as a band-indexed triple.
pub fn count(ability: &Ability, band: TestBand) -> u32 {
    match band {
        TestBand::Routine => ability.routine,
        TestBand::Difficult => ability.difficult,
        TestBand::Challenging => ability.challenging,
    }
}

/// Whether an ability's logged tests fill any band that has a target.
pub fn can_advance(ability: &Ability, needed: &TestsNeeded) -> bool {
    [TestBand::Routine, TestBand::Difficult, TestBand::Challenging]
        .into_iter()
        .any(|band| {
            let target = needed.get(band);
            target > 0 && count(ability, band) >= target
        })
}

/// How wounds and other pressures move the exponent used to look up targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestShift {
    /// Look up at the exponent itself.
    None,
    /// Look up at the exponent reduced by current wound dice.
    WoundDice,
    /// Look up at the exponent moved by a fixed amount.
    Fixed(i32),
}

/// Per-ability advancement rules, chosen from what the ability is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancementPolicy {
    /// Whether routine tests count toward advancement.
    pub counts_routine: bool,
    /// Lookup exponent shift.
    pub shift: TestShift,
}

impl AdvancementPolicy {
    /// Rules for a stat or attribute.
    pub fn for_stat(key: StatKey) -> Self {
        match key {
            StatKey::Will
            | StatKey::Power
            | StatKey::Perception
            | StatKey::Agility
            | StatKey::Forte
            | StatKey::Speed => Self {
                counts_routine: false,
                shift: TestShift::WoundDice,
            },
            StatKey::Steel => Self {
                counts_routine: true,
                shift: TestShift::WoundDice,
            },
            StatKey::Resources => Self {
                counts_routine: true,
                shift: TestShift::Fixed(-1),
            },
            StatKey::Health | StatKey::Circles | StatKey::Custom1 | StatKey::Custom2 => Self {
                counts_routine: true,
                shift: TestShift::None,
            },
        }
    }

    /// Rules for a skill.
    pub fn for_skill() -> Self {
        Self {
            counts_routine: true,
            shift: TestShift::None,
        }
    }

    /// Rules for any addressable ability.
    pub fn for_ref(target: StatRef) -> Self {
        match target {
            StatRef::Stat(key) => Self::for_stat(key),
            StatRef::Skill(_) => Self::for_skill(),
        }
    }

    /// Test targets for an exponent under current wound dice.
    pub fn tests_needed(&self, exponent: u32, wound_dice: u32) -> TestsNeeded {
        let lookup = match self.shift {
            TestShift::None => exponent,
            TestShift::WoundDice => exponent.saturating_sub(wound_dice),
            TestShift::Fixed(n) => exponent.saturating_add_signed(n),
        };
        TestsNeeded::for_exponent(lookup, self.counts_routine)
    }
}

/// A proposed advancement, returned to the caller for confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancementProposal {
    /// The ability to advance.
    pub target: StatRef,
    /// The name its rolls go by.
    pub name: String,
    /// Exponent the proposal was computed from.
    pub from: u32,
    /// Proposed exponent, always `from + 1`.
    pub to: u32,
}

impl AdvancementProposal {
    pub(crate) fn new(target: StatRef, name: impl Into<String>, from: u32) -> Self {
        Self {
            target,
            name: name.into(),
            from,
            to: from.saturating_add(1),
        }
    }
}

impl fmt::Display for AdvancementProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is ready to advance: {} -> {}", self.name, self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_below_five_count_routine() {
        assert_eq!(
            TestsNeeded::for_exponent(3, true),
            TestsNeeded {
                routine: 3,
                difficult: 2,
                challenging: 1
            }
        );
        assert_eq!(
            TestsNeeded::for_exponent(1, true),
            TestsNeeded {
                routine: 1,
                difficult: 1,
                challenging: 1
            }
        );
    }

    #[test]
    fn exponent_zero_still_needs_something() {
        let n = TestsNeeded::for_exponent(0, true);
        assert_eq!((n.routine, n.difficult, n.challenging), (1, 1, 1));
    }

    #[test]
    fn targets_from_five_drop_routine() {
        assert_eq!(
            TestsNeeded::for_exponent(5, true),
            TestsNeeded {
                routine: 0,
                difficult: 3,
                challenging: 1
            }
        );
        assert_eq!(
            TestsNeeded::for_exponent(8, true),
            TestsNeeded {
                routine: 0,
                difficult: 4,
                challenging: 3
            }
        );
    }

    #[test]
    fn stats_never_need_routine() {
        assert_eq!(TestsNeeded::for_exponent(2, false).routine, 0);
        let will = AdvancementPolicy::for_stat(StatKey::Will);
        assert_eq!(will.tests_needed(3, 0).routine, 0);
    }

    #[test]
    fn wound_dice_lower_the_lookup() {
        let perception = AdvancementPolicy::for_stat(StatKey::Perception);
        assert_eq!(perception.tests_needed(6, 0).difficult, 3);
        assert_eq!(perception.tests_needed(6, 4).difficult, 1);
        assert_eq!(perception.tests_needed(2, 9), TestsNeeded::for_exponent(0, false));

        let health = AdvancementPolicy::for_stat(StatKey::Health);
        assert_eq!(health.tests_needed(6, 4), TestsNeeded::for_exponent(6, true));
    }

    #[test]
    fn resources_look_up_one_lower() {
        let resources = AdvancementPolicy::for_stat(StatKey::Resources);
        assert_eq!(resources.tests_needed(4, 3), TestsNeeded::for_exponent(3, true));
        assert_eq!(resources.tests_needed(0, 0), TestsNeeded::for_exponent(0, true));
    }

    #[test]
    fn empty_bands_do_not_qualify() {
        let needed = TestsNeeded {
            routine: 0,
            difficult: 3,
            challenging: 1,
        };
        assert!(!can_advance(&Ability::new(5), &needed));
        assert!(can_advance(&Ability::new(5).with_tests(0, 0, 1), &needed));
        assert!(can_advance(&Ability::new(5).with_tests(0, 3, 0), &needed));
        assert!(!can_advance(&Ability::new(5).with_tests(9, 2, 0), &needed));
    }

    #[test]
    fn difficulty_parsing() {
        assert_eq!(
            "Routine/Difficult".parse::<TestDifficulty>().unwrap(),
            TestDifficulty::RoutineOrDifficult
        );
        assert_eq!(
            "challenging".parse::<TestDifficulty>().unwrap(),
            TestDifficulty::Challenging
        );
        assert!("easy".parse::<TestDifficulty>().is_err());
        assert_eq!(TestDifficulty::RoutineOrDifficult.to_string(), "Routine/Difficult");
    }

    #[test]
    fn proposal_is_one_step() {
        let p = AdvancementProposal::new(StatRef::Stat(StatKey::Will), "Will", 4);
        assert_eq!(p.to, 5);
        assert_eq!(p.to_string(), "Will is ready to advance: 4 -> 5");
    }
}
