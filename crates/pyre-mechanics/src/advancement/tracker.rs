//! Per-ability test tracking.

use pyre_core::{Ability, StatRef, Update};
use serde::{Deserialize, Serialize};

use super::{AdvancementProposal, TestBand, TestDifficulty, TestsNeeded, can_advance, count};

/// Where an ability stands on its way to the next exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingState {
    /// Still accumulating tests.
    Tracking,
    /// A band has reached its target; an advancement may be confirmed.
    Eligible,
}

impl TrackingState {
    /// Derive the state from logged counts and current targets.
    pub fn of(ability: &Ability, needed: &TestsNeeded) -> Self {
        if can_advance(ability, needed) {
            Self::Eligible
        } else {
            Self::Tracking
        }
    }
}

/// An ability as seen by the tracker for one test.
#[derive(Debug, Clone, Copy)]
pub struct TrackedAbility<'a> {
    /// Address of the ability.
    pub target: StatRef,
    /// Roll name, used in proposals.
    pub name: &'a str,
    /// Current persisted state.
    pub ability: &'a Ability,
    /// Targets from the latest recomputation.
    pub needed: TestsNeeded,
    /// Failed tests are not logged for this ability.
    pub success_only: bool,
}

/// Result of logging a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestOutcome {
    /// The test does not count (a failure on a success-only ability).
    Ignored,
    /// The test was considered.
    Logged(TestLog),
}

impl TestOutcome {
    /// The advancement proposal raised by this test, if any.
    pub fn proposal(&self) -> Option<&AdvancementProposal> {
        match self {
            Self::Ignored => None,
            Self::Logged(log) => log.proposal.as_ref(),
        }
    }

    /// The write this test needs, if any count moved.
    pub fn update(&self) -> Option<Update> {
        match self {
            Self::Ignored => None,
            Self::Logged(log) => log.update(),
        }
    }
}

/// A considered test: which band moved and the resulting counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestLog {
    /// The ability.
    pub target: StatRef,
    /// Band that was incremented; `None` if every candidate band was full.
    pub credited: Option<TestBand>,
    /// Routine count after the test.
    pub routine: u32,
    /// Difficult count after the test.
    pub difficult: u32,
    /// Challenging count after the test.
    pub challenging: u32,
    /// Raised whenever the counts satisfy the advancement predicate.
    pub proposal: Option<AdvancementProposal>,
}

impl TestLog {
    /// `SetTests` for the new counts, if a band was credited.
    pub fn update(&self) -> Option<Update> {
        self.credited.map(|_| Update::SetTests {
            target: self.target,
            routine: self.routine,
            difficult: self.difficult,
            challenging: self.challenging,
        })
    }
}

/// Log one test against an ability.
///
/// A band at its target is frozen: the test is considered but not banked.
/// Eligibility is checked after every considered test, so a declined
/// advancement is offered again on the next one.
pub fn record_test(
    subject: &TrackedAbility<'_>,
    difficulty: TestDifficulty,
    successful: bool,
) -> TestOutcome {
    if subject.success_only && !successful {
        return TestOutcome::Ignored;
    }

    let below = |band: TestBand| count(subject.ability, band) < subject.needed.get(band);
    let credited = match difficulty {
        TestDifficulty::Routine => Some(TestBand::Routine).filter(|b| below(*b)),
        TestDifficulty::Difficult => Some(TestBand::Difficult).filter(|b| below(*b)),
        TestDifficulty::Challenging => Some(TestBand::Challenging).filter(|b| below(*b)),
        TestDifficulty::RoutineOrDifficult => [TestBand::Difficult, TestBand::Routine]
            .into_iter()
            .find(|b| below(*b)),
    };

    let mut after = subject.ability.clone();
    match credited {
        Some(TestBand::Routine) => after.routine += 1,
        Some(TestBand::Difficult) => after.difficult += 1,
        Some(TestBand::Challenging) => after.challenging += 1,
        None => {}
    }

    let proposal = can_advance(&after, &subject.needed).then(|| {
        AdvancementProposal::new(subject.target, subject.name, subject.ability.exponent)
    });

    TestOutcome::Logged(TestLog {
        target: subject.target,
        credited,
        routine: after.routine,
        difficult: after.difficult,
        challenging: after.challenging,
        proposal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advancement::AdvancementPolicy;
    use proptest::prelude::*;
    use pyre_core::StatKey;

    const WILL: StatRef = StatRef::Stat(StatKey::Will);
    const STEEL: StatRef = StatRef::Stat(StatKey::Steel);

    fn subject(target: StatRef, ability: &Ability, success_only: bool) -> TrackedAbility<'_> {
        let needed = AdvancementPolicy::for_ref(target).tests_needed(ability.exponent, 0);
        TrackedAbility {
            target,
            name: "Test",
            ability,
            needed,
            success_only,
        }
    }

    fn log(outcome: TestOutcome) -> TestLog {
        match outcome {
            TestOutcome::Logged(log) => log,
            TestOutcome::Ignored => panic!("test was ignored"),
        }
    }

    #[test]
    fn failure_on_success_only_is_ignored() {
        let ability = Ability::new(4);
        let outcome = record_test(&subject(WILL, &ability, true), TestDifficulty::Difficult, false);
        assert_eq!(outcome, TestOutcome::Ignored);
        assert!(outcome.update().is_none());
    }

    #[test]
    fn difficult_test_increments() {
        let ability = Ability::new(4);
        let log = log(record_test(
            &subject(WILL, &ability, false),
            TestDifficulty::Difficult,
            false,
        ));
        assert_eq!(log.credited, Some(TestBand::Difficult));
        assert_eq!(log.difficult, 1);
        assert!(log.proposal.is_none());
        assert_eq!(
            log.update(),
            Some(Update::SetTests {
                target: WILL,
                routine: 0,
                difficult: 1,
                challenging: 0
            })
        );
    }

    #[test]
    fn filling_a_band_proposes_advancement() {
        // Will 4 needs 2 difficult.
        let ability = Ability::new(4).with_tests(0, 1, 0);
        let log = log(record_test(
            &subject(WILL, &ability, false),
            TestDifficulty::Difficult,
            true,
        ));
        let proposal = log.proposal.expect("eligible");
        assert_eq!((proposal.from, proposal.to), (4, 5));
        assert_eq!(proposal.target, WILL);
    }

    #[test]
    fn full_band_is_frozen_but_reoffers() {
        let ability = Ability::new(4).with_tests(0, 2, 0);
        let log = log(record_test(
            &subject(WILL, &ability, false),
            TestDifficulty::Difficult,
            true,
        ));
        assert_eq!(log.credited, None);
        assert_eq!(log.difficult, 2);
        assert!(log.update().is_none());
        assert!(log.proposal.is_some());
    }

    #[test]
    fn routine_on_stat_without_routine_does_nothing() {
        let ability = Ability::new(3);
        let log = log(record_test(
            &subject(WILL, &ability, false),
            TestDifficulty::Routine,
            true,
        ));
        assert_eq!(log.credited, None);
        assert!(log.proposal.is_none());
    }

    #[test]
    fn combined_band_prefers_difficult() {
        // Steel 3: routine 3, difficult 2.
        let ability = Ability::new(3).with_tests(0, 1, 0);
        let log1 = log(record_test(
            &subject(STEEL, &ability, false),
            TestDifficulty::RoutineOrDifficult,
            true,
        ));
        assert_eq!(log1.credited, Some(TestBand::Difficult));

        let ability = Ability::new(3).with_tests(0, 2, 0);
        let log2 = log(record_test(
            &subject(STEEL, &ability, false),
            TestDifficulty::RoutineOrDifficult,
            true,
        ));
        assert_eq!(log2.credited, Some(TestBand::Routine));
        assert_eq!(log2.routine, 1);
    }

    #[test]
    fn state_reflects_counts() {
        let needed = TestsNeeded::for_exponent(4, true);
        assert_eq!(TrackingState::of(&Ability::new(4), &needed), TrackingState::Tracking);
        assert_eq!(
            TrackingState::of(&Ability::new(4).with_tests(0, 0, 1), &needed),
            TrackingState::Eligible
        );
    }

    fn difficulty() -> impl Strategy<Value = TestDifficulty> {
        prop_oneof![
            Just(TestDifficulty::Routine),
            Just(TestDifficulty::Difficult),
            Just(TestDifficulty::Challenging),
            Just(TestDifficulty::RoutineOrDifficult),
        ]
    }

    proptest! {
        #[test]
        fn counts_never_pass_targets(
            exponent in 0u32..10,
            tests in prop::collection::vec((difficulty(), any::<bool>()), 0..40),
        ) {
            let mut ability = Ability::new(exponent);
            let needed = TestsNeeded::for_exponent(exponent, true);
            for (difficulty, ok) in tests {
                let tracked = TrackedAbility {
                    target: STEEL,
                    name: "Steel",
                    ability: &ability,
                    needed,
                    success_only: false,
                };
                if let TestOutcome::Logged(log) = record_test(&tracked, difficulty, ok) {
                    ability.routine = log.routine;
                    ability.difficult = log.difficult;
                    ability.challenging = log.challenging;
                }
                prop_assert!(ability.routine <= needed.routine);
                prop_assert!(ability.difficult <= needed.difficult);
                prop_assert!(ability.challenging <= needed.challenging);
            }
        }

        #[test]
        fn test_at_ceiling_is_idempotent(exponent in 0u32..10, difficulty in difficulty()) {
            let needed = TestsNeeded::for_exponent(exponent, true);
            let ability = Ability::new(exponent)
                .with_tests(needed.routine, needed.difficult, needed.challenging);
            let tracked = TrackedAbility {
                target: STEEL,
                name: "Steel",
                ability: &ability,
                needed,
                success_only: false,
            };
            let outcome = record_test(&tracked, difficulty, true);
            prop_assert!(outcome.update().is_none());
            prop_assert!(outcome.proposal().is_some());
        }
    }
}
