//! Applying a confirmed advancement.

use pyre_core::{Ability, Update};
use tracing::{info, warn};

use super::{AdvancementProposal, TestsNeeded, can_advance};
use crate::error::{MechError, MechResult};

/// Validate a confirmed proposal and build the write that applies it.
///
/// The proposal must have been raised at the ability's current exponent
/// and the ability must still be eligible. The returned update zeroes all
/// three counts and sets the exponent one higher in a single write.
pub fn resolve_advancement(
    proposal: &AdvancementProposal,
    ability: &Ability,
    needed: &TestsNeeded,
) -> MechResult<Update> {
    if proposal.from != ability.exponent {
        warn!(target = %proposal.target, proposed_from = proposal.from, current = ability.exponent, "stale advancement");
        return Err(MechError::StaleProposal {
            target: proposal.target,
            proposed_from: proposal.from,
            current: ability.exponent,
        });
    }
    if !can_advance(ability, needed) {
        warn!(name = %proposal.name, "advancement refused, tests incomplete");
        return Err(MechError::NotEligible(proposal.name.clone()));
    }
    info!(name = %proposal.name, from = proposal.from, to = proposal.to, "advancing");
    Ok(Update::Advance {
        target: proposal.target,
        exponent: ability.exponent.saturating_add(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyre_core::{CharacterRecord, Patch, StatKey, StatRef};

    const POWER: StatRef = StatRef::Stat(StatKey::Power);

    #[test]
    fn eligible_ability_advances_and_resets() {
        let mut record = CharacterRecord::new("Kael");
        *record.stats.get_mut(StatKey::Power) = Ability::new(4).with_tests(0, 2, 1);
        let needed = TestsNeeded::for_exponent(4, false);
        let proposal = AdvancementProposal::new(POWER, "Power", 4);

        let update =
            resolve_advancement(&proposal, record.stats.get(StatKey::Power), &needed).unwrap();
        record.apply(&Patch::new(0).with(update)).unwrap();

        let power = record.stats.get(StatKey::Power);
        assert_eq!(power.exponent, 5);
        assert_eq!((power.routine, power.difficult, power.challenging), (0, 0, 0));
    }

    #[test]
    fn ineligible_is_rejected() {
        let ability = Ability::new(4).with_tests(0, 1, 0);
        let needed = TestsNeeded::for_exponent(4, false);
        let proposal = AdvancementProposal::new(POWER, "Power", 4);
        let err = resolve_advancement(&proposal, &ability, &needed).unwrap_err();
        assert!(matches!(err, MechError::NotEligible(name) if name == "Power"));
    }

    #[test]
    fn stale_proposal_is_rejected() {
        let ability = Ability::new(5).with_tests(0, 3, 0);
        let needed = TestsNeeded::for_exponent(5, false);
        let proposal = AdvancementProposal::new(POWER, "Power", 4);
        let err = resolve_advancement(&proposal, &ability, &needed).unwrap_err();
        assert!(matches!(
            err,
            MechError::StaleProposal {
                proposed_from: 4,
                current: 5,
                ..
            }
        ));
    }
}
