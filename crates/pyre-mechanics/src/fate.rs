//! Fate-point rerolls.
//!
//! Spending a fate point rerolls part of a finished roll. Open-ended rolls
//! reroll one traitor die, if there was one; other rolls reroll every six,
//! and those dice explode. If the extra successes turn a failed roll into
//! a success, Faith, Resources, and Perception rolls log the test they
//! would have logged had the roll passed in the first place.

use std::fmt;

use chrono::{DateTime, Utc};
use pyre_core::{
    Ability, CharacterRecord, ItemId, Patch, PtgsAction, Shade, StatKey, StatRef, Update,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::advancement::{
    AdvancementProposal, TestDifficulty, TestOutcome, TrackedAbility, record_test,
};
use crate::derive::DerivedSnapshot;
use crate::dice::{DiceRoller, RollResult};
use crate::error::{MechError, MechResult};

/// Rolls that earn a retroactive test when a reroll saves them.
const CREDITED_ON_FLIP: [&str; 3] = ["faith", "resources", "perception"];

/// What was rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerollTarget {
    /// A stat or attribute roll.
    Stat(StatKey),
    /// A skill roll.
    Skill(ItemId),
    /// A beginner's-luck roll of a skill being learned. Fate is counted on
    /// the root stat when one is given, otherwise on the skill.
    Learning {
        /// The skill being learned.
        skill: ItemId,
        /// The stat the roll was made with.
        root: Option<StatKey>,
    },
}

impl RerollTarget {
    /// The ability whose shade and open-endedness govern the reroll.
    pub fn rolled(self) -> StatRef {
        match self {
            Self::Stat(key) => StatRef::Stat(key),
            Self::Skill(id) | Self::Learning { skill: id, .. } => StatRef::Skill(id),
        }
    }

    /// The ability whose fate-spent counter goes up.
    pub fn fate_counter(self) -> StatRef {
        match self {
            Self::Stat(key) => StatRef::Stat(key),
            Self::Skill(id) => StatRef::Skill(id),
            Self::Learning { skill, root } => root.map_or(StatRef::Skill(skill), StatRef::Stat),
        }
    }
}

/// A request to spend fate on a finished roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FateRerollRequest {
    /// What was rolled.
    pub target: RerollTarget,
    /// Faces of the original roll.
    pub faces: Vec<u32>,
    /// Successes the original roll scored.
    pub successes: u32,
    /// Obstacle of the original roll.
    pub obstacle: u32,
    /// Difficulty group of the original roll.
    pub difficulty: TestDifficulty,
    /// Pain flag the roll would have set on success.
    #[serde(default)]
    pub ptgs_action: Option<PtgsAction>,
}

/// How many dice to reroll and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerollPlan {
    /// Dice to roll.
    pub dice: u32,
    /// Whether sixes explode.
    pub explodes: bool,
    /// Shade the dice are judged at.
    pub shade: Shade,
}

/// Work out the reroll for an ability and the original roll.
pub fn plan_reroll(ability: &Ability, original: &RollResult) -> RerollPlan {
    if ability.open {
        RerollPlan {
            dice: u32::from(original.traitors(ability.shade) > 0),
            explodes: false,
            shade: ability.shade,
        }
    } else {
        RerollPlan {
            dice: original.sixes(),
            explodes: true,
            shade: ability.shade,
        }
    }
}

/// The outcome of a fate reroll, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FateRerollReport {
    /// Roll name.
    pub roll_name: String,
    /// Original faces.
    pub original: RollResult,
    /// Faces of the reroll.
    pub rerolled: RollResult,
    /// Shade the dice were judged at.
    pub shade: Shade,
    /// Successes before the reroll.
    pub successes: u32,
    /// Successes added by the reroll.
    pub new_successes: u32,
    /// Obstacle.
    pub obstacle: u32,
    /// Whether the roll now passes.
    pub success: bool,
    /// Whether the reroll turned a failure into a success.
    pub flipped: bool,
    /// Fate points left afterwards.
    pub fate_remaining: u32,
    /// Advancement raised by a retroactive test.
    pub proposal: Option<AdvancementProposal>,
    /// When the reroll was resolved.
    pub at: DateTime<Utc>,
}

impl FateRerollReport {
    /// Total successes after the reroll.
    pub fn total(&self) -> u32 {
        self.successes.saturating_add(self.new_successes)
    }
}

impl fmt::Display for FateRerollReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fate reroll: {} -> {} ({} + {} vs Ob {}) {}",
            self.roll_name,
            self.original,
            self.rerolled,
            self.successes,
            self.new_successes,
            self.obstacle,
            if self.success { "success" } else { "failure" }
        )?;
        if self.flipped {
            write!(f, ", saved by fate")?;
        }
        Ok(())
    }
}

/// A resolved reroll: the write to persist and the report to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FateRerollResolution {
    /// Fate spent, pain flag, and any retroactive test.
    pub patch: Patch,
    /// The outcome.
    pub report: FateRerollReport,
}

/// Refuse a reroll the character cannot pay for.
pub fn ensure_fate(record: &CharacterRecord) -> MechResult<()> {
    if record.fate == 0 {
        warn!(character = %record.name, "fate reroll refused, no fate");
        return Err(MechError::InsufficientFate);
    }
    Ok(())
}

/// Spend a fate point: check the cost, roll, and resolve.
///
/// Nothing is rolled if the character has no fate left.
pub async fn fate_reroll<R: DiceRoller + ?Sized>(
    record: &CharacterRecord,
    snapshot: &DerivedSnapshot,
    request: &FateRerollRequest,
    roller: &mut R,
) -> MechResult<FateRerollResolution> {
    ensure_fate(record)?;
    let ability = record.ability(request.target.rolled())?;
    let plan = plan_reroll(ability, &RollResult::new(request.faces.clone()));
    let rerolled = roller.roll(plan.dice, plan.explodes, plan.shade).await?;
    resolve_reroll(record, snapshot, request, rerolled)
}

/// Resolve a reroll from already-rolled dice.
pub fn resolve_reroll(
    record: &CharacterRecord,
    snapshot: &DerivedSnapshot,
    request: &FateRerollRequest,
    rerolled: RollResult,
) -> MechResult<FateRerollResolution> {
    ensure_fate(record)?;
    let rolled = request.target.rolled();
    let shade = record.ability(rolled)?.shade;
    let roll_name = record.ability_name(rolled)?;

    let new_successes = rerolled.successes(shade);
    let success = request.successes.saturating_add(new_successes) >= request.obstacle;
    let flipped = request.successes < request.obstacle && success;

    let mut patch = Patch::new(record.revision);
    let counter = request.target.fate_counter();
    patch.push(Update::SetAbilityFate {
        target: counter,
        fate: record.ability(counter)?.fate.saturating_add(1),
    });
    patch.push(Update::SetFate(record.fate - 1));

    let mut proposal = None;
    if flipped {
        if let Some(action) = request.ptgs_action {
            patch.push(Update::SetPtgs {
                action,
                value: true,
            });
        }
        if let Some(credit) = retroactive_credit(record, request.target) {
            let outcome = credit_test(record, snapshot, credit, request.difficulty)?;
            if let Some(update) = outcome.update() {
                patch.push(update);
            }
            proposal = outcome.proposal().cloned();
        }
    }

    let report = FateRerollReport {
        roll_name,
        original: RollResult::new(request.faces.clone()),
        rerolled,
        shade,
        successes: request.successes,
        new_successes,
        obstacle: request.obstacle,
        success,
        flipped,
        fate_remaining: record.fate - 1,
        proposal,
        at: Utc::now(),
    };
    info!(character = %record.name, report = %report, "fate spent");
    Ok(FateRerollResolution { patch, report })
}

/// The stat that earns a test when this roll is saved, if any.
fn retroactive_credit(record: &CharacterRecord, target: RerollTarget) -> Option<StatKey> {
    if !record.kind.tracks_advancement() {
        return None;
    }
    match target {
        RerollTarget::Stat(key) => {
            let name = record.stats.display_name(key).to_lowercase();
            CREDITED_ON_FLIP.contains(&name.as_str()).then_some(key)
        }
        RerollTarget::Learning {
            root: Some(StatKey::Perception),
            ..
        } => Some(StatKey::Perception),
        RerollTarget::Skill(_) | RerollTarget::Learning { .. } => None,
    }
}

fn credit_test(
    record: &CharacterRecord,
    snapshot: &DerivedSnapshot,
    key: StatKey,
    difficulty: TestDifficulty,
) -> MechResult<TestOutcome> {
    let target = StatRef::Stat(key);
    let name = record.stats.display_name(key);
    let tracked = TrackedAbility {
        target,
        name,
        ability: record.stats.get(key),
        needed: snapshot.tests_needed(target),
        success_only: snapshot.is_success_only(name),
    };
    Ok(record_test(&tracked, difficulty, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use pyre_core::ItemKind;
    use pyre_core::item::SkillData;

    #[test]
    fn sixes_reroll_on_closed_rolls() {
        let plan = plan_reroll(&Ability::new(3), &RollResult::new(vec![6, 6, 2]));
        assert_eq!(
            plan,
            RerollPlan {
                dice: 2,
                explodes: true,
                shade: Shade::Black
            }
        );
    }

    #[test]
    fn one_traitor_rerolls_on_open_rolls() {
        let ability = Ability::new(2).with_shade(Shade::White).open_ended();
        let plan = plan_reroll(&ability, &RollResult::new(vec![1, 2]));
        assert_eq!(plan.dice, 1);
        assert!(!plan.explodes);

        let plan = plan_reroll(&ability, &RollResult::new(vec![2, 6]));
        assert_eq!(plan.dice, 0);
    }

    fn character() -> CharacterRecord {
        let mut record = CharacterRecord::new("Mira");
        record.fate = 2;
        record.stats.perception = Ability::new(4);
        record.stats.steel = Ability::new(4);
        record
    }

    fn request(target: RerollTarget, successes: u32, obstacle: u32) -> FateRerollRequest {
        FateRerollRequest {
            target,
            faces: vec![6, 3, 2, 1],
            successes,
            obstacle,
            difficulty: TestDifficulty::Difficult,
            ptgs_action: None,
        }
    }

    #[test]
    fn no_fate_is_refused() {
        let mut record = character();
        record.fate = 0;
        let snap = derive(&record);
        let err = resolve_reroll(
            &record,
            &snap,
            &request(RerollTarget::Stat(StatKey::Steel), 1, 2),
            RollResult::new(vec![5]),
        )
        .unwrap_err();
        assert!(matches!(err, MechError::InsufficientFate));
    }

    #[test]
    fn fate_is_spent_without_flip() {
        let record = character();
        let snap = derive(&record);
        let res = resolve_reroll(
            &record,
            &snap,
            &request(RerollTarget::Stat(StatKey::Steel), 1, 3),
            RollResult::new(vec![2]),
        )
        .unwrap();
        assert!(!res.report.success);
        assert!(!res.report.flipped);
        assert_eq!(res.report.fate_remaining, 1);
        assert_eq!(
            res.patch.updates,
            vec![
                Update::SetAbilityFate {
                    target: StatRef::Stat(StatKey::Steel),
                    fate: 1
                },
                Update::SetFate(1),
            ]
        );
    }

    #[test]
    fn flipped_perception_logs_a_test() {
        let record = character();
        let snap = derive(&record);
        let mut req = request(RerollTarget::Stat(StatKey::Perception), 1, 2);
        req.ptgs_action = Some(PtgsAction::Shrugging);
        let res = resolve_reroll(&record, &snap, &req, RollResult::new(vec![5])).unwrap();
        assert!(res.report.flipped);
        assert_eq!(res.report.total(), 2);
        assert!(res.patch.updates.contains(&Update::SetPtgs {
            action: PtgsAction::Shrugging,
            value: true
        }));
        assert!(res.patch.updates.contains(&Update::SetTests {
            target: StatRef::Stat(StatKey::Perception),
            routine: 0,
            difficult: 1,
            challenging: 0
        }));
        assert!(res.report.to_string().ends_with("saved by fate"));
    }

    #[test]
    fn flipped_steel_logs_nothing() {
        let record = character();
        let snap = derive(&record);
        let res = resolve_reroll(
            &record,
            &snap,
            &request(RerollTarget::Stat(StatKey::Steel), 1, 2),
            RollResult::new(vec![6, 4]),
        )
        .unwrap();
        assert!(res.report.flipped);
        assert_eq!(res.patch.updates.len(), 2);
    }

    #[test]
    fn roll_already_passing_is_not_a_flip() {
        let record = character();
        let snap = derive(&record);
        let res = resolve_reroll(
            &record,
            &snap,
            &request(RerollTarget::Stat(StatKey::Perception), 2, 2),
            RollResult::new(vec![5]),
        )
        .unwrap();
        assert!(res.report.success);
        assert!(!res.report.flipped);
        assert_eq!(res.patch.updates.len(), 2);
    }

    #[test]
    fn custom_faith_attribute_is_credited() {
        let mut record = character();
        record.stats.custom1_name = "Faith".into();
        record.stats.custom1 = Ability::new(3);
        let snap = derive(&record);
        let res = resolve_reroll(
            &record,
            &snap,
            &request(RerollTarget::Stat(StatKey::Custom1), 0, 1),
            RollResult::new(vec![4]),
        )
        .unwrap();
        assert!(res.patch.updates.iter().any(|u| matches!(
            u,
            Update::SetTests {
                target: StatRef::Stat(StatKey::Custom1),
                difficult: 1,
                ..
            }
        )));
    }

    #[test]
    fn learning_roll_counts_fate_on_root() {
        let mut record = character();
        let skill = pyre_core::Item::new(
            "Tracking",
            ItemKind::Skill(SkillData {
                ability: Ability::new(2),
                learning: true,
                ..SkillData::default()
            }),
        );
        let id = skill.id;
        record.items.push(skill);
        let snap = derive(&record);
        let target = RerollTarget::Learning {
            skill: id,
            root: Some(StatKey::Perception),
        };
        let res = resolve_reroll(&record, &snap, &request(target, 0, 1), RollResult::new(vec![4]))
            .unwrap();
        assert_eq!(
            res.patch.updates[0],
            Update::SetAbilityFate {
                target: StatRef::Stat(StatKey::Perception),
                fate: 1
            }
        );
        assert!(res.patch.updates.iter().any(|u| matches!(
            u,
            Update::SetTests {
                target: StatRef::Stat(StatKey::Perception),
                ..
            }
        )));

        let to_skill = RerollTarget::Learning {
            skill: id,
            root: None,
        };
        assert_eq!(to_skill.fate_counter(), StatRef::Skill(id));
    }

    #[test]
    fn npcs_spend_fate_without_tests() {
        let mut record = character();
        record.kind = pyre_core::ActorKind::Npc;
        let snap = derive(&record);
        let res = resolve_reroll(
            &record,
            &snap,
            &request(RerollTarget::Stat(StatKey::Perception), 0, 1),
            RollResult::new(vec![5]),
        )
        .unwrap();
        assert!(res.report.flipped);
        assert_eq!(res.patch.updates.len(), 2);
    }
}
