//! The recomputation pass.
//!
//! [`derive`] is a pure function from a persisted [`CharacterRecord`] to a
//! [`DerivedSnapshot`]. It is run on load and after every write; nothing
//! it produces is carried from one pass to the next.
//!
//! Order of the pass:
//!
//! 1. Settings (defaults if the record has none).
//! 2. Fresh, empty modifier and call-on registries.
//! 3. Mortal wound, wound thresholds, and the band of each wound slot.
//! 4. Pain tally over the freshly banded grid.
//! 5. Armor encumbrance into the modifier registry.
//! 6. Test targets for every stat and skill.
//! 7. Sustained-spell limits, reflexes, hesitation.
//! 8. Item classification, trait modifiers, and call-ons.
//!
//! Mortal wound depends only on Power and Forte, so banding ahead of the
//! pain tally lets the tally read bands from the same pass.

pub mod inventory;
pub mod stats;

pub use inventory::{DiceEntry, Inventory, SkillEntry};
pub use stats::{ShadedExponent, SustainedLimits};

use std::collections::BTreeMap;

use pyre_core::{
    CharacterRecord, ItemId, Settings, StatKey, StatRef, Update, WOUND_SLOTS, WoundBand,
};
use serde::Serialize;
use tracing::debug;

use crate::advancement::{AdvancementPolicy, TestsNeeded, TrackingState};
use crate::encumbrance::EncumbrancePenalties;
use crate::error::MechResult;
use crate::modifier::{CallOnRegistry, RollModifierRegistry};
use crate::pain::PainTally;
use crate::threshold::ThresholdSet;

/// Every derived quantity of one character, from one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedSnapshot {
    /// Settings in effect.
    pub settings: Settings,
    /// Mortal wound exponent and shade.
    pub mortal_wound: ShadedExponent,
    /// Wound cut points.
    pub thresholds: ThresholdSet,
    /// Band of each wound slot.
    pub wound_bands: [WoundBand; WOUND_SLOTS],
    /// Wound dice and superficial obstacle.
    pub pain: PainTally,
    /// Armor penalties.
    pub encumbrance: EncumbrancePenalties,
    /// Roll modifiers by roll name.
    pub modifiers: RollModifierRegistry,
    /// Call-on traits by roll name.
    pub call_ons: CallOnRegistry,
    /// Test targets per stat.
    pub stat_tests: BTreeMap<StatKey, TestsNeeded>,
    /// Test targets per skill.
    pub skill_tests: BTreeMap<ItemId, TestsNeeded>,
    /// Sustained-spell limits.
    pub sustained: SustainedLimits,
    /// Reflexes exponent and shade.
    pub reflexes: ShadedExponent,
    /// Hesitation.
    pub hesitation: i32,
    /// Roll names for which failed tests are not logged.
    pub success_only_rolls: Vec<String>,
    /// Owned items sorted for roll dialogs.
    pub inventory: Inventory,
}

impl DerivedSnapshot {
    /// Current wound dice.
    pub fn wound_dice(&self) -> u32 {
        self.pain.wound_dice
    }

    /// Test targets for an ability. Unknown skills get the skill table at
    /// exponent zero.
    pub fn tests_needed(&self, target: StatRef) -> TestsNeeded {
        match target {
            StatRef::Stat(key) => self.stat_tests.get(&key).copied(),
            StatRef::Skill(id) => self.skill_tests.get(&id).copied(),
        }
        .unwrap_or_else(|| AdvancementPolicy::for_skill().tests_needed(0, 0))
    }

    /// Whether failed tests of this roll are ignored.
    pub fn is_success_only(&self, roll_name: &str) -> bool {
        let lower = roll_name.trim().to_lowercase();
        self.success_only_rolls.iter().any(|r| *r == lower)
    }

    /// Where an ability stands on its way to advancement.
    pub fn tracking_state(
        &self,
        record: &CharacterRecord,
        target: StatRef,
    ) -> MechResult<TrackingState> {
        let ability = record.ability(target)?;
        Ok(TrackingState::of(ability, &self.tests_needed(target)))
    }

    /// A write storing this pass's wound bands, if the record's differ.
    pub fn band_update(&self, record: &CharacterRecord) -> Option<Update> {
        (record.wounds.bands() != self.wound_bands)
            .then_some(Update::SetWoundBands(self.wound_bands))
    }
}

/// Recompute every derived quantity of a character.
pub fn derive(record: &CharacterRecord) -> DerivedSnapshot {
    let settings = record.settings.clone().unwrap_or_default();
    let mut modifiers = RollModifierRegistry::new();
    let mut call_ons = CallOnRegistry::new();

    let mortal_wound = stats::mortal_wound(&record.stats, settings.round_up_mortal_wound);
    let forte = i32::try_from(record.stats.forte.exponent).unwrap_or(i32::MAX);
    let thresholds = ThresholdSet::compute(mortal_wound.exponent, forte);
    let wound_bands = thresholds.bands();

    let pain = PainTally::compute(
        &record.wounds,
        &wound_bands,
        settings.ignore_superficial_wounds,
    );
    let wound_dice = pain.wound_dice;

    let encumbrance = EncumbrancePenalties::resolve(&record.items, settings.armor_trained);
    encumbrance.emit(&mut modifiers);

    let stat_tests = StatKey::ALL
        .into_iter()
        .map(|key| {
            let exponent = record.stats.get(key).exponent;
            (key, AdvancementPolicy::for_stat(key).tests_needed(exponent, wound_dice))
        })
        .collect();
    let skill_tests = record
        .items
        .iter()
        .filter_map(|item| item.as_skill().map(|s| (item.id, s.ability.exponent)))
        .map(|(id, exponent)| {
            (id, AdvancementPolicy::for_skill().tests_needed(exponent, wound_dice))
        })
        .collect();

    let sustained = stats::sustained(&record.stats, wound_dice, record.forte_tax);
    let reflexes = stats::reflexes(&record.stats, wound_dice, settings.round_up_reflexes);
    let hesitation = stats::hesitation(&record.stats);
    let success_only_rolls = settings.success_only_rolls();

    let inventory = Inventory::classify(&record.items, &mut modifiers, &mut call_ons);

    debug!(
        character = %record.name,
        revision = record.revision,
        wound_dice,
        thresholds = %thresholds,
        modifiers = modifiers.len(),
        "derived snapshot"
    );

    DerivedSnapshot {
        settings,
        mortal_wound,
        thresholds,
        wound_bands,
        pain,
        encumbrance,
        modifiers,
        call_ons,
        stat_tests,
        skill_tests,
        sustained,
        reflexes,
        hesitation,
        success_only_rolls,
        inventory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyre_core::item::{ArmorData, SkillData, UntrainedPenalty};
    use pyre_core::{Ability, Item, ItemKind, Shade};

    fn kael() -> CharacterRecord {
        let mut record = CharacterRecord::new("Kael");
        record.stats.will = Ability::new(4);
        record.stats.power = Ability::new(4);
        record.stats.forte = Ability::new(6);
        record.stats.perception = Ability::new(4);
        record.stats.agility = Ability::new(4);
        record.stats.speed = Ability::new(4);
        record.stats.steel = Ability::new(5);
        record.stats.resources = Ability::new(3);
        record
    }

    #[test]
    fn missing_settings_use_defaults() {
        let record = kael();
        assert!(record.settings.is_none());
        let snap = derive(&record);
        assert_eq!(snap.settings, Settings::default());
        assert!(snap.is_success_only("Perception"));
        assert!(!snap.is_success_only("Steel"));
    }

    #[test]
    fn existing_settings_are_kept() {
        let mut record = kael();
        record.settings = Some(Settings::default().with_only_successes("Steel"));
        let snap = derive(&record);
        assert!(snap.is_success_only("steel"));
        assert!(!snap.is_success_only("perception"));
    }

    #[test]
    fn unwounded_character() {
        let snap = derive(&kael());
        // (4 + 6) / 2 + 6
        assert_eq!(snap.mortal_wound.exponent, 11);
        assert_eq!(
            snap.thresholds,
            ThresholdSet {
                su: 4,
                li: 7,
                mi: 8,
                se: 9,
                tr: 10,
                mo: 11
            }
        );
        assert_eq!(snap.wound_bands[0], WoundBand::Bruise);
        assert_eq!(snap.wound_bands[15], WoundBand::Mortal);
        assert_eq!(snap.wound_dice(), 0);
        assert_eq!(snap.hesitation, 6);
        assert_eq!(snap.reflexes.exponent, 4);
        assert_eq!(snap.sustained.max_sustained, 3);
        assert!(snap.modifiers.is_empty());
    }

    #[test]
    fn huge_numbers_from_the_record_still_derive() {
        let record = CharacterRecord::from_json(
            r#"{
                "name": "Colossus",
                "forte_tax": "4294967295",
                "stats": {
                    "power": {"exp": "3000000000"},
                    "forte": {"exp": "3000000000"},
                    "perception": {"exp": 4294967295},
                    "will": {"exp": "4294967295"}
                }
            }"#,
        )
        .unwrap();
        let snap = derive(&record);
        assert_eq!(snap.mortal_wound.exponent, i32::MAX);
        assert_eq!(snap.thresholds.mo, i32::MAX);
        assert!(snap.thresholds.tr < snap.thresholds.mo);
        assert_eq!(snap.wound_bands[15], WoundBand::Bruise);
    }

    #[test]
    fn wounds_shift_targets_and_reflexes() {
        let mut record = kael();
        // Slot 7 is Light for forte 6 / mortal wound 11.
        record.wounds.set(7, 2);
        let snap = derive(&record);
        assert_eq!(snap.wound_bands[5], WoundBand::Superficial);
        assert_eq!(snap.wound_bands[6], WoundBand::Light);
        assert_eq!(snap.wound_dice(), 2);
        assert_eq!(snap.reflexes.exponent, 2);
        assert_eq!(
            snap.tests_needed(StatRef::Stat(StatKey::Steel)),
            TestsNeeded::for_exponent(3, true)
        );
        assert_eq!(
            snap.tests_needed(StatRef::Stat(StatKey::Resources)),
            TestsNeeded::for_exponent(2, true)
        );
    }

    #[test]
    fn skills_get_targets() {
        let mut record = kael();
        let sword = Item::new(
            "Sword",
            ItemKind::Skill(SkillData {
                ability: Ability::new(4).with_shade(Shade::Gray),
                ..SkillData::default()
            }),
        );
        let id = sword.id;
        record.items.push(sword);
        let snap = derive(&record);
        assert_eq!(
            snap.tests_needed(StatRef::Skill(id)),
            TestsNeeded {
                routine: 4,
                difficult: 2,
                challenging: 1
            }
        );
        assert_eq!(snap.inventory.forks[0].id, id);
    }

    #[test]
    fn armor_lands_in_registry() {
        let mut record = kael();
        record.items.push(Item::new(
            "Plate Harness",
            ItemKind::Armor(ArmorData {
                equipped: true,
                has_torso: true,
                health_forte_penalty: 2,
                untrained_penalty: UntrainedPenalty::Plate,
                ..ArmorData::default()
            }),
        ));
        let snap = derive(&record);
        assert_eq!(snap.encumbrance.health_forte, 2);
        assert_eq!(snap.modifiers.totals("health", true), (0, 4));
        assert_eq!(snap.modifiers.totals("steel", true), (0, 2));
        assert_eq!(snap.modifiers.totals("steel", false), (0, 0));
    }

    #[test]
    fn band_update_only_when_changed() {
        let mut record = kael();
        let snap = derive(&record);
        let update = snap.band_update(&record).expect("bands differ from default");
        record.apply(&pyre_core::Patch::new(0).with(update)).unwrap();
        assert!(derive(&record).band_update(&record).is_none());
    }

    #[test]
    fn tracking_state_from_snapshot() {
        let mut record = kael();
        record.stats.steel = Ability::new(5).with_tests(0, 3, 0);
        let snap = derive(&record);
        assert_eq!(
            snap.tracking_state(&record, StatRef::Stat(StatKey::Steel)).unwrap(),
            TrackingState::Eligible
        );
        assert_eq!(
            snap.tracking_state(&record, StatRef::Stat(StatKey::Will)).unwrap(),
            TrackingState::Tracking
        );
    }
}
