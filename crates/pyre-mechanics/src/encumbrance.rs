//! Clumsy weight from equipped armor.
//!
//! Penalties combine per body zone by taking the heaviest piece, never by
//! adding pieces together. Untrained wear is judged on the worst piece.

use pyre_core::item::{ArmorData, UntrainedPenalty};
use pyre_core::Item;
use serde::{Deserialize, Serialize};

use crate::modifier::{ALL_ROLLS, RollModifier, RollModifierRegistry};

const CLUMSY_WEIGHT: &str = "Clumsy Weight";
const UNTRAINED_ARMOR: &str = "Untrained Armor";

/// Roll names hit by the arm zone's throwing and shooting penalty.
const RANGED_ROLLS: [&str; 4] = ["shooting", "bow", "crossbow", "firearms"];

/// Aggregated clumsy-weight penalties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncumbrancePenalties {
    /// Helm: obstacle to Perception and Observation.
    pub helmet_ob: u32,
    /// Torso: obstacle to Health and Forte.
    pub health_forte: u32,
    /// Torso: obstacle to Stealthy.
    pub stealthy: u32,
    /// Torso: obstacle to Swimming.
    pub swimming: u32,
    /// Arms: obstacle to Agility.
    pub agility: u32,
    /// Arms: obstacle to throwing and shooting.
    pub throwing_shooting: u32,
    /// Legs: dice removed from Speed.
    pub speed_dice: u32,
    /// Legs: obstacle to Speed.
    pub speed_ob: u32,
    /// Legs: obstacle to Climbing.
    pub climbing: u32,
    /// Worst untrained severity seen.
    pub untrained: UntrainedPenalty,
}

impl EncumbrancePenalties {
    /// Aggregate penalties over every equipped armor item.
    pub fn resolve<'a, I>(items: I, armor_trained: bool) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut penalties = Self::default();
        for armor in items
            .into_iter()
            .filter_map(Item::as_armor)
            .filter(|a| a.equipped)
        {
            penalties.absorb(armor, armor_trained);
        }
        penalties
    }

    fn absorb(&mut self, armor: &ArmorData, armor_trained: bool) {
        if armor.has_helm {
            self.helmet_ob = self.helmet_ob.max(armor.perception_observation_penalty);
        }
        if armor.has_torso {
            self.health_forte = self.health_forte.max(armor.health_forte_penalty);
            self.stealthy = self.stealthy.max(armor.stealthy_penalty);
            self.swimming = self.swimming.max(armor.swimming_penalty);
        }
        if armor.covers_arms() {
            self.agility = self.agility.max(armor.agility_penalty);
            self.throwing_shooting = self.throwing_shooting.max(armor.throwing_shooting_penalty);
        }
        if armor.covers_legs() {
            self.speed_dice = self.speed_dice.max(armor.speed_dice_penalty);
            self.speed_ob = self.speed_ob.max(armor.speed_ob_penalty);
            self.climbing = self.climbing.max(armor.climbing_penalty);
        }
        if !armor_trained && armor.covers_any_zone() {
            self.untrained = self.untrained.max(armor.untrained_penalty);
        }
    }

    /// Obstacle added to every roll for untrained heavy armor or plate.
    pub fn untrained_all(&self) -> u32 {
        match self.untrained {
            UntrainedPenalty::Plate => 2,
            UntrainedPenalty::Heavy => 1,
            UntrainedPenalty::Light | UntrainedPenalty::None => 0,
        }
    }

    /// Obstacle added to Health and Forte for untrained light armor. Any
    /// heavier piece replaces it with the all-rolls penalty.
    pub fn untrained_health(&self) -> u32 {
        u32::from(self.untrained == UntrainedPenalty::Light)
    }

    /// Emit every non-zero penalty into the registry as optional modifiers.
    pub fn emit(&self, registry: &mut RollModifierRegistry) {
        let ob = |amount: u32, label: &str| {
            RollModifier::obstacle(clamped(amount), label).optional()
        };
        registry.add("climbing", ob(self.climbing, CLUMSY_WEIGHT), true);
        registry.add("perception", ob(self.helmet_ob, CLUMSY_WEIGHT), true);
        registry.add("observation", ob(self.helmet_ob, CLUMSY_WEIGHT), true);
        for roll in RANGED_ROLLS {
            registry.add(roll, ob(self.throwing_shooting, CLUMSY_WEIGHT), true);
        }
        registry.add("agility", ob(self.agility, CLUMSY_WEIGHT), true);
        registry.add(
            "speed",
            RollModifier::dice(-clamped(self.speed_dice), CLUMSY_WEIGHT).optional(),
            true,
        );
        registry.add("speed", ob(self.speed_ob, CLUMSY_WEIGHT), true);
        registry.add("health", ob(self.health_forte, CLUMSY_WEIGHT), true);
        registry.add("forte", ob(self.health_forte, CLUMSY_WEIGHT), true);
        registry.add("stealthy", ob(self.stealthy, CLUMSY_WEIGHT), true);
        registry.add("swimming", ob(self.swimming, CLUMSY_WEIGHT), true);

        registry.add(ALL_ROLLS, ob(self.untrained_all(), UNTRAINED_ARMOR), true);
        registry.add("health", ob(self.untrained_health(), UNTRAINED_ARMOR), true);
        registry.add("forte", ob(self.untrained_health(), UNTRAINED_ARMOR), true);
    }
}

fn clamped(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyre_core::ItemKind;

    fn armor(name: &str, data: ArmorData) -> Item {
        Item::new(
            name,
            ItemKind::Armor(ArmorData {
                equipped: true,
                ..data
            }),
        )
    }

    #[test]
    fn torso_penalties_take_the_max() {
        let items = vec![
            armor(
                "Gambeson",
                ArmorData {
                    has_torso: true,
                    health_forte_penalty: 2,
                    ..ArmorData::default()
                },
            ),
            armor(
                "Breastplate",
                ArmorData {
                    has_torso: true,
                    health_forte_penalty: 3,
                    ..ArmorData::default()
                },
            ),
        ];
        let p = EncumbrancePenalties::resolve(&items, true);
        assert_eq!(p.health_forte, 3);
    }

    #[test]
    fn unequipped_items_are_ignored() {
        let mut item = armor(
            "Greaves",
            ArmorData {
                has_left_leg: true,
                climbing_penalty: 2,
                ..ArmorData::default()
            },
        );
        if let ItemKind::Armor(a) = &mut item.kind {
            a.equipped = false;
        }
        let p = EncumbrancePenalties::resolve([&item], true);
        assert_eq!(p, EncumbrancePenalties::default());
    }

    #[test]
    fn zones_route_to_their_fields() {
        let items = vec![
            armor(
                "Helm",
                ArmorData {
                    has_helm: true,
                    perception_observation_penalty: 1,
                    ..ArmorData::default()
                },
            ),
            armor(
                "Vambraces",
                ArmorData {
                    has_right_arm: true,
                    agility_penalty: 1,
                    throwing_shooting_penalty: 2,
                    health_forte_penalty: 5,
                    ..ArmorData::default()
                },
            ),
        ];
        let p = EncumbrancePenalties::resolve(&items, true);
        assert_eq!(p.helmet_ob, 1);
        assert_eq!(p.agility, 1);
        assert_eq!(p.throwing_shooting, 2);
        assert_eq!(p.health_forte, 0);
    }

    #[test]
    fn untrained_plate_beats_light() {
        let items = vec![
            armor(
                "Leather Cap",
                ArmorData {
                    has_helm: true,
                    untrained_penalty: UntrainedPenalty::Light,
                    ..ArmorData::default()
                },
            ),
            armor(
                "Plate",
                ArmorData {
                    has_torso: true,
                    untrained_penalty: UntrainedPenalty::Plate,
                    ..ArmorData::default()
                },
            ),
        ];
        let p = EncumbrancePenalties::resolve(&items, false);
        assert_eq!(p.untrained_all(), 2);
        assert_eq!(p.untrained_health(), 0);
    }

    #[test]
    fn untrained_light_only_hits_health_and_forte() {
        let items = vec![armor(
            "Leather",
            ArmorData {
                has_torso: true,
                untrained_penalty: UntrainedPenalty::Light,
                ..ArmorData::default()
            },
        )];
        let p = EncumbrancePenalties::resolve(&items, false);
        assert_eq!(p.untrained_all(), 0);
        assert_eq!(p.untrained_health(), 1);

        let mut reg = RollModifierRegistry::new();
        p.emit(&mut reg);
        assert_eq!(reg.get("health").len(), 1);
        assert_eq!(reg.get("forte")[0].label, UNTRAINED_ARMOR);
        assert!(reg.get("sword").is_empty());
    }

    #[test]
    fn trained_wearers_and_shields_skip_untrained() {
        let shield = armor(
            "Shield",
            ArmorData {
                untrained_penalty: UntrainedPenalty::Heavy,
                ..ArmorData::default()
            },
        );
        assert_eq!(
            EncumbrancePenalties::resolve([&shield], false).untrained,
            UntrainedPenalty::None
        );
        let plate = armor(
            "Plate",
            ArmorData {
                has_torso: true,
                untrained_penalty: UntrainedPenalty::Plate,
                ..ArmorData::default()
            },
        );
        assert_eq!(
            EncumbrancePenalties::resolve([&plate], true).untrained,
            UntrainedPenalty::None
        );
    }

    #[test]
    fn emit_skips_zero_penalties() {
        let mut reg = RollModifierRegistry::new();
        EncumbrancePenalties::default().emit(&mut reg);
        assert!(reg.is_empty());
    }

    #[test]
    fn huge_penalties_clamp_to_i32() {
        let p = EncumbrancePenalties {
            speed_dice: u32::MAX,
            climbing: u32::MAX,
            ..EncumbrancePenalties::default()
        };
        let mut reg = RollModifierRegistry::new();
        p.emit(&mut reg);
        assert_eq!(reg.get("speed")[0].dice, Some(-i32::MAX));
        assert_eq!(reg.get("climbing")[0].obstacle, Some(i32::MAX));
        assert_eq!(reg.totals("climbing", true), (0, i32::MAX));
    }

    #[test]
    fn emit_routes_every_bucket() {
        let p = EncumbrancePenalties {
            helmet_ob: 1,
            health_forte: 1,
            stealthy: 1,
            swimming: 1,
            agility: 1,
            throwing_shooting: 1,
            speed_dice: 1,
            speed_ob: 1,
            climbing: 1,
            untrained: UntrainedPenalty::Heavy,
        };
        let mut reg = RollModifierRegistry::new();
        p.emit(&mut reg);
        assert_eq!(reg.get("all").len(), 1);
        // speed gets its dice and obstacle entries plus the global one
        let speed = reg.get("speed");
        assert_eq!(speed.len(), 3);
        assert_eq!(speed[0].dice, Some(-1));
        assert!(speed.iter().all(|m| m.optional));
        assert_eq!(reg.get("crossbow").len(), 2);
        assert_eq!(reg.get("observation").len(), 2);
        assert_eq!(reg.get("swimming").len(), 2);
    }
}
