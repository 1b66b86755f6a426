//! Classification of owned items into the lists a roll dialog offers.

use pyre_core::item::{SkillType, TraitType};
use pyre_core::{Item, ItemId, ItemKind};
use serde::{Deserialize, Serialize};

use crate::modifier::{CallOnRegistry, RollModifier, RollModifierRegistry};

/// Forks at or above this exponent add two dice instead of one.
const DOUBLE_FORK_AT: u32 = 7;

/// A skill, as listed on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    /// Item id.
    pub id: ItemId,
    /// Skill name.
    pub name: String,
    /// Current exponent.
    pub exponent: u32,
}

/// A named dice bonus or penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceEntry {
    /// Source name.
    pub name: String,
    /// Dice.
    pub amount: u32,
}

/// Owned items sorted into roll-relevant groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Skills that can fork into related rolls.
    pub forks: Vec<SkillEntry>,
    /// Skills that fork only as wild forks.
    pub wild_forks: Vec<SkillEntry>,
    /// Martial skills, training skills excluded.
    pub martial_skills: Vec<SkillEntry>,
    /// Sorcerous skills.
    pub sorcerous_skills: Vec<SkillEntry>,
    /// Circles bonus dice from reputations and affiliations.
    pub circles_bonus: Vec<DiceEntry>,
    /// Circles penalty dice from infamous reputations.
    pub circles_malus: Vec<DiceEntry>,
    /// Toolkit possessions by name.
    pub toolkits: Vec<String>,
}

impl Inventory {
    /// Sort every item into its groups, feeding die and call-on traits
    /// into the registries.
    pub fn classify(
        items: &[Item],
        modifiers: &mut RollModifierRegistry,
        call_ons: &mut CallOnRegistry,
    ) -> Self {
        let mut inv = Self::default();
        for item in items {
            match &item.kind {
                ItemKind::Skill(skill) => {
                    let entry = SkillEntry {
                        id: item.id,
                        name: item.name.clone(),
                        exponent: skill.ability.exponent,
                    };
                    if !skill.learning && !skill.training {
                        if skill.wild_fork {
                            inv.wild_forks.push(entry.clone());
                        } else {
                            inv.forks.push(entry.clone());
                        }
                    }
                    match skill.skill_type {
                        SkillType::Martial if !skill.training => inv.martial_skills.push(entry),
                        SkillType::Sorcerous => inv.sorcerous_skills.push(entry),
                        _ => {}
                    }
                }
                ItemKind::Reputation(rep) => {
                    let entry = DiceEntry {
                        name: item.name.clone(),
                        amount: rep.dice,
                    };
                    if rep.infamous {
                        inv.circles_malus.push(entry);
                    } else {
                        inv.circles_bonus.push(entry);
                    }
                }
                ItemKind::Affiliation(aff) => inv.circles_bonus.push(DiceEntry {
                    name: item.name.clone(),
                    amount: aff.dice,
                }),
                ItemKind::Trait(t) => match t.trait_type {
                    TraitType::Die => {
                        if t.has_die_modifier {
                            for target in targets(&t.die_modifier_target) {
                                modifiers.add(
                                    target,
                                    RollModifier::dice(t.die_modifier, &item.name).optional(),
                                    false,
                                );
                            }
                        }
                        if t.has_ob_modifier {
                            for target in targets(&t.ob_modifier_target) {
                                modifiers.add(
                                    target,
                                    RollModifier::obstacle(t.ob_modifier, &item.name).optional(),
                                    false,
                                );
                            }
                        }
                    }
                    TraitType::CallOn => call_ons.add(&t.callon_target, &item.name),
                    TraitType::Character => {}
                },
                ItemKind::Possession(p) if p.is_toolkit => inv.toolkits.push(item.name.clone()),
                _ => {}
            }
        }
        inv
    }

    /// Forks available to a roll.
    pub fn fork_options(&self, roll_name: &str, wound_dice: u32) -> Vec<DiceEntry> {
        options(&self.forks, roll_name, wound_dice)
    }

    /// Wild forks available to a roll.
    pub fn wild_fork_options(&self, roll_name: &str, wound_dice: u32) -> Vec<DiceEntry> {
        options(&self.wild_forks, roll_name, wound_dice)
    }

    /// Net circles dice from reputations and affiliations.
    pub fn circles_net(&self) -> i64 {
        let bonus: i64 = self.circles_bonus.iter().map(|e| i64::from(e.amount)).sum();
        let malus: i64 = self.circles_malus.iter().map(|e| i64::from(e.amount)).sum();
        bonus - malus
    }
}

fn targets(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

// A skill cannot fork into its own roll, and wounds at or above its
// exponent take it off the table.
fn options(skills: &[SkillEntry], roll_name: &str, wound_dice: u32) -> Vec<DiceEntry> {
    skills
        .iter()
        .filter(|s| !s.name.trim().eq_ignore_ascii_case(roll_name.trim()))
        .filter(|s| s.exponent > wound_dice)
        .map(|s| DiceEntry {
            name: s.name.clone(),
            amount: if s.exponent >= DOUBLE_FORK_AT { 2 } else { 1 },
        })
        .collect()
}
