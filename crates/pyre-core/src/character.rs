use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ability::{Ability, StatKey, StatRef, Stats};
use crate::error::{CoreError, CoreResult};
use crate::id::{CharacterId, ItemId};
use crate::item::{Item, ItemKind};
use crate::lenient;
use crate::patch::{Patch, PtgsAction, Update};
use crate::settings::Settings;
use crate::wound::Wounds;

/// What kind of actor a record describes. Selects, once, which behaviour
/// set applies: only player characters log tests and advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// A player character.
    #[default]
    Character,
    /// A non-player character.
    Npc,
}

impl ActorKind {
    /// Whether this kind logs advancement tests.
    pub fn tracks_advancement(self) -> bool {
        matches!(self, Self::Character)
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character => write!(f, "character"),
            Self::Npc => write!(f, "npc"),
        }
    }
}

/// The persisted state of one character.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterRecord {
    /// Stable identifier.
    pub id: CharacterId,
    /// Character name.
    pub name: String,
    /// Actor kind.
    pub kind: ActorKind,
    /// Bumped on every applied patch.
    pub revision: u64,
    /// Stats and attributes.
    pub stats: Stats,
    /// Wound grid and pain flags.
    #[serde(rename = "ptgs")]
    pub wounds: Wounds,
    /// Settings block; absent on records created before settings existed.
    pub settings: Option<Settings>,
    /// Available fate points.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub fate: u32,
    /// Available persona points.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub persona: u32,
    /// Available deeds points.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub deeds: u32,
    /// Obstacle tax on Forte from sustained spells.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub forte_tax: u32,
    /// Tax on Will.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub will_tax: u32,
    /// Tax on Resources.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub resources_tax: u32,
    /// Cash-on-hand dice.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub funds: u32,
    /// Owned items in sheet order.
    pub items: Vec<Item>,
}

impl CharacterRecord {
    /// Create an empty player character.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Decode a record from JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the record as pretty JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up an owned item.
    pub fn item(&self, id: ItemId) -> CoreResult<&Item> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or(CoreError::ItemNotFound(id))
    }

    /// Find an owned item by name, case-insensitive.
    pub fn find_item(&self, name: &str) -> Option<&Item> {
        let lower = name.trim().to_lowercase();
        self.items.iter().find(|i| i.name.to_lowercase() == lower)
    }

    /// Borrow an addressable ability.
    pub fn ability(&self, target: StatRef) -> CoreResult<&Ability> {
        match target {
            StatRef::Stat(key) => Ok(self.stats.get(key)),
            StatRef::Skill(id) => match &self.item(id)?.kind {
                ItemKind::Skill(skill) => Ok(&skill.ability),
                _ => Err(CoreError::WrongItemKind {
                    id,
                    expected: "skill",
                }),
            },
        }
    }

    /// Mutably borrow an addressable ability.
    pub fn ability_mut(&mut self, target: StatRef) -> CoreResult<&mut Ability> {
        match target {
            StatRef::Stat(key) => Ok(self.stats.get_mut(key)),
            StatRef::Skill(id) => {
                let item = self
                    .items
                    .iter_mut()
                    .find(|i| i.id == id)
                    .ok_or(CoreError::ItemNotFound(id))?;
                match &mut item.kind {
                    ItemKind::Skill(skill) => Ok(&mut skill.ability),
                    _ => Err(CoreError::WrongItemKind {
                        id,
                        expected: "skill",
                    }),
                }
            }
        }
    }

    /// The name rolls of an ability go by.
    pub fn ability_name(&self, target: StatRef) -> CoreResult<String> {
        match target {
            StatRef::Stat(key) => Ok(self.stats.display_name(key).to_string()),
            StatRef::Skill(id) => Ok(self.item(id)?.name.clone()),
        }
    }

    /// Resolve a roll name to an addressable ability: stats first, then skills.
    pub fn resolve_name(&self, name: &str) -> Option<StatRef> {
        if let Some(key) = self.stats.find_by_name(name) {
            return Some(StatRef::Stat(key));
        }
        self.find_item(name)
            .filter(|i| i.as_skill().is_some())
            .map(|i| StatRef::Skill(i.id))
    }

    /// Apply a patch atomically.
    ///
    /// The patch must have been built against the current revision. Every
    /// update is applied to a copy first; the record only changes if all of
    /// them succeed.
    pub fn apply(&mut self, patch: &Patch) -> CoreResult<()> {
        if patch.base_revision != self.revision {
            return Err(CoreError::StaleRevision {
                expected: patch.base_revision,
                actual: self.revision,
            });
        }
        let mut next = self.clone();
        for update in &patch.updates {
            next.apply_update(update)?;
        }
        next.revision = self.revision + 1;
        *self = next;
        Ok(())
    }

    fn apply_update(&mut self, update: &Update) -> CoreResult<()> {
        match update {
            Update::SetTests {
                target,
                routine,
                difficult,
                challenging,
            } => {
                let ability = self.ability_mut(*target)?;
                ability.routine = *routine;
                ability.difficult = *difficult;
                ability.challenging = *challenging;
            }
            Update::Advance { target, exponent } => {
                let ability = self.ability_mut(*target)?;
                ability.routine = 0;
                ability.difficult = 0;
                ability.challenging = 0;
                ability.exponent = *exponent;
            }
            Update::SetAbilityFate { target, fate } => {
                self.ability_mut(*target)?.fate = *fate;
            }
            Update::SetFate(fate) => self.fate = *fate,
            Update::SetPtgs { action, value } => match action {
                PtgsAction::Shrugging => self.wounds.shrugging = *value,
                PtgsAction::Gritting => self.wounds.gritting = *value,
            },
            Update::SetWoundBands(bands) => self.wounds.assign_bands(bands),
            Update::SetEquipped { item, equipped } => {
                let found = self
                    .items
                    .iter_mut()
                    .find(|i| i.id == *item)
                    .ok_or(CoreError::ItemNotFound(*item))?;
                match &mut found.kind {
                    ItemKind::Armor(armor) => armor.equipped = *equipped,
                    _ => {
                        return Err(CoreError::WrongItemKind {
                            id: *item,
                            expected: "armor",
                        });
                    }
                }
            }
            Update::SetFunds(funds) => self.funds = *funds,
            Update::SetResourcesTax(tax) => self.resources_tax = *tax,
            Update::DegradeResources { exponent, tax } => {
                self.resources_tax = *tax;
                let resources = self.stats.get_mut(StatKey::Resources);
                resources.exponent = *exponent;
                resources.routine = 0;
                resources.difficult = 0;
                resources.challenging = 0;
            }
        }
        Ok(())
    }
}
