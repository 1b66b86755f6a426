use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ability::Ability;
use crate::id::ItemId;
use crate::lenient;

/// An item owned by a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identifier.
    #[serde(default)]
    pub id: ItemId,
    /// Display name; also the roll name for skills.
    pub name: String,
    /// Type tag and per-type fields.
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    /// Create an item with a fresh ID.
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            kind,
        }
    }

    /// The skill data, if this item is a skill.
    pub fn as_skill(&self) -> Option<&SkillData> {
        match &self.kind {
            ItemKind::Skill(s) => Some(s),
            _ => None,
        }
    }

    /// The armor data, if this item is armor.
    pub fn as_armor(&self) -> Option<&ArmorData> {
        match &self.kind {
            ItemKind::Armor(a) => Some(a),
            _ => None,
        }
    }
}

/// The type tag of an item with its type-specific fields.
///
/// Reading never fails: a tag the engine does not know, or a payload that
/// does not fit its tag, is kept verbatim as [`ItemKind::Other`] and
/// written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawItemKind", into = "RawItemKind")]
pub enum ItemKind {
    /// A learned skill.
    Skill(SkillData),
    /// A character, die, or call-on trait.
    Trait(TraitData),
    /// A reputation (famous or infamous).
    Reputation(ReputationData),
    /// An affiliation with a group.
    Affiliation(AffiliationData),
    /// A carried possession.
    Possession(PossessionData),
    /// Protective gear.
    Armor(ArmorData),
    /// Anything the engine does not read (beliefs, instincts, spells, ...).
    Other {
        /// The type tag as stored.
        tag: String,
        /// The payload as stored.
        data: Value,
    },
}

impl ItemKind {
    /// An unread item with the given tag and no payload.
    pub fn other(tag: impl Into<String>) -> Self {
        Self::Other {
            tag: tag.into(),
            data: Value::Null,
        }
    }
}

// Wire form of an item kind: `{"type": ..., "data": ...}` flattened into
// the item.
#[derive(Serialize, Deserialize)]
struct RawItemKind {
    #[serde(rename = "type", default)]
    tag: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    data: Value,
}

impl From<RawItemKind> for ItemKind {
    fn from(raw: RawItemKind) -> Self {
        fn payload<T: DeserializeOwned + Default>(data: &Value) -> Option<T> {
            match data {
                Value::Null => Some(T::default()),
                data => T::deserialize(data).ok(),
            }
        }

        let tag = raw.tag.as_str().unwrap_or_default().to_string();
        let kind = match tag.trim().to_lowercase().as_str() {
            "skill" => payload(&raw.data).map(Self::Skill),
            "trait" => payload(&raw.data).map(Self::Trait),
            "reputation" => payload(&raw.data).map(Self::Reputation),
            "affiliation" => payload(&raw.data).map(Self::Affiliation),
            "possession" => payload(&raw.data).map(Self::Possession),
            "armor" => payload(&raw.data).map(Self::Armor),
            _ => None,
        };
        kind.unwrap_or(Self::Other {
            tag,
            data: raw.data,
        })
    }
}

impl From<ItemKind> for RawItemKind {
    fn from(kind: ItemKind) -> Self {
        fn raw<T: Serialize>(tag: &str, data: &T) -> RawItemKind {
            RawItemKind {
                tag: Value::from(tag),
                data: serde_json::to_value(data).unwrap_or_default(),
            }
        }

        match kind {
            ItemKind::Skill(d) => raw("skill", &d),
            ItemKind::Trait(d) => raw("trait", &d),
            ItemKind::Reputation(d) => raw("reputation", &d),
            ItemKind::Affiliation(d) => raw("affiliation", &d),
            ItemKind::Possession(d) => raw("possession", &d),
            ItemKind::Armor(d) => raw("armor", &d),
            ItemKind::Other { tag, data } => RawItemKind {
                tag: Value::from(tag),
                data,
            },
        }
    }
}

/// Broad skill categories. Only martial and sorcerous skills are singled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    /// Academic skills.
    Academic,
    /// Artisan skills.
    Artisan,
    /// Artist skills.
    Artist,
    /// Craftsman skills.
    Craftsman,
    /// Forester skills.
    Forester,
    /// Martial skills.
    Martial,
    /// Medicinal skills.
    Medicinal,
    /// Military skills.
    Military,
    /// Musical skills.
    Musical,
    /// Peasant skills.
    Peasant,
    /// Physical skills.
    Physical,
    /// School-of-thought skills.
    SchoolOfThought,
    /// Seafaring skills.
    Seafaring,
    /// Social skills.
    Social,
    /// Sorcerous skills.
    Sorcerous,
    /// Special skills.
    #[default]
    Special,
}

/// Fields of a skill item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillData {
    /// Exponent, shade, and logged tests.
    pub ability: Ability,
    /// Category.
    #[serde(deserialize_with = "lenient::or_default")]
    pub skill_type: SkillType,
    /// Still being learned (beginner's luck); cannot fork.
    pub learning: bool,
    /// A training skill; cannot fork and is never martial.
    pub training: bool,
    /// Forks only as a wild fork.
    pub wild_fork: bool,
}

/// How a trait works mechanically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraitType {
    /// Purely descriptive.
    #[default]
    Character,
    /// Grants a call-on for named rolls.
    CallOn,
    /// Adds dice or obstacle to named rolls.
    Die,
}

/// Fields of a trait item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraitData {
    /// Mechanical kind.
    #[serde(rename = "traittype", deserialize_with = "lenient::or_default")]
    pub trait_type: TraitType,
    /// Comma-separated roll names this call-on applies to.
    pub callon_target: String,
    /// Whether the trait adds dice.
    pub has_die_modifier: bool,
    /// Dice added (or removed, if negative).
    pub die_modifier: i32,
    /// Comma-separated roll names the dice modifier applies to.
    pub die_modifier_target: String,
    /// Whether the trait shifts the obstacle.
    pub has_ob_modifier: bool,
    /// Obstacle added (or removed, if negative).
    pub ob_modifier: i32,
    /// Comma-separated roll names the obstacle modifier applies to.
    pub ob_modifier_target: String,
}

/// Fields of a reputation item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationData {
    /// Circles dice granted (or taken, if infamous).
    #[serde(deserialize_with = "lenient::u32_field")]
    pub dice: u32,
    /// Infamous reputations penalize circles.
    pub infamous: bool,
}

/// Fields of an affiliation item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AffiliationData {
    /// Circles dice granted.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub dice: u32,
}

/// Fields of a possession item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PossessionData {
    /// Counts as a toolkit for skill tests.
    pub is_toolkit: bool,
}

/// Penalty imposed when wearing armor without armor training.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UntrainedPenalty {
    /// No penalty (shields and the like).
    #[default]
    None,
    /// Light armor: +1 Ob to Health and Forte.
    Light,
    /// Heavy armor: +1 Ob to everything.
    Heavy,
    /// Plate: +2 Ob to everything.
    Plate,
}

/// Fields of an armor item. Penalties are the clumsy-weight figures for
/// the zones the piece covers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorData {
    /// Currently worn.
    pub equipped: bool,
    /// Covers the head.
    pub has_helm: bool,
    /// Covers the torso.
    pub has_torso: bool,
    /// Covers the left arm.
    pub has_left_arm: bool,
    /// Covers the right arm.
    pub has_right_arm: bool,
    /// Covers the left leg.
    pub has_left_leg: bool,
    /// Covers the right leg.
    pub has_right_leg: bool,
    /// Helm: obstacle to Perception and Observation.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub perception_observation_penalty: u32,
    /// Torso: obstacle to Health and Forte.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub health_forte_penalty: u32,
    /// Torso: obstacle to Stealthy.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub stealthy_penalty: u32,
    /// Torso: obstacle to Swimming.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub swimming_penalty: u32,
    /// Arms: obstacle to Agility.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub agility_penalty: u32,
    /// Arms: obstacle to throwing and shooting.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub throwing_shooting_penalty: u32,
    /// Legs: dice removed from Speed.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub speed_dice_penalty: u32,
    /// Legs: obstacle to Speed.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub speed_ob_penalty: u32,
    /// Legs: obstacle to Climbing.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub climbing_penalty: u32,
    /// Severity when worn untrained.
    #[serde(deserialize_with = "lenient::or_default")]
    pub untrained_penalty: UntrainedPenalty,
}

impl ArmorData {
    /// True if the piece covers any body zone (anything but a bare shield).
    pub fn covers_any_zone(&self) -> bool {
        self.has_helm
            || self.has_torso
            || self.covers_arms()
            || self.covers_legs()
    }

    /// True if the piece covers either arm.
    pub fn covers_arms(&self) -> bool {
        self.has_left_arm || self.has_right_arm
    }

    /// True if the piece covers either leg.
    pub fn covers_legs(&self) -> bool {
        self.has_left_leg || self.has_right_leg
    }
}
