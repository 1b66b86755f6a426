use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::ItemId;
use crate::lenient;
use crate::shade::Shade;

/// A rated ability: a stat, attribute, or skill with an exponent, a shade,
/// and its logged advancement tests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ability {
    /// Dice-pool size.
    #[serde(rename = "exp", deserialize_with = "lenient::u32_field")]
    pub exponent: u32,
    /// Which faces count as successes.
    #[serde(deserialize_with = "lenient::shade_field")]
    pub shade: Shade,
    /// Whether rolls of this ability are open-ended (sixes explode).
    pub open: bool,
    /// Logged routine tests.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub routine: u32,
    /// Logged difficult tests.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub difficult: u32,
    /// Logged challenging tests.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub challenging: u32,
    /// Persona points spent on this ability.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub persona: u32,
    /// Fate points spent on this ability.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub fate: u32,
    /// Deeds points spent on this ability.
    #[serde(deserialize_with = "lenient::u32_field")]
    pub deeds: u32,
}

impl Ability {
    /// A black-shaded ability at the given exponent with no logged tests.
    pub fn new(exponent: u32) -> Self {
        Self {
            exponent,
            ..Self::default()
        }
    }

    /// Set the shade.
    pub fn with_shade(mut self, shade: Shade) -> Self {
        self.shade = shade;
        self
    }

    /// Mark rolls of this ability open-ended.
    pub fn open_ended(mut self) -> Self {
        self.open = true;
        self
    }

    /// Set the logged test counts.
    pub fn with_tests(mut self, routine: u32, difficult: u32, challenging: u32) -> Self {
        self.routine = routine;
        self.difficult = difficult;
        self.challenging = challenging;
        self
    }
}

/// The twelve abilities every character carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    /// Will.
    Will,
    /// Power.
    Power,
    /// Perception.
    Perception,
    /// Agility.
    Agility,
    /// Forte.
    Forte,
    /// Speed.
    Speed,
    /// Health.
    Health,
    /// Steel.
    Steel,
    /// Circles.
    Circles,
    /// Resources.
    Resources,
    /// First user-named attribute (Faith, Greed, ...).
    Custom1,
    /// Second user-named attribute.
    Custom2,
}

impl StatKey {
    /// Every key, in sheet order.
    pub const ALL: [StatKey; 12] = [
        Self::Will,
        Self::Power,
        Self::Perception,
        Self::Agility,
        Self::Forte,
        Self::Speed,
        Self::Health,
        Self::Steel,
        Self::Circles,
        Self::Resources,
        Self::Custom1,
        Self::Custom2,
    ];

    /// The fixed display name. Custom attributes take their name from the
    /// record instead; see [`Stats::display_name`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Will => "Will",
            Self::Power => "Power",
            Self::Perception => "Perception",
            Self::Agility => "Agility",
            Self::Forte => "Forte",
            Self::Speed => "Speed",
            Self::Health => "Health",
            Self::Steel => "Steel",
            Self::Circles => "Circles",
            Self::Resources => "Resources",
            Self::Custom1 => "Custom 1",
            Self::Custom2 => "Custom 2",
        }
    }

    /// Parse a key from its display or snake-case name.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase().replace([' ', '_'], "");
        Self::ALL
            .into_iter()
            .find(|k| k.name().to_lowercase().replace(' ', "") == lower)
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A character's stats and attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    /// Will.
    pub will: Ability,
    /// Power.
    pub power: Ability,
    /// Perception.
    pub perception: Ability,
    /// Agility.
    pub agility: Ability,
    /// Forte.
    pub forte: Ability,
    /// Speed.
    pub speed: Ability,
    /// Health.
    pub health: Ability,
    /// Steel.
    pub steel: Ability,
    /// Circles.
    pub circles: Ability,
    /// Resources.
    pub resources: Ability,
    /// First user-named attribute.
    pub custom1: Ability,
    /// Second user-named attribute.
    pub custom2: Ability,
    /// Name of the first user-named attribute.
    pub custom1_name: String,
    /// Name of the second user-named attribute.
    pub custom2_name: String,
}

impl Stats {
    /// Borrow the ability for a key.
    pub fn get(&self, key: StatKey) -> &Ability {
        match key {
            StatKey::Will => &self.will,
            StatKey::Power => &self.power,
            StatKey::Perception => &self.perception,
            StatKey::Agility => &self.agility,
            StatKey::Forte => &self.forte,
            StatKey::Speed => &self.speed,
            StatKey::Health => &self.health,
            StatKey::Steel => &self.steel,
            StatKey::Circles => &self.circles,
            StatKey::Resources => &self.resources,
            StatKey::Custom1 => &self.custom1,
            StatKey::Custom2 => &self.custom2,
        }
    }

    /// Mutably borrow the ability for a key.
    pub fn get_mut(&mut self, key: StatKey) -> &mut Ability {
        match key {
            StatKey::Will => &mut self.will,
            StatKey::Power => &mut self.power,
            StatKey::Perception => &mut self.perception,
            StatKey::Agility => &mut self.agility,
            StatKey::Forte => &mut self.forte,
            StatKey::Speed => &mut self.speed,
            StatKey::Health => &mut self.health,
            StatKey::Steel => &mut self.steel,
            StatKey::Circles => &mut self.circles,
            StatKey::Resources => &mut self.resources,
            StatKey::Custom1 => &mut self.custom1,
            StatKey::Custom2 => &mut self.custom2,
        }
    }

    /// The name a roll of this stat goes by. Custom attributes use their
    /// user-given name when one is set.
    pub fn display_name(&self, key: StatKey) -> &str {
        match key {
            StatKey::Custom1 if !self.custom1_name.trim().is_empty() => self.custom1_name.trim(),
            StatKey::Custom2 if !self.custom2_name.trim().is_empty() => self.custom2_name.trim(),
            other => other.name(),
        }
    }

    /// Find a stat by the name its rolls go by, custom names included.
    pub fn find_by_name(&self, name: &str) -> Option<StatKey> {
        let lower = name.trim().to_lowercase();
        StatKey::ALL
            .into_iter()
            .find(|k| self.display_name(*k).to_lowercase() == lower)
            .or_else(|| StatKey::parse(name))
    }
}

/// A reference to an addressable ability: one of the character's stats or
/// an owned skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatRef {
    /// A stat or attribute on the character record.
    Stat(StatKey),
    /// A skill item owned by the character.
    Skill(ItemId),
}

impl fmt::Display for StatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stat(key) => write!(f, "{key}"),
            Self::Skill(id) => write!(f, "skill {id}"),
        }
    }
}
