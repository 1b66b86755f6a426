//! Roll modifiers and call-ons, keyed by lowercased roll name.
//!
//! Both registries are rebuilt from empty on every recomputation pass and
//! never carried across passes.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Roll name whose modifiers apply to every roll.
pub const ALL_ROLLS: &str = "all";

/// An additive change to a roll's dice or obstacle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollModifier {
    /// Dice added (negative removes dice).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice: Option<i32>,
    /// Obstacle added (negative lowers it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obstacle: Option<i32>,
    /// The player may choose whether it applies.
    pub optional: bool,
    /// Shown next to the modifier on the roll dialog.
    pub label: String,
}

impl RollModifier {
    /// A dice modifier.
    pub fn dice(amount: i32, label: impl Into<String>) -> Self {
        Self {
            dice: Some(amount),
            obstacle: None,
            optional: false,
            label: label.into(),
        }
    }

    /// An obstacle modifier.
    pub fn obstacle(amount: i32, label: impl Into<String>) -> Self {
        Self {
            dice: None,
            obstacle: Some(amount),
            optional: false,
            label: label.into(),
        }
    }

    /// Mark the modifier optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// True if the modifier changes neither dice nor obstacle.
    pub fn is_inert(&self) -> bool {
        self.dice.unwrap_or(0) == 0 && self.obstacle.unwrap_or(0) == 0
    }
}

/// Modifiers accumulated for each roll name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollModifierRegistry {
    by_roll: HashMap<String, Vec<RollModifier>>,
}

impl RollModifierRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a modifier for a roll. With `suppress_if_zero`, an inert
    /// modifier is dropped instead of stored.
    pub fn add(&mut self, roll_name: &str, modifier: RollModifier, suppress_if_zero: bool) {
        if suppress_if_zero && modifier.is_inert() {
            return;
        }
        self.by_roll
            .entry(roll_name.trim().to_lowercase())
            .or_default()
            .push(modifier);
    }

    /// Modifiers for a roll followed by the modifiers for every roll.
    /// Asking for [`ALL_ROLLS`] itself returns that bucket once.
    pub fn get(&self, roll_name: &str) -> Vec<RollModifier> {
        let key = roll_name.trim().to_lowercase();
        let global = self.by_roll.get(ALL_ROLLS).map(Vec::as_slice).unwrap_or(&[]);
        if key == ALL_ROLLS {
            return global.to_vec();
        }
        self.by_roll
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .chain(global)
            .cloned()
            .collect()
    }

    /// The stored bucket for one roll name, without the global bucket.
    pub fn bucket(&self, roll_name: &str) -> &[RollModifier] {
        self.by_roll
            .get(&roll_name.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Net dice and obstacle shift for a roll, counting optional modifiers
    /// only when `include_optional` is set.
    pub fn totals(&self, roll_name: &str, include_optional: bool) -> (i32, i32) {
        self.get(roll_name)
            .iter()
            .filter(|m| include_optional || !m.optional)
            .fold((0, 0), |(d, o), m| {
                (
                    d.saturating_add(m.dice.unwrap_or(0)),
                    o.saturating_add(m.obstacle.unwrap_or(0)),
                )
            })
    }

    /// Roll names that have at least one modifier, sorted.
    pub fn roll_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_roll.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Total number of stored modifiers.
    pub fn len(&self) -> usize {
        self.by_roll.values().map(Vec::len).sum()
    }

    /// True if no modifier is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Traits granting a call-on, per roll name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOnRegistry {
    by_roll: HashMap<String, BTreeSet<String>>,
}

impl CallOnRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a call-on from `trait_name` to each comma-separated roll name
    /// in `targets`.
    pub fn add(&mut self, targets: &str, trait_name: &str) {
        for target in targets.split(',').map(|s| s.trim().to_lowercase()) {
            if target.is_empty() {
                continue;
            }
            self.by_roll
                .entry(target)
                .or_default()
                .insert(trait_name.to_string());
        }
    }

    /// Trait names with a call-on for the roll, sorted.
    pub fn get(&self, roll_name: &str) -> Vec<String> {
        self.by_roll
            .get(&roll_name.trim().to_lowercase())
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// True if no call-on is registered.
    pub fn is_empty(&self) -> bool {
        self.by_roll.is_empty()
    }
}
