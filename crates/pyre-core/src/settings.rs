//! Per-character settings.

use serde::{Deserialize, Serialize};

/// Settings stored with a character. Every field has a default, so a
/// partially written block still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Comma-separated roll names whose failed tests are never logged.
    pub only_successes_count: String,
    /// Round the mortal-wound average up instead of down.
    pub round_up_mortal_wound: bool,
    /// Round the reflexes average up instead of down.
    pub round_up_reflexes: bool,
    /// The character has armor training; untrained penalties do not apply.
    pub armor_trained: bool,
    /// Superficial wounds never add an obstacle penalty.
    pub ignore_superficial_wounds: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            only_successes_count: "Faith, Resources, Perception".to_string(),
            round_up_mortal_wound: false,
            round_up_reflexes: false,
            armor_trained: false,
            ignore_superficial_wounds: false,
        }
    }
}

impl Settings {
    /// Set the success-only roll list.
    pub fn with_only_successes(mut self, rolls: impl Into<String>) -> Self {
        self.only_successes_count = rolls.into();
        self
    }

    /// Round mortal wound up.
    pub fn with_round_up_mortal_wound(mut self, on: bool) -> Self {
        self.round_up_mortal_wound = on;
        self
    }

    /// Round reflexes up.
    pub fn with_round_up_reflexes(mut self, on: bool) -> Self {
        self.round_up_reflexes = on;
        self
    }

    /// Mark the character armor-trained.
    pub fn with_armor_trained(mut self, on: bool) -> Self {
        self.armor_trained = on;
        self
    }

    /// Ignore superficial wounds.
    pub fn with_ignore_superficial_wounds(mut self, on: bool) -> Self {
        self.ignore_superficial_wounds = on;
        self
    }

    /// The success-only roll names, trimmed and lowercased.
    pub fn success_only_rolls(&self) -> Vec<String> {
        self.only_successes_count
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_settings() {
        let s = Settings::default();
        assert!(!s.armor_trained);
        assert_eq!(
            s.success_only_rolls(),
            vec!["faith", "resources", "perception"]
        );
    }

    #[test]
    fn builder_methods() {
        let s = Settings::default()
            .with_armor_trained(true)
            .with_round_up_reflexes(true)
            .with_only_successes("Steel,, ");
        assert!(s.armor_trained);
        assert!(s.round_up_reflexes);
        assert!(!s.round_up_mortal_wound);
        assert_eq!(s.success_only_rolls(), vec!["steel"]);
    }

    #[test]
    fn partial_block_fills_defaults() {
        let s: Settings = serde_json::from_value(json!({"armor_trained": true})).unwrap();
        assert!(s.armor_trained);
        assert_eq!(s.only_successes_count, "Faith, Resources, Perception");
    }
}
