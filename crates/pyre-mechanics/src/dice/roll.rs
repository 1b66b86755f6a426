//! Dice roll results and aggregation.

use pyre_core::Shade;
use serde::{Deserialize, Serialize};

use super::{MAX_FACE, is_success};

/// The faces produced by one roll of a pool, in roll order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RollResult {
    /// Individual faces.
    pub faces: Vec<u32>,
}

impl RollResult {
    /// Wrap a list of faces.
    pub fn new(faces: Vec<u32>) -> Self {
        Self { faces }
    }

    /// Count faces that succeed for the shade.
    pub fn successes(&self, shade: Shade) -> u32 {
        self.faces.iter().filter(|&&f| is_success(f, shade)).count() as u32
    }

    /// Count failing faces ("traitors") for the shade.
    pub fn traitors(&self, shade: Shade) -> u32 {
        self.faces.iter().filter(|&&f| !is_success(f, shade)).count() as u32
    }

    /// Count faces showing the maximum value.
    pub fn sixes(&self) -> u32 {
        self.faces.iter().filter(|&&f| f == MAX_FACE).count() as u32
    }

    /// Number of dice in the result.
    pub fn count(&self) -> usize {
        self.faces.len()
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.faces.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}]", values.join(", "))
    }
}
