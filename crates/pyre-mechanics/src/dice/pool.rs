//! Seeded random rolling.

use async_trait::async_trait;
use pyre_core::Shade;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::roll::RollResult;
use super::{DiceRoller, MAX_FACE};
use crate::error::MechResult;

/// Upper bound on dice produced by one exploding roll.
const EXPLOSION_CAP: usize = 256;

/// A [`DiceRoller`] backed by a seeded RNG.
#[derive(Debug, Clone)]
pub struct RandomRoller {
    rng: StdRng,
}

impl RandomRoller {
    /// Create a roller with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Roll synchronously.
    pub fn roll_now(&mut self, count: u32, explodes: bool) -> RollResult {
        let mut faces = Vec::with_capacity(count as usize);
        let mut pending = count;
        while pending > 0 && faces.len() < EXPLOSION_CAP {
            pending -= 1;
            let face = self.rng.random_range(1..=MAX_FACE);
            if explodes && face == MAX_FACE {
                pending += 1;
            }
            faces.push(face);
        }
        RollResult::new(faces)
    }
}

#[async_trait]
impl DiceRoller for RandomRoller {
    async fn roll(&mut self, count: u32, explodes: bool, _shade: Shade) -> MechResult<RollResult> {
        Ok(self.roll_now(count, explodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_produces_valid_values() {
        let mut roller = RandomRoller::seeded(42);
        let result = roller.roll_now(10, false);
        assert_eq!(result.count(), 10);
        assert!(result.faces.iter().all(|f| (1..=6).contains(f)));
    }

    #[test]
    fn roll_deterministic_with_seed() {
        let r1 = RandomRoller::seeded(99).roll_now(5, false);
        let r2 = RandomRoller::seeded(99).roll_now(5, false);
        assert_eq!(r1, r2);
    }

    #[test]
    fn exploding_adds_a_die_per_six() {
        let result = RandomRoller::seeded(7).roll_now(20, true);
        assert_eq!(result.count(), 20 + result.sixes() as usize);
    }

    #[test]
    fn zero_dice() {
        assert_eq!(RandomRoller::seeded(1).roll_now(0, true).count(), 0);
    }
}
