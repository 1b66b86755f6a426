//! Six-sided dice pools and shade-based success counting.
//!
//! A die succeeds when its face beats the shade's threshold: black needs a
//! 4 or better, gray a 3, white a 2. Rolling itself is a collaborator
//! ([`DiceRoller`]) so the engine can be driven by a seeded RNG, a table
//! app, or a scripted test fixture.

pub mod pool;
pub mod roll;

pub use pool::RandomRoller;
pub use roll::RollResult;

use async_trait::async_trait;
use pyre_core::Shade;

use crate::error::MechResult;

/// Highest face on the dice this system uses.
pub const MAX_FACE: u32 = 6;

/// The highest face that still fails for a shade. Faces above it succeed.
pub fn success_target(shade: Shade) -> u32 {
    match shade {
        Shade::Black => 3,
        Shade::Gray => 2,
        Shade::White => 1,
    }
}

/// Whether a single face is a success for the shade.
pub fn is_success(face: u32, shade: Shade) -> bool {
    face > success_target(shade)
}

/// Rolls dice on the engine's behalf.
#[async_trait]
pub trait DiceRoller: Send {
    /// Roll `count` six-sided dice and return every face produced. When
    /// `explodes` is set, each six adds another die, recursively.
    async fn roll(&mut self, count: u32, explodes: bool, shade: Shade) -> MechResult<RollResult>;
}
