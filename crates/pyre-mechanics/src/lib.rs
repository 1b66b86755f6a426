//! Rules engine for Pyre, a dice-pool tabletop RPG.
//!
//! Recomputes everything derived from a persisted character (wound
//! thresholds and pain, reflexes, mortal wound, armor encumbrance, roll
//! modifiers, test targets) and runs the test-tracking and advancement
//! machinery, including retroactive tests from fate rerolls. Dice rolling
//! and persistence are collaborators behind async traits.

pub mod advancement;
pub mod collab;
pub mod derive;
pub mod dice;
pub mod encumbrance;
pub mod error;
pub mod fate;
pub mod modifier;
pub mod pain;
pub mod resources;
pub mod session;
pub mod threshold;

pub use advancement::{
    AdvancementPolicy, AdvancementProposal, TestBand, TestDifficulty, TestOutcome, TestsNeeded,
    TrackingState,
};
pub use collab::{InMemoryStore, LogNotifier, Notifier, Persistence};
pub use derive::{DerivedSnapshot, derive};
pub use dice::{DiceRoller, RandomRoller, RollResult};
pub use encumbrance::EncumbrancePenalties;
pub use error::{MechError, MechResult};
pub use fate::{FateRerollReport, FateRerollRequest, RerollTarget};
pub use modifier::{CallOnRegistry, RollModifier, RollModifierRegistry};
pub use pain::PainTally;
pub use resources::TaxOutcome;
pub use session::CharacterSession;
pub use threshold::ThresholdSet;
