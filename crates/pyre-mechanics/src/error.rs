//! Error types for the mechanics engine.

use pyre_core::{CoreError, StatRef};

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A fate reroll was requested with no fate points left.
    #[error("no fate points available")]
    InsufficientFate,

    /// Advancement was requested for an ability whose tests are not complete.
    #[error("{0} is not ready to advance")]
    NotEligible(String),

    /// An advancement proposal no longer matches the ability's exponent.
    #[error("stale advancement for {target}: proposed from {proposed_from}, exponent is {current}")]
    StaleProposal {
        /// The ability the proposal was for.
        target: StatRef,
        /// Exponent the proposal was computed from.
        proposed_from: u32,
        /// Exponent the ability has now.
        current: u32,
    },

    /// The actor kind does not log tests or advance.
    #[error("{0} actors do not track advancement")]
    AdvancementUnavailable(pyre_core::ActorKind),

    /// No ability goes by the given roll name.
    #[error("unknown ability: {0}")]
    UnknownAbility(String),

    /// The dice collaborator failed to produce a roll.
    #[error("dice error: {0}")]
    Dice(String),

    /// The persistence collaborator rejected or failed a write.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A record-level error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
