use crate::id::ItemId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when reading or patching a character record.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested item ID is not owned by the character.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// The item exists but is not of the kind the update expects.
    #[error("item {id} is not a {expected}")]
    WrongItemKind {
        /// The offending item.
        id: ItemId,
        /// The kind the update needed (e.g. "skill", "armor").
        expected: &'static str,
    },

    /// A patch was built against an older revision of the record.
    #[error("stale revision: patch based on {expected}, record is at {actual}")]
    StaleRevision {
        /// Revision the patch was built against.
        expected: u64,
        /// Revision the record is currently at.
        actual: u64,
    },

    /// The record could not be decoded.
    #[error("invalid record: {0}")]
    InvalidRecord(#[from] serde_json::Error),
}
