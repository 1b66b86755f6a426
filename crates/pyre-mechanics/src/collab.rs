//! Collaborators the engine talks to: where records are stored and where
//! fate-reroll summaries go.
//!
//! Implementations plug in so the engine can run against a JSON file, a
//! host application's document store, or an in-memory fixture.

use std::collections::HashMap;

use async_trait::async_trait;
use pyre_core::{CharacterId, CharacterRecord, Patch};
use tracing::info;

use crate::error::{MechError, MechResult};
use crate::fate::FateRerollReport;

/// Stores character records.
#[async_trait]
pub trait Persistence: Send {
    /// Apply a patch to the stored record, whole or not at all.
    async fn update(&mut self, id: CharacterId, patch: &Patch) -> MechResult<()>;
}

/// Receives fate-reroll summaries. Delivery is fire-and-forget.
pub trait Notifier: Send {
    /// Publish a reroll outcome.
    fn notify(&mut self, character: &str, report: &FateRerollReport);
}

/// A [`Notifier`] that writes summaries to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, character: &str, report: &FateRerollReport) {
        info!(character, at = %report.at, "{report}");
    }
}

/// Records held in memory, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: HashMap<CharacterId, CharacterRecord>,
    writes: usize,
}

impl InMemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a record.
    pub fn insert(&mut self, record: CharacterRecord) {
        self.records.insert(record.id, record);
    }

    /// The stored copy of a record.
    pub fn get(&self, id: CharacterId) -> Option<&CharacterRecord> {
        self.records.get(&id)
    }

    /// Number of patches applied so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

#[async_trait]
impl Persistence for InMemoryStore {
    async fn update(&mut self, id: CharacterId, patch: &Patch) -> MechResult<()> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or_else(|| MechError::Persistence(format!("no character {id}")))?;
        record.apply(patch)?;
        self.writes += 1;
        Ok(())
    }
}
