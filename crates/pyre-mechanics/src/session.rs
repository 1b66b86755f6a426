//! A live character: the record, its derived snapshot, and the
//! collaborators writes go through.
//!
//! Every mutating operation checks its policy first, builds a [`Patch`]
//! against the current revision, awaits the store, applies the patch to
//! the in-memory copy, and recomputes the snapshot. A rejected operation
//! changes nothing and reaches no collaborator.

use pyre_core::{CharacterRecord, CoreError, ItemId, Patch, Settings, StatRef, Update};
use tracing::{debug, info, warn};

use crate::advancement::{
    AdvancementProposal, TestDifficulty, TestOutcome, TrackedAbility, record_test,
    resolve_advancement,
};
use crate::collab::{LogNotifier, Notifier, Persistence};
use crate::derive::{DerivedSnapshot, derive};
use crate::dice::DiceRoller;
use crate::error::{MechError, MechResult};
use crate::fate::{self, FateRerollReport, FateRerollRequest};
use crate::resources::{self, TaxOutcome};

/// One character under play.
pub struct CharacterSession<P: Persistence> {
    record: CharacterRecord,
    snapshot: DerivedSnapshot,
    store: P,
    notifier: Box<dyn Notifier>,
}

impl<P: Persistence> CharacterSession<P> {
    /// Open a session over a loaded record. A record without settings gets
    /// the defaults in memory; nothing is written.
    pub fn open(mut record: CharacterRecord, store: P) -> Self {
        record.settings.get_or_insert_with(Settings::default);
        let snapshot = derive(&record);
        Self {
            record,
            snapshot,
            store,
            notifier: Box::new(LogNotifier),
        }
    }

    /// Send fate-reroll summaries somewhere other than the log.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// The in-memory record.
    pub fn record(&self) -> &CharacterRecord {
        &self.record
    }

    /// The snapshot of the current record.
    pub fn snapshot(&self) -> &DerivedSnapshot {
        &self.snapshot
    }

    /// The store.
    pub fn store(&self) -> &P {
        &self.store
    }

    /// Close the session, handing back the store.
    pub fn into_store(self) -> P {
        self.store
    }

    /// Resolve a roll name to an ability.
    pub fn resolve(&self, name: &str) -> MechResult<StatRef> {
        self.record
            .resolve_name(name)
            .ok_or_else(|| MechError::UnknownAbility(name.to_string()))
    }

    /// Log a test.
    ///
    /// Returns the outcome, including an advancement proposal whenever the
    /// ability is eligible. Confirming it is up to the caller.
    pub async fn record_test(
        &mut self,
        target: StatRef,
        difficulty: TestDifficulty,
        successful: bool,
    ) -> MechResult<TestOutcome> {
        self.ensure_tracks()?;
        let name = self.record.ability_name(target)?;
        let tracked = TrackedAbility {
            target,
            name: &name,
            ability: self.record.ability(target)?,
            needed: self.snapshot.tests_needed(target),
            success_only: self.snapshot.is_success_only(&name),
        };
        let outcome = record_test(&tracked, difficulty, successful);

        match &outcome {
            TestOutcome::Ignored => debug!(%name, %difficulty, "failed test not logged"),
            TestOutcome::Logged(log) => {
                debug!(%name, %difficulty, credited = ?log.credited, "test logged");
                if let Some(proposal) = &log.proposal {
                    info!(%proposal, "advancement available");
                }
            }
        }

        if let Some(update) = outcome.update() {
            self.commit(Patch::new(self.record.revision).with(update))
                .await?;
        }
        Ok(outcome)
    }

    /// Apply a confirmed advancement.
    pub async fn confirm_advancement(&mut self, proposal: &AdvancementProposal) -> MechResult<()> {
        self.ensure_tracks()?;
        let ability = self.record.ability(proposal.target)?;
        let needed = self.snapshot.tests_needed(proposal.target);
        let update = resolve_advancement(proposal, ability, &needed)?;
        self.commit(Patch::new(self.record.revision).with(update))
            .await
    }

    /// Spend a fate point on a finished roll.
    pub async fn fate_reroll<R: DiceRoller + ?Sized>(
        &mut self,
        request: &FateRerollRequest,
        roller: &mut R,
    ) -> MechResult<FateRerollReport> {
        let resolution =
            fate::fate_reroll(&self.record, &self.snapshot, request, roller).await?;
        self.commit(resolution.patch).await?;
        self.notifier.notify(&self.record.name, &resolution.report);
        Ok(resolution.report)
    }

    /// Tax Resources, spending at most `max_fund_loss` funds dice first.
    pub async fn tax_resources(&mut self, amount: u32, max_fund_loss: u32) -> MechResult<TaxOutcome> {
        let (patch, outcome) = resources::tax_resources(&self.record, amount, max_fund_loss);
        self.commit(patch).await?;
        Ok(outcome)
    }

    /// Degrade an overtaxed Resources by one.
    pub async fn degrade_resources(&mut self) -> MechResult<()> {
        let patch = resources::degrade_resources(&self.record)?;
        self.commit(patch).await
    }

    /// Equip or unequip an armor item.
    pub async fn set_equipped(&mut self, item: ItemId, equipped: bool) -> MechResult<()> {
        if self.record.item(item)?.as_armor().is_none() {
            return Err(CoreError::WrongItemKind {
                id: item,
                expected: "armor",
            }
            .into());
        }
        let patch = Patch::new(self.record.revision).with(Update::SetEquipped { item, equipped });
        self.commit(patch).await
    }

    fn ensure_tracks(&self) -> MechResult<()> {
        if self.record.kind.tracks_advancement() {
            Ok(())
        } else {
            warn!(character = %self.record.name, kind = %self.record.kind, "advancement unavailable");
            Err(MechError::AdvancementUnavailable(self.record.kind))
        }
    }

    // Bands are stored on the wound grid, so a write that moves them
    // carries the new bands with it.
    async fn commit(&mut self, mut patch: Patch) -> MechResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let mut preview = self.record.clone();
        preview.apply(&patch)?;
        let snapshot = derive(&preview);
        if let Some(bands) = snapshot.band_update(&preview) {
            patch.push(bands);
        }

        self.store.update(self.record.id, &patch).await?;
        self.record.apply(&patch)?;
        self.snapshot = snapshot;
        debug!(character = %self.record.name, revision = self.record.revision, "committed");
        Ok(())
    }
}
