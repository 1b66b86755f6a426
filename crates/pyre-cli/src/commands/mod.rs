pub mod equip;
pub mod fate;
pub mod sheet;
pub mod tax;

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pyre_core::{CharacterId, CharacterRecord, Patch};
use pyre_mechanics::{CharacterSession, MechError, MechResult, Persistence};
use tracing::debug;

/// A character JSON file acting as the store. Every patch is applied to
/// the file's copy and written back in full.
pub struct JsonFileStore {
    path: PathBuf,
    record: CharacterRecord,
}

impl JsonFileStore {
    fn load(path: &Path) -> Result<Self, String> {
        let json = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let record = CharacterRecord::from_json(&json)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            record,
        })
    }
}

#[async_trait]
impl Persistence for JsonFileStore {
    async fn update(&mut self, id: CharacterId, patch: &Patch) -> MechResult<()> {
        if id != self.record.id {
            return Err(MechError::Persistence(format!(
                "{} holds {}, not {id}",
                self.path.display(),
                self.record.id
            )));
        }
        let mut next = self.record.clone();
        next.apply(patch)?;
        let json = next.to_json()?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| MechError::Persistence(format!("{}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), revision = next.revision, "character written");
        self.record = next;
        Ok(())
    }
}

/// Load a character file and open a session over it.
fn open_session(path: &Path) -> Result<CharacterSession<JsonFileStore>, String> {
    let store = JsonFileStore::load(path)?;
    let record = store.record.clone();
    Ok(CharacterSession::open(record, store))
}
