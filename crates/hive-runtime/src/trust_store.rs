//! Trust persistence — in-memory and JSON-file stores.
//!
//! The JSON store keeps one file per agent so that every ledger has a
//! single writer. Files carry a format version and are rejected on
//! mismatch instead of being silently misread.

use hive_core::error::{HiveError, Result};
use hive_core::trust::{TrustRecord, TrustStore};
use hive_core::types::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Current on-disk format.
pub const LEDGER_VERSION: u32 = 1;

/// Store that lives as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryTrustStore {
    ledgers: HashMap<AgentId, Vec<TrustRecord>>,
}

impl MemoryTrustStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of owners with saved records.
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }
}

impl TrustStore for MemoryTrustStore {
    fn load(&self, owner: &AgentId) -> Result<Option<Vec<TrustRecord>>> {
        Ok(self.ledgers.get(owner).cloned())
    }

    fn save(&mut self, owner: &AgentId, records: &[TrustRecord]) -> Result<()> {
        self.ledgers.insert(owner.clone(), records.to_vec());
        Ok(())
    }
}

/// Serialized form of one agent's ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerFile {
    pub version: u32,
    pub owner: AgentId,
    /// Unique id of the save, for telling snapshots apart.
    pub save_id: String,
    /// Seconds since the Unix epoch.
    pub saved_at: u64,
    pub records: Vec<TrustRecord>,
}

/// Store writing `<dir>/<owner>.trust.json` per agent.
#[derive(Debug, Clone)]
pub struct JsonTrustStore {
    dir: PathBuf,
}

impl JsonTrustStore {
    /// Files go under `dir`, which is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `owner`'s ledger.
    pub fn path_for(&self, owner: &AgentId) -> PathBuf {
        let stem: String = owner
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.trust.json", stem))
    }

    /// Read and validate a ledger file.
    pub fn read_file(path: &Path) -> Result<LedgerFile> {
        let json = std::fs::read_to_string(path)?;
        let file: LedgerFile = serde_json::from_str(&json)?;
        if file.version != LEDGER_VERSION {
            return Err(HiveError::VersionMismatch {
                expected: LEDGER_VERSION,
                found: file.version,
            });
        }
        Ok(file)
    }
}

impl TrustStore for JsonTrustStore {
    fn load(&self, owner: &AgentId) -> Result<Option<Vec<TrustRecord>>> {
        let path = self.path_for(owner);
        if !path.exists() {
            return Ok(None);
        }
        let file = Self::read_file(&path)?;
        if file.owner != *owner {
            return Err(HiveError::store(format!(
                "{} holds the ledger of {}, not {}",
                path.display(),
                file.owner,
                owner
            )));
        }
        debug!(owner = %owner, path = %path.display(), "trust ledger read");
        Ok(Some(file.records))
    }

    fn save(&mut self, owner: &AgentId, records: &[TrustRecord]) -> Result<()> {
        let file = LedgerFile {
            version: LEDGER_VERSION,
            owner: owner.clone(),
            save_id: uuid::Uuid::new_v4().to_string(),
            saved_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            records: records.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(owner);
        std::fs::write(&path, json)?;
        debug!(owner = %owner, path = %path.display(), "trust ledger written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::trust::{TrustCategory, TrustLedger, TrustPolicy};

    fn ledger_with_history() -> TrustLedger {
        let mut ledger = TrustLedger::new("alice".into(), TrustPolicy::default());
        let bob = AgentId::from("bob");
        ledger.decrease(&bob, TrustCategory::FoundGoal);
        ledger.increase(&bob, TrustCategory::DropOff);
        ledger.meet(&AgentId::from("carol"));
        ledger
    }

    #[test]
    fn memory_store_round_trips() {
        let ledger = ledger_with_history();
        let mut store = MemoryTrustStore::new();
        ledger.persist_to(&mut store).unwrap();
        assert_eq!(store.len(), 1);

        let mut restored = TrustLedger::new("alice".into(), TrustPolicy::default());
        assert_eq!(restored.load_from(&store).unwrap(), 2);
        assert_eq!(restored.records(), ledger.records());
    }

    #[test]
    fn json_store_writes_one_file_per_owner() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonTrustStore::new(dir.path().join("nested/trust"));
        let ledger = ledger_with_history();
        ledger.persist_to(&mut store).unwrap();

        let path = store.path_for(&AgentId::from("alice"));
        assert!(path.exists());
        let file = JsonTrustStore::read_file(&path).unwrap();
        assert_eq!(file.version, LEDGER_VERSION);
        assert_eq!(file.owner, AgentId::from("alice"));

        let mut restored = TrustLedger::new("alice".into(), TrustPolicy::default());
        restored.load_from(&store).unwrap();
        let bob = AgentId::from("bob");
        assert!((restored.score(&bob, TrustCategory::FoundGoal) - 0.25).abs() < 1e-9);
        assert!((restored.score(&bob, TrustCategory::DropOff) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTrustStore::new(dir.path());
        assert!(store.load(&AgentId::from("nobody")).unwrap().is_none());
    }

    #[test]
    fn rejects_other_versions() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonTrustStore::new(dir.path());
        let alice = AgentId::from("alice");
        store.save(&alice, &[]).unwrap();

        let path = store.path_for(&alice);
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, text.replace("\"version\": 1", "\"version\": 9")).unwrap();

        let err = store.load(&alice).unwrap_err();
        assert!(matches!(err, HiveError::VersionMismatch { expected: 1, found: 9 }));
    }

    #[test]
    fn file_names_are_sanitized() {
        let store = JsonTrustStore::new("/tmp/ledgers");
        let path = store.path_for(&AgentId::from("../agent 1"));
        assert_eq!(path.file_name().unwrap(), "___agent_1.trust.json");
    }
}
