use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{ensure, Context};
use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::Config;
use crate::storage::{OrderedReadsAndWrites, Storage, StorageKey, StorageValue};

const SNAPSHOT_FILE: &str = "state.borsh";

type StateTree = BTreeMap<Vec<u8>, Arc<Vec<u8>>>;

#[derive(BorshSerialize, BorshDeserialize)]
struct Snapshot {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
}

/// Key-value storage used by native execution.
///
/// The committed state is an ordered map shared by all clones. When configured
/// with a path, every commit also rewrites a snapshot on disk and the snapshot
/// is loaded back on open.
#[derive(Clone, Default)]
pub struct NativeStorage {
    db: Arc<RwLock<StateTree>>,
    snapshot_path: Option<PathBuf>,
}

impl std::fmt::Debug for NativeStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeStorage")
            .field("snapshot_path", &self.snapshot_path)
            .field("entries", &self.read().len())
            .finish()
    }
}

impl NativeStorage {
    /// Creates an empty storage that lives only in memory.
    pub fn temporary() -> Self {
        Self::default()
    }

    /// Opens the storage kept in `path`, creating the folder if needed.
    pub fn with_path(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let dir = path.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create storage folder {}", dir.display()))?;

        let snapshot_path = dir.join(SNAPSHOT_FILE);
        let tree = if snapshot_path.exists() {
            load_snapshot(&snapshot_path)?
        } else {
            StateTree::new()
        };

        debug!(
            "Opened native storage at {} with {} entries",
            snapshot_path.display(),
            tree.len()
        );

        Ok(Self {
            db: Arc::new(RwLock::new(tree)),
            snapshot_path: Some(snapshot_path),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, StateTree> {
        self.db.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StateTree> {
        self.db.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Storage for NativeStorage {
    type RuntimeConfig = Config;

    fn with_config(config: Self::RuntimeConfig) -> Result<Self, anyhow::Error> {
        match config.path {
            Some(path) => Self::with_path(path),
            None => Ok(Self::temporary()),
        }
    }

    fn get(&self, key: &StorageKey) -> Option<StorageValue> {
        self.read()
            .get(key.as_bytes())
            .map(|value| StorageValue::from(value.to_vec()))
    }

    fn get_state_root(&self) -> anyhow::Result<[u8; 32]> {
        Ok(state_root(&self.read()))
    }

    fn validate_and_commit(
        &self,
        state_accesses: OrderedReadsAndWrites,
    ) -> Result<[u8; 32], anyhow::Error> {
        let mut db = self.write();

        for (key, expected) in &state_accesses.ordered_reads {
            let found = db.get(key.key.as_slice()).map(|v| v.as_slice());
            let expected = expected.as_ref().map(|v| v.value.as_slice());
            ensure!(
                found == expected,
                "Stale read for key {}: the committed value changed since it was read",
                key
            );
        }

        let mut updated = db.clone();
        for (key, value) in state_accesses.ordered_writes {
            let key = key.key.to_vec();
            match value {
                Some(value) => {
                    updated.insert(key, value.value);
                }
                None => {
                    updated.remove(&key);
                }
            }
        }

        if let Some(path) = &self.snapshot_path {
            store_snapshot(path, &updated)?;
        }

        let root = state_root(&updated);
        debug!(
            "Committed {} entries, new state root 0x{}",
            updated.len(),
            hex::encode(root)
        );
        *db = updated;
        Ok(root)
    }

    fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

fn state_root(tree: &StateTree) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for (key, value) in tree {
        hasher.update((key.len() as u64).to_le_bytes());
        hasher.update(key);
        hasher.update((value.len() as u64).to_le_bytes());
        hasher.update(value.as_slice());
    }
    hasher.finalize().into()
}

fn load_snapshot(path: &Path) -> Result<StateTree, anyhow::Error> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read state snapshot {}", path.display()))?;
    let snapshot = Snapshot::try_from_slice(&bytes)
        .with_context(|| format!("Corrupted state snapshot {}", path.display()))?;

    Ok(snapshot
        .entries
        .into_iter()
        .map(|(k, v)| (k, Arc::new(v)))
        .collect())
}

fn store_snapshot(path: &Path, tree: &StateTree) -> Result<(), anyhow::Error> {
    let snapshot = Snapshot {
        entries: tree
            .iter()
            .map(|(k, v)| (k.clone(), v.to_vec()))
            .collect(),
    };
    let bytes = snapshot.try_to_vec()?;

    // Write next to the target and rename, so a crash never leaves a torn snapshot.
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, bytes)
        .with_context(|| format!("Failed to write state snapshot {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to replace state snapshot {}", path.display()))?;
    Ok(())
}
