//! Production-grade progression snapshot storage

use async_trait::async_trait;
use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};
use tokio::{
    fs as tokio_fs,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, error, info, instrument};

use crate::data::ProgressionSnapshot;
use crate::error::StorageError;
use crate::types::PlayerId;

const SNAPSHOT_SUFFIX: &str = ".progression.json";

/// Progression storage trait
#[async_trait]
pub trait ProgressionStorage: Send + Sync + std::fmt::Debug {
    /// Load all stored snapshots
    async fn load_all(&self) -> Result<Vec<ProgressionSnapshot>, StorageError>;

    /// Load one player's snapshot, `None` when nothing is stored
    async fn load(&self, player_id: PlayerId) -> Result<Option<ProgressionSnapshot>, StorageError>;

    /// Save a snapshot
    async fn save(&self, snapshot: &ProgressionSnapshot) -> Result<(), StorageError>;

    /// Delete a player's stored snapshot
    async fn delete(&self, player_id: PlayerId) -> Result<(), StorageError>;

    /// Get last modified time for a player's snapshot
    async fn last_modified(&self, player_id: PlayerId) -> Result<SystemTime, StorageError>;
}

/// JSON-based progression storage, one file per player
#[derive(Debug)]
pub struct JsonProgressionStorage {
    data_dir: PathBuf,
}

impl JsonProgressionStorage {
    /// Create a new JSON progression storage
    pub fn new(data_dir: PathBuf) -> Self {
        // Create directory if it doesn't exist
        if !data_dir.exists() {
            if let Err(e) = fs::create_dir_all(&data_dir) {
                error!("Failed to create progression directory: {}", e);
            }
        }

        Self { data_dir }
    }

    /// Get path for a player's snapshot file
    fn snapshot_path(&self, player_id: PlayerId) -> PathBuf {
        self.data_dir
            .join(format!("{}{}", player_id, SNAPSHOT_SUFFIX))
    }

    /// Load a single snapshot file
    #[instrument(skip(self))]
    async fn load_snapshot_file(&self, path: &Path) -> Result<ProgressionSnapshot, StorageError> {
        let mut file = tokio_fs::File::open(path)
            .await
            .map_err(|e| StorageError::FileRead(path.to_path_buf(), e))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .await
            .map_err(|e| StorageError::FileRead(path.to_path_buf(), e))?;

        serde_json::from_str(&contents)
            .map_err(|e| StorageError::Deserialization(path.to_path_buf(), e))
    }
}

#[async_trait]
impl ProgressionStorage for JsonProgressionStorage {
    #[instrument(skip(self))]
    async fn load_all(&self) -> Result<Vec<ProgressionSnapshot>, StorageError> {
        let mut snapshots = Vec::new();
        let mut entries = tokio_fs::read_dir(&self.data_dir)
            .await
            .map_err(|e| StorageError::DirectoryRead(self.data_dir.clone(), e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::DirectoryRead(self.data_dir.clone(), e))?
        {
            let path = entry.path();
            let is_snapshot = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.ends_with(SNAPSHOT_SUFFIX))
                .unwrap_or(false);
            if is_snapshot {
                match self.load_snapshot_file(&path).await {
                    Ok(snapshot) => {
                        debug!("Loaded progression for player {}", snapshot.player_id);
                        snapshots.push(snapshot);
                    }
                    Err(e) => {
                        error!("Failed to load progression from {}: {}", path.display(), e);
                        continue;
                    }
                }
            }
        }

        Ok(snapshots)
    }

    #[instrument(skip(self))]
    async fn load(&self, player_id: PlayerId) -> Result<Option<ProgressionSnapshot>, StorageError> {
        let path = self.snapshot_path(player_id);
        if !path.exists() {
            return Ok(None);
        }
        self.load_snapshot_file(&path).await.map(Some)
    }

    #[instrument(skip(self, snapshot))]
    async fn save(&self, snapshot: &ProgressionSnapshot) -> Result<(), StorageError> {
        let path = self.snapshot_path(snapshot.player_id);
        let temp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| StorageError::Serialization(snapshot.player_id, e))?;

        let mut file = tokio_fs::File::create(&temp_path)
            .await
            .map_err(|e| StorageError::FileCreate(temp_path.clone(), e))?;

        file.write_all(json.as_bytes())
            .await
            .map_err(|e| StorageError::FileWrite(temp_path.clone(), e))?;

        file.sync_all()
            .await
            .map_err(|e| StorageError::FileSync(temp_path.clone(), e))?;

        // Atomic rename
        tokio_fs::rename(&temp_path, &path)
            .await
            .map_err(|e| StorageError::FileRename(temp_path, path.clone(), e))?;

        info!("Saved progression for player {}", snapshot.player_id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, player_id: PlayerId) -> Result<(), StorageError> {
        let path = self.snapshot_path(player_id);
        if path.exists() {
            tokio_fs::remove_file(&path)
                .await
                .map_err(|e| StorageError::FileDelete(path, e))?;
            info!("Deleted progression for player {}", player_id);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn last_modified(&self, player_id: PlayerId) -> Result<SystemTime, StorageError> {
        let path = self.snapshot_path(player_id);
        let metadata = tokio_fs::metadata(&path)
            .await
            .map_err(|e| StorageError::FileMetadata(path.clone(), Box::new(e)))?;
        metadata
            .modified()
            .map_err(|e| StorageError::FileMetadata(path, Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_snapshot() -> ProgressionSnapshot {
        let mut earned = BTreeMap::new();
        earned.insert("first_blood".to_string(), 1);
        let mut statistics = BTreeMap::new();
        statistics.insert("mobs_slain".to_string(), 17);
        ProgressionSnapshot {
            player_id: PlayerId::new(),
            earned,
            statistics,
        }
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = JsonProgressionStorage::new(dir.path().to_path_buf());
        let snapshot = sample_snapshot();

        storage.save(&snapshot).await.expect("save should succeed");
        let loaded = storage
            .load(snapshot.player_id)
            .await
            .expect("load should succeed")
            .expect("snapshot should exist");

        assert_eq!(loaded.player_id, snapshot.player_id);
        assert_eq!(loaded.earned.get("first_blood"), Some(&1));
        assert_eq!(loaded.statistics.get("mobs_slain"), Some(&17));
    }

    #[tokio::test]
    async fn test_load_missing_player_returns_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = JsonProgressionStorage::new(dir.path().to_path_buf());
        let loaded = storage.load(PlayerId::new()).await.expect("load should succeed");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_load_all_skips_foreign_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = JsonProgressionStorage::new(dir.path().to_path_buf());

        storage.save(&sample_snapshot()).await.expect("save");
        storage.save(&sample_snapshot()).await.expect("save");
        std::fs::write(dir.path().join("notes.txt"), "not a snapshot").expect("write");

        let all = storage.load_all().await.expect("load_all should succeed");
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = JsonProgressionStorage::new(dir.path().to_path_buf());
        let mut snapshot = sample_snapshot();

        storage.save(&snapshot).await.expect("save");
        snapshot.statistics.insert("mobs_slain".to_string(), 18);
        storage.save(&snapshot).await.expect("save");

        let loaded = storage
            .load(snapshot.player_id)
            .await
            .expect("load")
            .expect("snapshot should exist");
        assert_eq!(loaded.statistics.get("mobs_slain"), Some(&18));
    }

    #[tokio::test]
    async fn test_delete_removes_snapshot() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = JsonProgressionStorage::new(dir.path().to_path_buf());
        let snapshot = sample_snapshot();

        storage.save(&snapshot).await.expect("save");
        storage.delete(snapshot.player_id).await.expect("delete");
        assert!(storage.load(snapshot.player_id).await.expect("load").is_none());

        // Deleting a missing snapshot is a no-op
        storage.delete(snapshot.player_id).await.expect("delete again");
    }

    #[tokio::test]
    async fn test_last_modified_reports_for_saved_snapshot() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = JsonProgressionStorage::new(dir.path().to_path_buf());
        let snapshot = sample_snapshot();

        assert!(storage.last_modified(snapshot.player_id).await.is_err());
        storage.save(&snapshot).await.expect("save");
        let modified = storage
            .last_modified(snapshot.player_id)
            .await
            .expect("metadata should exist");
        assert!(modified <= SystemTime::now());
    }
}
