// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::error::{PersistenceError, Result};
use crate::record;
use capymon_core::{Commitment, CommitmentStore, StoreError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "commit";

/// One framed record per arena under a directory. Writes go to a temp file
/// that is renamed over the target, so a crash leaves either the old or the
/// new commitment, never a torn one.
#[derive(Debug, Clone)]
pub struct FileCommitmentStore {
    dir: PathBuf,
}

impl FileCommitmentStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, arena_id: &str) -> PathBuf {
        let name: String = arena_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        self.dir.join(format!("{}.{}", name, EXTENSION))
    }

    fn write(&self, commitment: &Commitment) -> Result<()> {
        let path = self.path_for(&commitment.arena_id);
        let tmp_path = path.with_extension("tmp");
        let bytes = record::encode(commitment)?;
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_data()?;
        }
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Option<Commitment>> {
        match fs::read(path) {
            Ok(bytes) => record::decode(&bytes).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::IoError(e)),
        }
    }
}

impl CommitmentStore for FileCommitmentStore {
    fn save(&self, commitment: &Commitment) -> std::result::Result<(), StoreError> {
        self.write(commitment)
            .map_err(|e| e.into_store_error(&commitment.arena_id))
    }

    fn load(&self, arena_id: &str) -> std::result::Result<Option<Commitment>, StoreError> {
        let found = self
            .read(&self.path_for(arena_id))
            .map_err(|e| e.into_store_error(arena_id))?;
        // Sanitized file names can collide; the record carries the real key.
        Ok(found.filter(|c| c.arena_id == arena_id))
    }

    fn clear(&self, arena_id: &str) -> std::result::Result<(), StoreError> {
        match fs::remove_file(self.path_for(arena_id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    fn list(&self) -> std::result::Result<Vec<Commitment>, StoreError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::Io(e.to_string()))?;
        let mut all = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::Io(e.to_string()))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let key = path.display().to_string();
            if let Some(c) = self.read(&path).map_err(|e| e.into_store_error(&key))? {
                all.push(c);
            }
        }
        all.sort_by(|a, b| a.arena_id.cmp(&b.arena_id));
        Ok(all)
    }
}
