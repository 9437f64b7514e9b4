use std::{io::ErrorKind, path::PathBuf};

use relay_viewer_lib::track::Track;
use sha2::{Digest, Sha256};

use crate::DataManagerError;

const CACHE_FILE_EXTENSION: &str = "bin";

/**
 * DiskCache memoizes loaded tracks as bincode blobs, one file per cache key.
 * Reads are best effort: anything unreadable counts as a miss.
 */
#[derive(Clone, Debug)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, DataManagerError> {
        let dir = dir.into();
        if !dir.exists() {
            tokio::fs::create_dir_all(&dir).await
                .map_err(|_| DataManagerError::Cache(format!("Failed to create cache directory: {:?}", dir)))?;
        }

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Hex SHA-256 of the directory name, plus the sorted segments when given.
    pub fn key(directory: &str, segments: Option<&[u32]>) -> String {
        let mut key = directory.to_string();
        if let Some(segments) = segments.filter(|s| !s.is_empty()) {
            let mut sorted = segments.to_vec();
            sorted.sort_unstable();
            let joined = sorted.iter().map(u32::to_string).collect::<Vec<_>>().join("-");
            key.push('_');
            key.push_str(&joined);
        }

        hex::encode(Sha256::digest(key.as_bytes()))
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, CACHE_FILE_EXTENSION))
    }

    pub async fn load(&self, key: &str) -> Option<Vec<Track>> {
        let path = self.path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!("Failed to read cache file {:?}: {}", path, err);
                return None;
            }
        };

        match bincode::deserialize::<Vec<Track>>(&bytes) {
            Ok(tracks) if tracks.is_empty() => None,
            Ok(tracks) => Some(tracks),
            Err(err) => {
                tracing::warn!("Ignoring corrupt cache file {:?}: {}", path, err);
                None
            }
        }
    }

    pub async fn store(&self, key: &str, tracks: &[Track]) -> Result<(), DataManagerError> {
        let bytes = bincode::serialize(tracks)
            .map_err(|_| DataManagerError::Cache("Failed to serialize tracks".to_string()))?;

        let path = self.path(key);
        tokio::fs::write(&path, bytes).await
            .map_err(|_| DataManagerError::Cache(format!("Failed to write cache file: {:?}", path)))
    }

    /// Deletes every cache file, returns how many were removed.
    pub async fn clear(&self) -> Result<usize, DataManagerError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await
            .map_err(|_| DataManagerError::Cache(format!("Failed to read cache directory: {:?}", self.dir)))?;

        let mut removed = 0;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(CACHE_FILE_EXTENSION) {
                continue;
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(err) => tracing::error!("Failed to delete cache file {:?}: {}", path, err),
            }
        }

        Ok(removed)
    }
}
