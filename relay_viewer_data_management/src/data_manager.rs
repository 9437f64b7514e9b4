use std::{path::{Path, PathBuf}, sync::Arc, time::Duration};

use futures::{StreamExt, stream};
use relay_viewer_lib::{settings::Settings, track::{FullTrackPoint, Track}};
use tokio::sync::RwLock;

use crate::{
    cache::{DiskCache, MemoryCache},
    discovery::{self, RelayDirectory},
    gpx_util, DataManagerError, CACHE_DIR, DATA_DIR,
};

#[derive(Clone)]
pub struct DataManager {
    base_dir: PathBuf,
    pub(crate) disk_cache: DiskCache,
    pub(crate) memory_cache: MemoryCache,
    settings: Arc<RwLock<Settings>>,
}

/// The public interface for all relay track data.
impl DataManager {
    /// Relay directories are looked up under `data/` in the project root.
    pub async fn start() -> Result<Self, DataManagerError> {
        let root = project_root::get_project_root()
            .map_err(|err| DataManagerError::Io(format!("Failed to locate project root: {}", err)))?;

        Self::with_paths(root.join(DATA_DIR), root.join(CACHE_DIR)).await
    }

    pub async fn with_paths(base_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Result<Self, DataManagerError> {
        let base_dir = base_dir.into();
        if !base_dir.exists() {
            std::fs::create_dir_all(&base_dir)
                .map_err(|_| DataManagerError::Io(format!("Failed to create data directory: {:?}", base_dir)))?;
        }

        let disk_cache = DiskCache::open(cache_dir).await?;
        tracing::info!("Serving relay directories from {:?}, cache in {:?}", base_dir, disk_cache.dir());

        Ok(DataManager {
            base_dir,
            disk_cache,
            memory_cache: MemoryCache::default(),
            settings: Arc::new(RwLock::new(Settings::default())),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    pub async fn set_settings(&self, settings: Settings) -> Settings {
        let settings = settings.clamped();
        *self.settings.write().await = settings.clone();
        settings
    }

    pub fn directories(&self) -> Result<Vec<RelayDirectory>, DataManagerError> {
        discovery::discover_directories(&self.base_dir)
    }

    fn resolve_directory(&self, directory: &str) -> Result<PathBuf, DataManagerError> {
        if !discovery::is_relay_dir_name(directory) {
            return Err(DataManagerError::MissingDirectory(directory.to_string()));
        }

        let path = self.base_dir.join(directory);
        if !path.is_dir() {
            return Err(DataManagerError::MissingDirectory(directory.to_string()));
        }

        Ok(path)
    }

    /// All tracks of a relay directory, sorted by segment.
    ///
    /// Looks in the session cache, then the disk cache, and only then parses the files.
    pub async fn load_tracks(&self, directory: &str) -> Result<Arc<Vec<Track>>, DataManagerError> {
        if !discovery::is_relay_dir_name(directory) {
            return Err(DataManagerError::MissingDirectory(directory.to_string()));
        }

        let settings = self.settings().await;
        let ttl = Duration::from_secs(settings.cache_ttl_secs);
        if let Some(tracks) = self.memory_cache.get(directory, ttl).await {
            return Ok(tracks);
        }

        let key = DiskCache::key(directory, None);
        if let Some(tracks) = self.disk_cache.load(&key).await {
            tracing::debug!("Loaded {} tracks of {} from disk cache", tracks.len(), directory);
            let tracks = Arc::new(tracks);
            self.memory_cache.insert(directory.to_string(), tracks.clone()).await;
            return Ok(tracks);
        }

        let path = self.resolve_directory(directory)?;
        let files = discovery::list_track_files(&path)?;
        if files.is_empty() {
            tracing::warn!("No GPX file found in {:?}", path);
            return Err(DataManagerError::NoTracks(directory.to_string()));
        }

        let file_count = files.len();
        let tracks = read_tracks_parallel(files, settings.max_workers).await;
        if tracks.is_empty() {
            return Err(DataManagerError::NoTracks(directory.to_string()));
        }
        tracing::info!("Parsed {}/{} track files of {}", tracks.len(), file_count, directory);

        if let Err(err) = self.disk_cache.store(&key, &tracks).await {
            tracing::warn!("Failed to cache tracks of {}: {}", directory, err);
        }

        let tracks = Arc::new(tracks);
        self.memory_cache.insert(directory.to_string(), tracks.clone()).await;
        Ok(tracks)
    }

    pub async fn get_track(&self, directory: &str, segment: u32) -> Result<Track, DataManagerError> {
        self.load_tracks(directory)
            .await?
            .iter()
            .find(|track| track.segment == segment)
            .cloned()
            .ok_or(DataManagerError::UnknownSegment(segment))
    }

    /// The unsampled points of a segment, read straight from its file.
    pub async fn get_full_track(&self, directory: &str, segment: u32) -> Result<Vec<FullTrackPoint>, DataManagerError> {
        let file = self.get_track(directory, segment).await?.file;
        tokio::task::spawn_blocking(move || gpx_util::read_full_track(&file))
            .await
            .map_err(|err| DataManagerError::Io(format!("Reader task failed: {}", err)))?
    }

    /// Deletes the disk cache and forgets everything loaded this session.
    pub async fn clear_cache(&self) -> Result<usize, DataManagerError> {
        let removed = self.disk_cache.clear().await?;
        let dropped = self.memory_cache.invalidate().await;
        tracing::info!("Cleared {} cache files and {} session entries", removed, dropped);
        Ok(removed)
    }

    /// Forgets the session cache so data is reloaded on next access.
    pub async fn reload(&self) -> usize {
        let dropped = self.memory_cache.invalidate().await;
        tracing::info!("Dropped {} session cache entries", dropped);
        dropped
    }
}

/// Parses the files on at most `max_workers` blocking tasks.
///
/// Files that fail to parse are logged and skipped. The result is sorted by segment.
pub async fn read_tracks_parallel(files: Vec<PathBuf>, max_workers: usize) -> Vec<Track> {
    let mut tracks: Vec<Track> = stream::iter(files)
        .map(|path| async move {
            let reader_path = path.clone();
            match tokio::task::spawn_blocking(move || gpx_util::read_track(&reader_path)).await {
                Ok(Ok(track)) => Some(track),
                Ok(Err(err)) => {
                    tracing::warn!("Skipping {:?}: {}", path, err);
                    None
                }
                Err(err) => {
                    tracing::error!("Reader task for {:?} failed: {}", path, err);
                    None
                }
            }
        })
        .buffer_unordered(max_workers.max(1))
        .filter_map(futures::future::ready)
        .collect()
        .await;

    tracks.sort_by_key(|track| track.segment);
    tracks
}
