use std::{collections::HashMap, sync::Arc, time::{Duration, Instant}};

use relay_viewer_lib::track::Track;
use tokio::sync::Mutex;

struct CachedTracks {
    loaded_at: Instant,
    tracks: Arc<Vec<Track>>,
}

/// Tracks loaded this session, per relay directory, expiring after a ttl.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, CachedTracks>>>,
}

impl MemoryCache {
    pub async fn get(&self, directory: &str, ttl: Duration) -> Option<Arc<Vec<Track>>> {
        let mut entries = self.entries.lock().await;

        let expired = entries.get(directory)?.loaded_at.elapsed() >= ttl;
        if expired {
            entries.remove(directory);
            return None;
        }

        entries.get(directory).map(|cached| cached.tracks.clone())
    }

    pub async fn insert(&self, directory: String, tracks: Arc<Vec<Track>>) {
        let mut entries = self.entries.lock().await;
        entries.insert(directory, CachedTracks {
            loaded_at: Instant::now(),
            tracks,
        });
    }

    /// Drops every entry, returns how many there were.
    pub async fn invalidate(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let count = entries.len();
        entries.clear();
        count
    }
}
