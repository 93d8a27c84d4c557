use crate::tracker::session::SessionHandle;
use crate::types::source::ReplayTrack;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct AppState {
    sources: Arc<DashMap<String, StoredSource>>,
    sessions: Arc<DashMap<String, StoredSession>>,
}

struct StoredSource {
    track: Arc<ReplayTrack>,
    inserted_at: Instant,
}

struct StoredSession {
    handle: SessionHandle,
    started_at: Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            sources: Arc::new(DashMap::new()),
            sessions: Arc::new(DashMap::new()),
        }
    }

    pub fn insert_source(&self, source_id: String, track: Arc<ReplayTrack>) {
        self.sources.insert(
            source_id,
            StoredSource {
                track,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn source(&self, source_id: &str) -> Option<Arc<ReplayTrack>> {
        self.sources.get(source_id).map(|entry| entry.track.clone())
    }

    pub fn insert_session(&self, session_id: String, handle: SessionHandle) {
        self.sessions.insert(
            session_id,
            StoredSession {
                handle,
                started_at: Instant::now(),
            },
        );
    }

    /// Clones the handle out so no map shard stays locked across awaits.
    pub fn session(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.handle.clone())
    }

    pub fn evict_expired(&self, ttl: Duration) {
        let now = Instant::now();
        self.sources
            .retain(|_, source| now.duration_since(source.inserted_at) < ttl);
        self.sessions.retain(|_, session| {
            session.handle.snapshot().active || now.duration_since(session.started_at) < ttl
        });
        tracing::info!(
            "Eviction complete. {} sources, {} sessions retained",
            self.sources.len(),
            self.sessions.len()
        );
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
