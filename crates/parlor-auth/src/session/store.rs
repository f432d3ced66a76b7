//! In-memory session store on moka.

use std::time::Duration;

use moka::future::Cache;
use tracing::debug;
use uuid::Uuid;

use parlor_core::config::SessionConfig;

use super::model::SessionData;

/// Sessions keyed by an opaque random id. Entries expire after the
/// configured idle time; every read or write refreshes the timer.
#[derive(Debug, Clone)]
pub struct SessionStore {
    cache: Cache<String, SessionData>,
    expiration: Duration,
}

impl SessionStore {
    /// Build a store from session configuration.
    pub fn new(config: &SessionConfig) -> Self {
        let expiration = Duration::from_secs(config.expiration_minutes * 60);
        let cache = Cache::builder()
            .max_capacity(config.max_sessions)
            .time_to_idle(expiration)
            .build();

        Self { cache, expiration }
    }

    /// Idle lifetime of a session, also used as the cookie `Max-Age`.
    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    /// Look up a live session.
    pub async fn load(&self, id: &str) -> Option<SessionData> {
        self.cache.get(id).await
    }

    /// Persist `data`, minting a new id when `id` is `None`. Returns the id.
    pub async fn save(&self, id: Option<String>, data: SessionData) -> String {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        self.cache.insert(id.clone(), data).await;
        debug!(session_id = %id, "Session saved");
        id
    }

    /// Drop a session.
    pub async fn destroy(&self, id: &str) {
        self.cache.invalidate(id).await;
        debug!(session_id = %id, "Session destroyed");
    }
}
