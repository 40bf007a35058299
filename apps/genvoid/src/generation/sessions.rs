use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::session::{GeneratorSession, GeneratorSettings};
use crate::generation::workflow::SharedSession;

struct SessionEntry<S: GeneratorSettings> {
    session: SharedSession<S>,
    last_seen: Instant,
}

/// Live sessions of one generator kind. Removing a session drops its
/// placeholder timers.
#[derive(Clone)]
pub struct SessionStore<S: GeneratorSettings> {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry<S>>>>,
}

impl<S: GeneratorSettings> Default for SessionStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GeneratorSettings> SessionStore<S> {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn create(&self) -> SharedSession<S> {
        let session = GeneratorSession::<S>::new();
        let id = session.id();
        let session = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(
            id,
            SessionEntry {
                session: Arc::clone(&session),
                last_seen: Instant::now(),
            },
        );
        info!("Opened {:?} session {}", S::KIND, id);
        session
    }

    /// Looks a session up and marks it as seen, which keeps it from idling out.
    pub async fn get(&self, id: Uuid) -> Result<SharedSession<S>, AppError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        entry.last_seen = Instant::now();
        Ok(Arc::clone(&entry.session))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!("Closed {:?} session {}", S::KIND, id))
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Drops every session not seen for at least `ttl`. Returns how many went.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = now.duration_since(entry.last_seen) < ttl;
            if !keep {
                info!("Evicted idle {:?} session {}", S::KIND, id);
            }
            keep
        });
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::CoverSettings;

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::<CoverSettings>::new();
        let session = store.create().await;
        let id = session.lock().await.id();

        assert_eq!(store.len().await, 1);
        assert!(Arc::ptr_eq(&store.get(id).await.unwrap(), &session));

        store.remove(id).await.unwrap();
        assert_eq!(store.len().await, 0);
        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(store.remove(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::<CoverSettings>::new();
        let a = store.create().await;
        let b = store.create().await;
        a.lock().await.update_field("prompt", "castle").unwrap();
        assert!(b.lock().await.settings().prompt.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_idle_keeps_recently_seen_sessions() {
        let ttl = Duration::from_secs(60);
        let store = SessionStore::<CoverSettings>::new();
        let stale = store.create().await.lock().await.id();
        let active = store.create().await.lock().await.id();

        tokio::time::sleep(Duration::from_secs(40)).await;
        store.get(active).await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(store.evict_idle(ttl).await, 1);
        assert!(matches!(store.get(stale).await, Err(AppError::NotFound(_))));
        assert!(store.get(active).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_evicted_session_is_dropped() {
        let store = SessionStore::<CoverSettings>::new();
        let weak = Arc::downgrade(&store.create().await);

        tokio::time::sleep(Duration::from_secs(5)).await;
        store.evict_idle(Duration::from_secs(1)).await;

        assert!(weak.upgrade().is_none());
        assert_eq!(store.len().await, 0);
    }
}
