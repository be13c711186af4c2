//! Session store - conversation context keyed by session id
//!
//! Each session owns its own [`SessionContext`]; requests copy it out, run
//! the conversation logic and save it back. Sessions idle for longer than the
//! configured ttl are treated as fresh and evicted by the cleanup job.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::models::SessionContext;

#[derive(Debug, Clone)]
struct SessionEntry {
    context: SessionContext,
    last_seen: DateTime<Utc>,
}

/// In-memory session storage
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Start a new empty session and return its id
    pub fn create(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.save(&id, SessionContext::new());
        id
    }

    /// Check whether a live session exists for `id`
    pub fn contains(&self, id: &str) -> bool {
        self.sessions
            .get(id)
            .map(|entry| !self.is_expired(&entry))
            .unwrap_or(false)
    }

    /// Copy of the session context, empty if missing or expired
    pub fn load(&self, id: &str) -> SessionContext {
        match self.sessions.get(id) {
            Some(entry) if !self.is_expired(&entry) => entry.context.clone(),
            _ => SessionContext::new(),
        }
    }

    /// Store the context and mark the session as active
    pub fn save(&self, id: &str, context: SessionContext) {
        self.sessions.insert(
            id.to_string(),
            SessionEntry {
                context,
                last_seen: Utc::now(),
            },
        );
    }

    /// Clear the context but keep the session alive
    pub fn reset(&self, id: &str) {
        self.save(id, SessionContext::new());
    }

    /// Forget a session entirely
    pub fn remove(&self, id: &str) {
        self.sessions.remove(id);
    }

    /// Evict idle sessions, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        let cutoff = Utc::now() - self.ttl;
        self.sessions.retain(|_, entry| entry.last_seen > cutoff);
        before.saturating_sub(self.sessions.len())
    }

    /// Idle lifetime of a session
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn is_expired(&self, entry: &SessionEntry) -> bool {
        Utc::now() - entry.last_seen > self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let store = SessionStore::new(30);
        let id = store.create();
        assert!(store.contains(&id));

        let mut ctx = store.load(&id);
        ctx.remember_artist("arijit singh");
        store.save(&id, ctx.clone());

        assert_eq!(store.load(&id), ctx);
        assert_eq!(store.load("unknown"), SessionContext::new());
    }

    #[test]
    fn test_reset_and_remove() {
        let store = SessionStore::new(30);
        let id = store.create();

        let mut ctx = SessionContext::new();
        ctx.remember_album("balidan");
        store.save(&id, ctx);

        store.reset(&id);
        assert!(store.contains(&id));
        assert_eq!(store.load(&id), SessionContext::new());

        store.remove(&id);
        assert!(!store.contains(&id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_expired_sessions_are_fresh_and_purged() {
        let store = SessionStore::new(-1);
        let id = store.create();

        let mut ctx = SessionContext::new();
        ctx.remember_artist("arijit singh");
        store.save(&id, ctx);

        assert!(!store.contains(&id));
        assert_eq!(store.load(&id), SessionContext::new());
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 0);
    }
}
