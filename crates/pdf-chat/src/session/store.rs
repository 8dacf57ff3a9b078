//! Registry of live sessions

use chrono::{Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::error::{Error, Result};

use super::context::SessionContext;

/// Shared handle to one session; holding the lock serializes its operations
pub type SessionHandle = Arc<Mutex<SessionContext>>;

/// Exclusive access to a session that is still registered
pub type SessionGuard = OwnedMutexGuard<SessionContext>;

/// Concurrent map of session id to session state
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionHandle>,
    max_messages: usize,
}

impl SessionStore {
    pub fn new(max_messages: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_messages,
        }
    }

    /// Start a new empty session
    pub fn create(&self) -> Uuid {
        let context = SessionContext::new(self.max_messages);
        let id = context.id;
        self.sessions.insert(id, Arc::new(Mutex::new(context)));
        tracing::info!("Session {} started ({} active)", id, self.sessions.len());
        id
    }

    pub fn get(&self, id: &Uuid) -> Result<SessionHandle> {
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(Error::SessionNotFound(*id))
    }

    /// Lock a session for the duration of one operation.
    ///
    /// Fails with `SessionNotFound` when the session was removed or evicted
    /// while waiting for the lock.
    pub async fn lock(&self, id: &Uuid) -> Result<SessionGuard> {
        let handle = self.get(id)?;
        self.lock_handle(id, handle).await
    }

    async fn lock_handle(&self, id: &Uuid, handle: SessionHandle) -> Result<SessionGuard> {
        let mut guard = Arc::clone(&handle).lock_owned().await;

        let registered = self
            .sessions
            .get(id)
            .map(|entry| Arc::ptr_eq(entry.value(), &handle))
            .unwrap_or(false);
        if !registered {
            return Err(Error::SessionNotFound(*id));
        }

        guard.touch();
        Ok(guard)
    }

    /// End a session, discarding its index and memory
    pub fn remove(&self, id: &Uuid) -> Result<()> {
        if self.sessions.remove(id).is_none() {
            return Err(Error::SessionNotFound(*id));
        }
        tracing::info!("Session {} ended", id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions idle for longer than `max_idle`. Sessions in use (lock
    /// held) are skipped. Returns the number evicted.
    pub fn evict_idle(&self, max_idle: std::time::Duration) -> usize {
        let max_idle = ChronoDuration::from_std(max_idle).unwrap_or_else(|_| ChronoDuration::days(36_500));
        let now = Utc::now();
        let before = self.sessions.len();

        self.sessions.retain(|id, handle| match handle.try_lock() {
            Ok(ctx) => {
                let keep = now.signed_duration_since(ctx.last_active) <= max_idle;
                if !keep {
                    tracing::info!("Session {} evicted after inactivity", id);
                }
                keep
            }
            Err(_) => true,
        });

        before.saturating_sub(self.sessions.len())
    }
}
