//! In-memory session registry.
//!
//! Each browser session owns one [`ProfileStore`]. Sessions are never persisted. A session
//! ends when it is deleted or when it has been idle for longer than the registry's idle
//! timeout; expired sessions are evicted on the next access.

use ausome_core::ProfileStore;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Idle time after which a session is evicted, unless configured otherwise.
pub const DEFAULT_IDLE_TIMEOUT_MINS: u32 = 60;

#[derive(Clone, Debug)]
pub struct Session {
    pub profile: ProfileStore,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Last time the session was read or written.
    pub last_seen: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            profile: ProfileStore::new(),
            created_at: now,
            updated_at: now,
            last_seen: now,
        }
    }

    fn is_expired(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        now - self.last_seen > idle_timeout
    }
}

#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_idle_minutes(DEFAULT_IDLE_TIMEOUT_MINS)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose sessions expire after `minutes` without activity.
    pub fn with_idle_minutes(minutes: u32) -> Self {
        Self {
            sessions: Arc::default(),
            idle_timeout: Duration::minutes(i64::from(minutes)),
        }
    }

    /// Opens a session with a default profile.
    ///
    /// Expired sessions are swept first, so abandoned sessions do not accumulate.
    pub fn create(&self) -> (Uuid, Session) {
        let id = Uuid::new_v4();
        let session = Session::new();
        let mut sessions = self.lock();
        let swept = self.sweep(&mut sessions, session.created_at);
        sessions.insert(id, session.clone());
        tracing::info!(session_id = %id, swept, "created session");
        (id, session)
    }

    /// Snapshot of a live session, if it exists.
    pub fn get(&self, id: Uuid) -> Option<Session> {
        self.with_session(id, |session| session.clone())
    }

    /// Runs `f` against a live session while holding the registry lock.
    ///
    /// The closure must not block; it runs under a synchronous mutex.
    pub fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let now = Utc::now();
        let mut sessions = self.lock();
        if sessions
            .get(&id)
            .is_some_and(|session| session.is_expired(now, self.idle_timeout))
        {
            sessions.remove(&id);
            tracing::info!(session_id = %id, "expired idle session");
            return None;
        }
        sessions.get_mut(&id).map(|session| {
            session.last_seen = now;
            f(session)
        })
    }

    /// Ends a session. Returns `false` if it did not exist.
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self.lock().remove(&id).is_some();
        if removed {
            tracing::info!(session_id = %id, "removed session");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn sweep(&self, sessions: &mut HashMap<Uuid, Session>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.idle_timeout));
        before - sessions.len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        // Profiles are only written after validation, so a poisoned map is still consistent.
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
