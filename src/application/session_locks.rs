//! Per-session mutual exclusion for read-modify-write sequences.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::SessionId;

/// Registry of async locks keyed by session id.
///
/// Acquiring waits for any holder on the same session; different sessions
/// never contend. Entries nobody holds or waits on are pruned on each
/// acquire.
#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    locks: Arc<Mutex<HashMap<SessionId, Arc<AsyncMutex<()>>>>>,
}

/// Held for the duration of one session's critical section.
#[derive(Debug)]
pub struct SessionGuard {
    _guard: OwnedMutexGuard<()>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, session_id: SessionId) -> SessionGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(session_id).or_default())
        };
        SessionGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of sessions currently tracked.
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
