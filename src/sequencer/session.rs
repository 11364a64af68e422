//! Playback sessions.
//!
//! Every successful start of a track opens a new session. Background work
//! spawned for a session holds a `SessionToken` and stops as soon as the
//! token is no longer current; events it produced are discarded the same way.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

#[cfg(test)]
impl SessionId {
    pub(crate) fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of session ids; clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct Sessions {
    current: Arc<AtomicU64>,
}

impl Sessions {
    /// Open a new session, superseding the previous one.
    pub fn begin(&self) -> SessionToken {
        let id = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        SessionToken {
            id: SessionId(id),
            current: self.current.clone(),
        }
    }

    /// Supersede the current session without opening a new one.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, id: SessionId) -> bool {
        self.current.load(Ordering::SeqCst) == id.0
    }
}

/// Handle held by work belonging to one session.
#[derive(Debug, Clone)]
pub struct SessionToken {
    id: SessionId,
    current: Arc<AtomicU64>,
}

impl SessionToken {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.id.0
    }
}
