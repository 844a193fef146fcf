//! Session manager: hosts several independent tables side by side.

use std::collections::HashMap;

use spyfall_types::SessionId;

use crate::{SessionConfig, SessionError, SessionHandle, SessionPhase};

/// Manages all hosted sessions, keyed by [`SessionId`].
///
/// Each session is its own actor with its own clock; nothing is shared
/// between tables.
pub struct SessionManager {
    sessions: HashMap<SessionId, SessionHandle>,
    config: SessionConfig,
    next_id: u64,
}

impl SessionManager {
    /// Creates an empty manager; every session spawns with `config`.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
            next_id: 1,
        }
    }

    /// Spawns a new session in Setup and returns its ID.
    pub fn create_session(&mut self) -> SessionId {
        let session_id = SessionId(self.next_id);
        self.next_id += 1;
        let handle = SessionHandle::spawn(session_id, self.config.clone());
        self.sessions.insert(session_id, handle);
        tracing::info!(%session_id, "session created");
        session_id
    }

    /// A handle to talk to one session.
    pub fn get(&self, session_id: SessionId) -> Result<&SessionHandle, SessionError> {
        self.sessions
            .get(&session_id)
            .ok_or(SessionError::NotFound(session_id))
    }

    /// Shuts a session down and forgets it.
    pub async fn destroy_session(&mut self, session_id: SessionId) -> Result<(), SessionError> {
        let handle = self
            .sessions
            .remove(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;

        let _ = handle.shutdown().await;

        tracing::info!(%session_id, "session destroyed");
        Ok(())
    }

    /// IDs of sessions currently in the given phase.
    ///
    /// Sessions that fail to respond (e.g. shutting down) are skipped.
    pub async fn sessions_in(&self, phase: SessionPhase) -> Vec<SessionId> {
        let mut ids = Vec::new();
        for (id, handle) in &self.sessions {
            if let Ok(snapshot) = handle.snapshot().await {
                if snapshot.phase == phase {
                    ids.push(*id);
                }
            }
        }
        ids.sort_by_key(|id| id.0);
        ids
    }

    /// Number of sessions being hosted.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// IDs of every hosted session, in no particular order.
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.keys().copied().collect()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
