//! Session registry for the chat relay
//!
//! Owns every per-session transcript; create, read, append, and clear all
//! go through here so same-session mutations stay serialized

use crate::error::AppError;
use crate::session::transcript::{Role, Transcript, Turn};
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Configuration for per-session transcripts
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Seed system turn text for every new transcript
    pub system_prompt: String,
    /// Exchange-turn ceiling; live length never exceeds this plus the seed turn
    pub max_exchange_turns: usize,
}

/// In-memory registry mapping session identifiers to transcripts.
///
/// The registry exclusively owns all transcripts; reads hand out clones. A
/// single registry-wide lock serializes mutations. Store operations perform
/// no I/O, so the lock is never held across a completion-API await.
pub struct SessionStore {
    config: SessionConfig,
    sessions: Arc<RwLock<HashMap<String, Transcript>>>,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Return a snapshot of the session's transcript, creating and seeding
    /// it first if the identifier has never been seen.
    ///
    /// Creation is a single map-entry operation under the write lock, so a
    /// concurrent create or clear for the same identifier resolves to either
    /// a fresh or an existing transcript, never a partial one.
    pub async fn get_or_create(&self, session_id: &str) -> Transcript {
        {
            let sessions = self.sessions.read().await;
            if let Some(transcript) = sessions.get(session_id) {
                return transcript.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Transcript::new(self.config.system_prompt.clone()))
            .clone()
    }

    /// Append a turn to an existing session's transcript, then trim it to
    /// the configured ceiling.
    ///
    /// The transcript must already exist (`get_or_create` first); appending
    /// to an unknown identifier is a caller bug surfaced as `SessionNotFound`
    /// rather than a panic.
    pub async fn append(
        &self,
        session_id: &str,
        role: Role,
        text: impl Into<String>,
    ) -> Result<()> {
        let mut sessions = self.sessions.write().await;

        let transcript = sessions
            .get_mut(session_id)
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?;

        transcript.append(Turn::new(role, text));
        transcript.trim_to_ceiling(self.config.max_exchange_turns);

        Ok(())
    }

    /// Remove the session's transcript entirely.
    ///
    /// Unknown identifiers error with `SessionNotFound` and leave the
    /// registry unchanged.
    pub async fn clear(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;

        sessions
            .remove(session_id)
            .map(|_| ())
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))
    }
}
