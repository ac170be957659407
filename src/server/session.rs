// Session management for concurrent HTTP clients

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time;
use uuid::Uuid;

use crate::cli::Conversation;

/// Per-session state
#[derive(Debug)]
pub struct SessionState {
    /// Unique session identifier
    pub id: String,
    /// Conversation history for this session
    pub conversation: Conversation,
    /// Last activity timestamp
    pub last_activity: DateTime<Utc>,
    /// Session creation time
    pub created_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(max_messages: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation: Conversation::with_limit(max_messages),
            last_activity: Utc::now(),
            created_at: Utc::now(),
        }
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Check if session has expired
    pub fn is_expired(&self, timeout_minutes: u64) -> bool {
        let elapsed = Utc::now().signed_duration_since(self.last_activity);
        elapsed.num_minutes() >= timeout_minutes as i64
    }
}

/// Shared handle to one session; held locked for the whole of a chat turn
pub type SessionHandle = Arc<Mutex<SessionState>>;

/// Concurrent session manager using DashMap
pub struct SessionManager {
    sessions: Arc<DashMap<String, SessionHandle>>,
    max_sessions: usize,
    timeout_minutes: u64,
    max_messages: usize,
}

impl SessionManager {
    pub fn new(max_sessions: usize, timeout_minutes: u64, max_messages: usize) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            max_sessions,
            timeout_minutes,
            max_messages,
        }
    }

    /// Get or create a session
    ///
    /// An unknown id starts a fresh session with a new id.
    pub fn get_or_create(&self, session_id: Option<&str>) -> anyhow::Result<SessionHandle> {
        if let Some(handle) = session_id.and_then(|id| self.get(id)) {
            return Ok(handle);
        }

        if self.sessions.len() >= self.max_sessions {
            anyhow::bail!(
                "Maximum session limit reached ({}/{})",
                self.sessions.len(),
                self.max_sessions
            );
        }

        let session = SessionState::new(self.max_messages);
        let id = session.id.clone();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.insert(id.clone(), Arc::clone(&handle));

        tracing::info!(session_id = %id, "Created new session");
        Ok(handle)
    }

    /// Look up a session without creating one
    pub fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions
            .get(session_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Delete a session
    ///
    /// A turn already holding the handle still completes; its messages are dropped with it.
    pub fn delete(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Get active session count
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Remove expired sessions, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        remove_expired(&self.sessions, self.timeout_minutes)
    }

    /// Start background cleanup task (requires a Tokio runtime)
    pub fn start_cleanup_task(&self) {
        let sessions = Arc::clone(&self.sessions);
        let timeout_minutes = self.timeout_minutes;

        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(60));

            loop {
                interval.tick().await;
                remove_expired(&sessions, timeout_minutes);
            }
        });
    }
}

/// A locked session is mid-turn and never counts as expired
fn remove_expired(sessions: &DashMap<String, SessionHandle>, timeout_minutes: u64) -> usize {
    let expired: Vec<String> = sessions
        .iter()
        .filter(|entry| {
            entry
                .value()
                .try_lock()
                .map(|session| session.is_expired(timeout_minutes))
                .unwrap_or(false)
        })
        .map(|entry| entry.key().clone())
        .collect();

    let mut removed_count = 0;
    for session_id in expired {
        if sessions.remove(&session_id).is_some() {
            removed_count += 1;
            tracing::debug!(session_id = %session_id, "Removed expired session");
        }
    }

    if removed_count > 0 {
        tracing::info!(
            removed = removed_count,
            active = sessions.len(),
            "Cleaned up expired sessions"
        );
    }

    removed_count
}
