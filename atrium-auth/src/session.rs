//! Session state and the in-memory session store
//!
//! A session is per-connection mutable state carrying identity and permission
//! data across a request's lifetime. The store hands out shared handles keyed
//! by session id; only the owning request's middleware chain mutates a
//! session, through the handle's write lock.

use crate::types::PermissionEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Per-connection session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub id: String,
    /// User id, if one has been established
    pub user_id: Option<i64>,
    /// Affiliate scope marker; absence triggers the bootstrap path
    pub affiliate: Option<String>,
    /// Roles recorded on this session
    pub roles: Vec<String>,
    /// Permission list fetched from the authorization service
    pub permissions: Vec<PermissionEntry>,
    /// Session creation and activity timestamps
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: None,
            affiliate: None,
            roles: Vec::new(),
            permissions: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    /// Update the last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Whether this session records the given role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Record a role if not already present
    pub fn grant_role(&mut self, role: &str) {
        if !self.has_role(role) {
            self.roles.push(role.to_string());
        }
    }

    /// Session age in minutes
    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.created_at).num_minutes()
    }

    /// Whether the session has been inactive longer than the given timeout
    pub fn is_stale(&self, timeout_minutes: u32) -> bool {
        (Utc::now() - self.last_activity).num_minutes() > timeout_minutes as i64
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a session
pub type SessionHandle = Arc<RwLock<Session>>;

/// In-memory session store
///
/// Sessions are created at session start by the transport layer and destroyed
/// when purged as stale.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    timeout_minutes: u32,
}

impl SessionStore {
    pub fn new(timeout_minutes: u32) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            timeout_minutes,
        }
    }

    /// Create a fresh session and return its id and handle
    pub async fn create(&self) -> (String, SessionHandle) {
        let session = Session::new();
        let id = session.id.clone();
        let handle = Arc::new(RwLock::new(session));

        self.sessions.write().await.insert(id.clone(), handle.clone());
        debug!(session_id = %id, "Created session");

        (id, handle)
    }

    /// Look up a session by id
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Resolve a session from an optional id, creating one when the id is
    /// absent or no longer known. Returns the id, the handle, and whether a
    /// new session was created.
    pub async fn resolve(&self, id: Option<&str>) -> (String, SessionHandle, bool) {
        if let Some(id) = id {
            if let Some(handle) = self.get(id).await {
                handle.write().await.touch();
                return (id.to_string(), handle, false);
            }
        }

        let (id, handle) = self.create().await;
        (id, handle, true)
    }

    /// Remove sessions that exceeded the inactivity timeout
    ///
    /// Staleness is evaluated on a snapshot of the handles, never while
    /// holding the map lock: a request's gate chain may hold its session
    /// guard across a remote call, and that must not stall session
    /// resolution for everyone else. Sessions whose guard is busy are
    /// skipped and picked up on a later run.
    pub async fn purge_stale(&self) -> usize {
        let snapshot: Vec<(String, SessionHandle)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, handle)| (id.clone(), handle.clone()))
            .collect();

        let mut stale = Vec::new();
        for (id, handle) in snapshot {
            if let Ok(session) = handle.try_read() {
                if session.is_stale(self.timeout_minutes) {
                    stale.push(id);
                }
            }
        }

        if stale.is_empty() {
            return 0;
        }

        let mut sessions = self.sessions.write().await;
        let mut purged = 0;
        for id in &stale {
            if sessions.remove(id).is_some() {
                purged += 1;
                debug!(session_id = %id, "Purged stale session");
            }
        }

        purged
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
