//! In-memory session store and cookie mechanics
//!
//! Sessions live in process memory and expire after a period of inactivity.
//! The cookie only carries an opaque id; the linked access credential never
//! leaves the server.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderMap};
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use linkgate_core::{AccessCredential, Session};

pub const SESSION_COOKIE: &str = "linkgate_sid";

/// Idle time after which a session is dropped
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

struct StoredSession {
    session: Session,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, StoredSession>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live session and refresh its idle timer
    ///
    /// An expired session is removed and reported as absent.
    pub async fn get(&self, id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();

        match sessions.get_mut(id) {
            Some(stored) if now.duration_since(stored.last_seen) < self.ttl => {
                stored.last_seen = now;
                Some(stored.session.clone())
            }
            Some(_) => {
                sessions.remove(id);
                tracing::debug!(session = %id, "Session expired");
                None
            }
            None => None,
        }
    }

    /// Bind a credential to a new authenticated session
    ///
    /// The id is always freshly minted and `previous` is dropped, so an id
    /// known before login never becomes an authenticated one.
    pub async fn link(&self, previous: Option<&str>, credential: AccessCredential) -> Session {
        let mut session = Session::new(Uuid::new_v4().to_string());
        session.link(credential);

        let mut sessions = self.sessions.write().await;
        if let Some(previous) = previous {
            sessions.remove(previous);
        }
        sessions.insert(
            session.id.clone(),
            StoredSession {
                session: session.clone(),
                last_seen: Instant::now(),
            },
        );
        session
    }

    pub async fn destroy(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop every session idle for longer than the TTL, returning how many
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, stored| now.duration_since(stored.last_seen) < self.ttl);
        before - sessions.len()
    }

    /// Purge expired sessions every `period` until the runtime shuts down
    pub fn spawn_reaper(&self, period: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let purged = store.purge_expired().await;
                if purged > 0 {
                    tracing::info!(purged, "Purged expired sessions");
                }
            }
        })
    }
}

/// Extract the session id from the request's Cookie header
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().strip_prefix(&format!("{}=", SESSION_COOKIE)))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn session_cookie(id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
