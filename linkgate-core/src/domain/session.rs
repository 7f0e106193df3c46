//! Session state as seen by the core

use super::credential::AccessCredential;

/// Per-visitor session, owned by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub authenticated: bool,
    pub credential: Option<AccessCredential>,
}

impl Session {
    /// A fresh, unauthenticated session
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            authenticated: false,
            credential: None,
        }
    }

    /// Bind a linked account credential; this is what logs a session in
    pub fn link(&mut self, credential: AccessCredential) {
        self.credential = Some(credential);
        self.authenticated = true;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

/// Explicit request context handed to the gate and the router
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub session: Option<Session>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { session: None }
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_authenticated)
    }

    pub fn credential(&self) -> Option<&AccessCredential> {
        self.session.as_ref().and_then(|s| s.credential.as_ref())
    }
}
