//! Session gate for protected routes

use crate::domain::RequestContext;

/// Path prefix whose routes require an authenticated session
pub const PROTECTED_PREFIX: &str = "/transactions";

/// Decides whether a request may reach protected routes
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionGate;

impl SessionGate {
    pub fn new() -> Self {
        Self
    }

    /// Whether `path` falls under the protected prefix
    pub fn is_protected(&self, path: &str) -> bool {
        path.starts_with(PROTECTED_PREFIX)
    }

    /// `true` iff the request carries an authenticated session
    pub fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.is_authenticated()
    }
}
