// ============================================================================
// Axum Middleware
// ============================================================================
//
// - request_logging: log method, path, status and duration of every request
// - session_context: resolve the session cookie into a RequestContext and
//   halt unauthenticated requests to protected paths with 403, and answer
//   unrouted protected paths with a JSON-typed 404
//
// ============================================================================

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use linkgate_core::services::PROTECTED_PREFIX;
use linkgate_core::RequestContext;

use crate::session;
use crate::AppState;

/// Request logging middleware
pub async fn request_logging(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    tracing::debug!(method = %method, path = %path, "Incoming request");

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    response
}

/// Build the request context and apply the session gate
///
/// Handlers read the context with `Extension<RequestContext>`.
pub async fn session_context(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = match session::session_id(req.headers()) {
        Some(id) => match state.sessions.get(&id).await {
            Some(session) => RequestContext::with_session(session),
            None => RequestContext::anonymous(),
        },
        None => RequestContext::anonymous(),
    };

    let gate = &state.ctx.session_gate;
    if gate.is_protected(req.uri().path()) && !gate.authorize(&ctx) {
        tracing::warn!(path = %req.uri().path(), "Rejected unauthenticated request");
        return forbidden();
    }

    // `/transactions` itself is the only route under the protected prefix
    if gate.is_protected(req.uri().path()) && req.uri().path() != PROTECTED_PREFIX {
        return json_status(StatusCode::NOT_FOUND);
    }

    req.extensions_mut().insert(ctx);
    next.run(req).await
}

pub(crate) fn forbidden() -> Response {
    json_status(StatusCode::FORBIDDEN)
}

/// Empty body with a JSON content type, as protected responses carry
fn json_status(status: StatusCode) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
    )
        .into_response()
}
