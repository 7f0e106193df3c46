//! Route handlers
//!
//! Every handler runs behind `middleware::session_context`, so a
//! `RequestContext` extension is always present.

use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Path, Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use serde::Deserialize;
use serde_json::json;

use linkgate_core::{ProviderError, ProviderErrorBody, ProviderOutcome, PublicToken, RequestContext};

use crate::error::{AppError, AppResult};
use crate::middleware::forbidden;
use crate::session;
use crate::AppState;

/// `GET /companies/{name}`
pub async fn company(State(state): State<AppState>, Path(name): Path<String>) -> AppResult<Response> {
    match state.ctx.company_lookup_service.company_info(&name).await? {
        Some(company) => Ok(Json(company).into_response()),
        None => Ok((StatusCode::NOT_FOUND, "Company not found").into_response()),
    }
}

/// `GET /transactions?count=&offset=`
pub async fn transactions(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Response> {
    let Some(credential) = ctx.credential() else {
        return Ok(forbidden());
    };

    let outcome = state
        .ctx
        .transaction_gateway
        .get_transactions(
            credential,
            params.get("offset").map(String::as_str),
            params.get("count").map(String::as_str),
        )
        .await?;

    Ok(match outcome {
        ProviderOutcome::Ok(records) => Json(records).into_response(),
        ProviderOutcome::Fault(error) => {
            (StatusCode::BAD_REQUEST, Json(ProviderErrorBody::from(error))).into_response()
        }
    })
}

/// Error code for request bodies that fail to deserialize
pub const INVALID_BODY: &str = "INVALID_BODY";

/// Body of `POST /get_access_token`, JSON or form encoded
#[derive(Debug, Default, Deserialize)]
pub struct TokenParams {
    #[serde(default)]
    pub public_token: Option<String>,
}

impl<S> FromRequest<S> for TokenParams
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(params) = Json::<TokenParams>::from_request(req, state)
                .await
                .map_err(|rejection| invalid_body(rejection.body_text()))?;
            Ok(params)
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(params) = Form::<TokenParams>::from_request(req, state)
                .await
                .map_err(|rejection| invalid_body(rejection.body_text()))?;
            Ok(params)
        } else {
            Ok(Self::default())
        }
    }
}

/// 400 in the normalized error shape for a body that could not be read
fn invalid_body(message: String) -> Response {
    tracing::debug!(error = %message, "Rejected unreadable request body");
    let error = ProviderError {
        error_code: INVALID_BODY.to_string(),
        error_message: message,
    };
    (StatusCode::BAD_REQUEST, Json(ProviderErrorBody::from(error))).into_response()
}

/// `POST /get_access_token`
///
/// On success the access credential is linked to a freshly issued session,
/// which is what authenticates it for `/transactions`. Any session the
/// caller arrived with is discarded.
pub async fn get_access_token(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    params: TokenParams,
) -> AppResult<Response> {
    let public_token = PublicToken::new(params.public_token.unwrap_or_default());

    let grant = match state
        .ctx
        .token_exchange_service
        .exchange_public_token(&public_token)
        .await?
    {
        ProviderOutcome::Ok(grant) => grant,
        ProviderOutcome::Fault(error) => {
            return Ok((StatusCode::BAD_REQUEST, Json(ProviderErrorBody::from(error))).into_response());
        }
    };

    let current_id = ctx.session.as_ref().map(|s| s.id.as_str());
    let session = state.sessions.link(current_id, grant.credential()).await;
    tracing::info!(
        session = %session.id,
        access_token = %grant.credential().fingerprint(),
        "Session linked to account"
    );

    let mut response = Json(grant).into_response();
    let cookie = HeaderValue::from_str(&session::session_cookie(&session.id))
        .map_err(|e| AppError::Internal(format!("invalid session cookie: {}", e)))?;
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// `POST /logout`
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = session::session_id(&headers) {
        if state.sessions.destroy(&id).await {
            tracing::info!(session = %id, "Session destroyed");
        }
    }

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, session::expired_session_cookie())],
    )
        .into_response()
}

/// `GET /config` - public settings the Link widget needs
pub async fn client_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    let plaid = &state.ctx.config.plaid;
    Json(json!({
        "plaid_public_key": plaid.public_key,
        "plaid_env": plaid.environment.as_str(),
    }))
}

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
