//! Plaid API client
//!
//! Handles the two Plaid calls the gateway needs: exchanging a Link public
//! token for an access token, and listing an item's transactions.
//!
//! API Documentation: https://plaid.com/docs/api/

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::PlaidSettings;
use crate::domain::result::{Error, Result};
use crate::domain::{
    AccessCredential, AccessTokenGrant, FaultKind, ProviderFault, PublicToken, TransactionRecord,
};
use crate::ports::FinancialDataProvider;

/// Request timeout for every Plaid call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// API Request/Response Models (Plaid wire format)
// =============================================================================

#[derive(Debug, Serialize)]
struct ExchangeRequest<'a> {
    client_id: &'a str,
    secret: &'a str,
    public_token: &'a str,
}

#[derive(Debug, Serialize)]
struct TransactionsRequest<'a> {
    client_id: &'a str,
    secret: &'a str,
    access_token: &'a str,
    start_date: String,
    end_date: String,
    options: TransactionsOptions,
}

#[derive(Debug, Serialize)]
struct TransactionsOptions {
    count: i64,
    offset: i64,
}

/// Body of `/transactions/get`; accounts and item metadata are ignored
#[derive(Debug, Deserialize)]
struct TransactionsResponse {
    transactions: Vec<TransactionRecord>,
    #[serde(default)]
    total_transactions: Option<i64>,
}

/// Plaid error body, returned with any non-2xx status
#[derive(Debug, Deserialize)]
struct PlaidErrorResponse {
    error_type: String,
    error_code: String,
    error_message: String,
    #[serde(default)]
    display_message: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
}

// =============================================================================
// Plaid HTTP Client
// =============================================================================

/// Plaid API client
///
/// Holds only the static client credentials, so a single instance is shared
/// by every request.
#[derive(Debug)]
pub struct PlaidClient {
    client: Client,
    settings: PlaidSettings,
}

impl PlaidClient {
    /// Create a new Plaid client from settings
    pub fn new(settings: PlaidSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            settings: PlaidSettings {
                base_url: settings.base_url.trim_end_matches('/').to_string(),
                ..settings
            },
        })
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    /// Date window for transaction listing: the last `history_days` days, ending today (UTC)
    fn date_window(&self) -> (NaiveDate, NaiveDate) {
        let end = Utc::now().date_naive();
        let start = end
            .checked_sub_days(Days::new(u64::from(self.settings.history_days)))
            .unwrap_or(NaiveDate::MIN);
        (start, end)
    }

    /// POST a JSON body and decode the success response
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.settings.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_request_error(path, e))?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        Err(self.map_error_response(path, status, &bytes))
    }

    /// Log transport failures; they are passed on unchanged
    fn map_request_error(&self, path: &str, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            tracing::warn!(path, "Plaid request timed out after {:?}", REQUEST_TIMEOUT);
        } else if error.is_connect() {
            tracing::warn!(path, base_url = %self.settings.base_url, "Unable to connect to Plaid");
        } else {
            tracing::warn!(path, error = %error, "Plaid request failed");
        }
        Error::Http(error)
    }

    /// Turn a non-2xx Plaid response into a fault or an upstream error
    fn map_error_response(&self, path: &str, status: StatusCode, body: &[u8]) -> Error {
        let parsed: PlaidErrorResponse = match serde_json::from_slice(body) {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(path, status = status.as_u16(), "Plaid returned an unreadable error body");
                return Error::upstream(
                    "HTTP_ERROR",
                    status.as_str(),
                    format!("Plaid returned HTTP {}", status.as_u16()),
                );
            }
        };

        tracing::info!(
            path,
            status = status.as_u16(),
            error_type = %parsed.error_type,
            error_code = %parsed.error_code,
            request_id = parsed.request_id.as_deref().unwrap_or(""),
            has_display_message = parsed.display_message.is_some(),
            "Plaid rejected request"
        );

        match FaultKind::from_error_type(&parsed.error_type) {
            Some(kind) => ProviderFault::new(kind, parsed.error_code, parsed.error_message).into(),
            None => Error::upstream(parsed.error_type, parsed.error_code, parsed.error_message),
        }
    }
}

#[async_trait]
impl FinancialDataProvider for PlaidClient {
    fn name(&self) -> &str {
        "plaid"
    }

    async fn exchange_token(&self, public_token: &PublicToken) -> Result<AccessTokenGrant> {
        let request = ExchangeRequest {
            client_id: &self.settings.client_id,
            secret: &self.settings.secret,
            public_token: public_token.as_str(),
        };

        let grant: AccessTokenGrant = self.post("/item/public_token/exchange", &request).await?;

        tracing::debug!(
            public_token = %public_token.fingerprint(),
            access_token = %grant.credential().fingerprint(),
            "Exchanged public token"
        );

        Ok(grant)
    }

    async fn list_transactions(
        &self,
        credential: &AccessCredential,
        offset: i64,
        count: i64,
    ) -> Result<Vec<TransactionRecord>> {
        let (start, end) = self.date_window();
        let request = TransactionsRequest {
            client_id: &self.settings.client_id,
            secret: &self.settings.secret,
            access_token: credential.access_token(),
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
            options: TransactionsOptions { count, offset },
        };

        let response: TransactionsResponse = self.post("/transactions/get", &request).await?;

        tracing::debug!(
            access_token = %credential.fingerprint(),
            offset,
            count,
            returned = response.transactions.len(),
            total = response.total_transactions.unwrap_or(-1),
            "Listed transactions"
        );

        Ok(response.transactions)
    }
}

// =============================================================================
// Tests
// =============================================================================
