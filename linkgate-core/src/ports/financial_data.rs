//! Financial-data provider port

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{AccessCredential, AccessTokenGrant, PublicToken, TransactionRecord};

/// Third-party banking-data provider
///
/// Implementations are stateless apart from their static client credentials
/// and are shared across requests.
///
/// Recognized provider failures come back as `Error::Provider`; anything else
/// (transport failures, unknown error classes) uses the other `Error` variants.
#[async_trait]
pub trait FinancialDataProvider: Send + Sync {
    /// Provider name (e.g., "plaid")
    fn name(&self) -> &str;

    /// Exchange a single-use public token for a durable access token
    ///
    /// Not idempotent: a second exchange of the same token fails.
    async fn exchange_token(&self, public_token: &PublicToken) -> Result<AccessTokenGrant>;

    /// List transactions for the linked item, `count` records starting at `offset`
    async fn list_transactions(
        &self,
        credential: &AccessCredential,
        offset: i64,
        count: i64,
    ) -> Result<Vec<TransactionRecord>>;
}
