//! Token exchange service - public token to access token

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::{AccessTokenGrant, FaultKind, ProviderOutcome, PublicToken};
use crate::ports::FinancialDataProvider;

/// Exchanges Link public tokens for access tokens
///
/// Storing the resulting token is up to the caller.
pub struct TokenExchangeService {
    provider: Arc<dyn FinancialDataProvider>,
}

impl TokenExchangeService {
    pub fn new(provider: Arc<dyn FinancialDataProvider>) -> Self {
        Self { provider }
    }

    /// Exchange `public_token`
    ///
    /// Only invalid-input faults (bad, expired or reused tokens) become
    /// `ProviderOutcome::Fault`. Item and invalid-request faults during an
    /// exchange are unexpected and stay errors.
    pub async fn exchange_public_token(
        &self,
        public_token: &PublicToken,
    ) -> Result<ProviderOutcome<AccessTokenGrant>> {
        let result = self.provider.exchange_token(public_token).await;
        let outcome = ProviderOutcome::recover(result, |kind| kind == FaultKind::InvalidInput)?;

        match &outcome {
            ProviderOutcome::Ok(grant) => tracing::info!(
                public_token = %public_token.fingerprint(),
                item_id = grant.item_id.as_deref().unwrap_or(""),
                "Public token exchanged"
            ),
            ProviderOutcome::Fault(error) => tracing::info!(
                public_token = %public_token.fingerprint(),
                error_code = %error.error_code,
                "Public token rejected"
            ),
        }

        Ok(outcome)
    }
}
