//! Transaction gateway - paginated listing through the provider

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::{AccessCredential, ProviderOutcome, TransactionQuery, TransactionRecord};
use crate::ports::FinancialDataProvider;

/// Translates raw pagination parameters into provider listing calls
pub struct TransactionGateway {
    provider: Arc<dyn FinancialDataProvider>,
}

impl TransactionGateway {
    pub fn new(provider: Arc<dyn FinancialDataProvider>) -> Self {
        Self { provider }
    }

    /// List transactions for raw `offset`/`count` request parameters
    ///
    /// Missing or non-numeric parameters become 0; negative values are passed
    /// on. Item, invalid-input and invalid-request faults all come back as
    /// `ProviderOutcome::Fault`. Records are returned exactly as the provider
    /// sent them.
    pub async fn get_transactions(
        &self,
        credential: &AccessCredential,
        raw_offset: Option<&str>,
        raw_count: Option<&str>,
    ) -> Result<ProviderOutcome<Vec<TransactionRecord>>> {
        let query = TransactionQuery::from_raw(raw_count, raw_offset);
        self.list(credential, query).await
    }

    /// List transactions for an already-parsed query
    pub async fn list(
        &self,
        credential: &AccessCredential,
        query: TransactionQuery,
    ) -> Result<ProviderOutcome<Vec<TransactionRecord>>> {
        tracing::debug!(
            provider = self.provider.name(),
            offset = query.offset,
            count = query.count,
            "Listing transactions"
        );

        let result = self
            .provider
            .list_transactions(credential, query.offset, query.count)
            .await;

        let outcome = ProviderOutcome::recover(result, |_| true)?;
        if let ProviderOutcome::Fault(error) = &outcome {
            tracing::info!(error_code = %error.error_code, "Transaction listing rejected by provider");
        }
        Ok(outcome)
    }
}
