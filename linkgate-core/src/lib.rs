//! Linkgate Core - request handling for a banking-data gateway
//!
//! This crate implements the gateway's core following hexagonal architecture:
//!
//! - **domain**: Core types (credentials, sessions, transactions, faults)
//! - **ports**: Trait definitions for external systems (FinancialDataProvider, CompanyDirectory)
//! - **services**: Request orchestration (SessionGate, TransactionGateway, TokenExchangeService)
//! - **adapters**: Concrete implementations (Plaid, Clearbit)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::sync::Arc;

use adapters::clearbit::ClearbitClient;
use adapters::plaid::PlaidClient;
use config::Config;
use ports::{CompanyDirectory, FinancialDataProvider};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{
    AccessCredential, AccessTokenGrant, Company, FaultKind, ProviderError, ProviderErrorBody,
    ProviderFault, ProviderOutcome, PublicToken, RequestContext, Session, TransactionQuery,
    TransactionRecord,
};

/// Main context for gateway operations
///
/// Built once at startup from an explicit `Config` and shared by every
/// request. Holds no per-request state.
pub struct GatewayContext {
    pub config: Config,
    pub session_gate: SessionGate,
    pub transaction_gateway: TransactionGateway,
    pub token_exchange_service: TokenExchangeService,
    pub company_lookup_service: CompanyLookupService,
}

impl GatewayContext {
    /// Create a context backed by the Plaid and Clearbit HTTP clients
    pub fn new(config: Config) -> Result<Self> {
        let provider = Arc::new(PlaidClient::new(config.plaid.clone())?);
        let directory = Arc::new(ClearbitClient::new(config.clearbit.clone())?);
        Ok(Self::with_ports(config, provider, directory))
    }

    /// Create a context over arbitrary port implementations
    pub fn with_ports(
        config: Config,
        provider: Arc<dyn FinancialDataProvider>,
        directory: Arc<dyn CompanyDirectory>,
    ) -> Self {
        Self {
            config,
            session_gate: SessionGate::new(),
            transaction_gateway: TransactionGateway::new(Arc::clone(&provider)),
            token_exchange_service: TokenExchangeService::new(provider),
            company_lookup_service: CompanyLookupService::new(directory),
        }
    }
}
