//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Plaid HTTP client for FinancialDataProvider
//! - Clearbit HTTP client for CompanyDirectory
//! - Mock Plaid/Clearbit HTTP server for tests

pub mod clearbit;
pub mod plaid;

#[cfg(test)]
pub mod mock_api;
