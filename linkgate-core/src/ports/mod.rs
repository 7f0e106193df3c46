//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external systems. Services depend only on
//! these traits, never on a concrete HTTP client.

mod company_directory;
mod financial_data;

pub use company_directory::CompanyDirectory;
pub use financial_data::FinancialDataProvider;
