//! Service layer - request handling orchestration
//!
//! Services sit between the router and the ports. Provider faults they are
//! responsible for are turned into `ProviderOutcome::Fault` here and nowhere else.

mod company;
mod session_gate;
mod token_exchange;
mod transactions;

pub use company::CompanyLookupService;
pub use session_gate::{SessionGate, PROTECTED_PREFIX};
pub use token_exchange::TokenExchangeService;
pub use transactions::TransactionGateway;
