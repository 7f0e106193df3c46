//! Core domain entities
//!
//! Plain data structures shared by ports, adapters and services.
//! No I/O happens here.

mod company;
mod credential;
pub mod fault;
pub mod result;
mod session;
mod transaction;

pub use company::Company;
pub use credential::{AccessCredential, AccessTokenGrant, PublicToken};
pub use fault::{FaultKind, ProviderError, ProviderErrorBody, ProviderFault, ProviderOutcome};
pub use session::{RequestContext, Session};
pub use transaction::{parse_leading_int, TransactionQuery, TransactionRecord};
