//! Company enrichment port

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::Company;

/// Looks up company details by name
#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    /// `Ok(None)` when the directory has no match
    async fn find(&self, name: &str) -> Result<Option<Company>>;
}
