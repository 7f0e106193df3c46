//! Company lookup service

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::Company;
use crate::ports::CompanyDirectory;

pub struct CompanyLookupService {
    directory: Arc<dyn CompanyDirectory>,
}

impl CompanyLookupService {
    pub fn new(directory: Arc<dyn CompanyDirectory>) -> Self {
        Self { directory }
    }

    /// Look up a company by name; blank names never hit the directory
    pub async fn company_info(&self, name: &str) -> Result<Option<Company>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        self.directory.find(name).await
    }
}
