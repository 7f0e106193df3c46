//! Clearbit company lookup client
//!
//! Uses the Name to Domain API to resolve a company name to its domain and logo.
//!
//! API Documentation: https://dashboard.clearbit.com/docs#name-to-domain-api

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::ClearbitSettings;
use crate::domain::result::{Error, Result};
use crate::domain::Company;
use crate::ports::CompanyDirectory;

/// Clearbit API client
#[derive(Debug)]
pub struct ClearbitClient {
    client: Client,
    settings: ClearbitSettings,
}

impl ClearbitClient {
    /// Create a new Clearbit client from settings
    pub fn new(settings: ClearbitSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            settings: ClearbitSettings {
                base_url: settings.base_url.trim_end_matches('/').to_string(),
                ..settings
            },
        })
    }
}

#[async_trait]
impl CompanyDirectory for ClearbitClient {
    async fn find(&self, name: &str) -> Result<Option<Company>> {
        let url = format!("{}/v1/domains/find", self.settings.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .bearer_auth(&self.settings.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(Some(response.json::<Company>().await?)),
            // 422 is what Clearbit answers for names it cannot interpret
            StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => Ok(None),
            status => {
                tracing::warn!(status = status.as_u16(), "Clearbit lookup failed");
                Err(Error::upstream(
                    "CLEARBIT_ERROR",
                    status.as_str(),
                    format!("Clearbit returned HTTP {}", status.as_u16()),
                ))
            }
        }
    }
}
