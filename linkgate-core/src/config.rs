//! Configuration management
//!
//! Everything comes from the process environment once, at startup:
//!
//! | Variable             | Meaning                                        |
//! |----------------------|------------------------------------------------|
//! | `PLAID_CLIENT_ID`    | Plaid client id                                |
//! | `PLAID_SECRET`       | Plaid secret                                   |
//! | `PLAID_PUBLIC_KEY`   | Plaid public key (handed to the Link widget)   |
//! | `PLAID_ENV`          | `sandbox` (default), `development`, `production` |
//! | `PLAID_BASE_URL`     | Override the Plaid API URL (mock servers)      |
//! | `PLAID_HISTORY_DAYS` | Days of history for transaction listing (30)   |
//! | `CLEARBIT_KEY`       | Clearbit API key for company lookups           |
//! | `CLEARBIT_BASE_URL`  | Override the Clearbit API URL                  |
//! | `PUBLIC_DIR`         | Frontend build folder (`client/build`)         |
//!
//! Credentials are only checked for presence. A missing one is stored as an
//! empty string and shows up later as a provider failure.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use crate::domain::result::{Error, Result};

const DEFAULT_HISTORY_DAYS: u32 = 30;
const DEFAULT_PUBLIC_DIR: &str = "client/build";
const CLEARBIT_PRODUCTION_URL: &str = "https://company.clearbit.com";

/// Plaid API environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaidEnvironment {
    #[default]
    Sandbox,
    Development,
    Production,
}

impl PlaidEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn base_url(&self) -> String {
        format!("https://{}.plaid.com", self.as_str())
    }
}

impl FromStr for PlaidEnvironment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(Error::config(format!("unknown PLAID_ENV '{}'", other))),
        }
    }
}

/// Static credentials and endpoint for the Plaid client
#[derive(Clone)]
pub struct PlaidSettings {
    pub client_id: String,
    pub secret: String,
    pub public_key: String,
    pub environment: PlaidEnvironment,
    pub base_url: String,
    pub history_days: u32,
}

impl fmt::Debug for PlaidSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaidSettings")
            .field("client_id", &self.client_id)
            .field("secret", &redact(&self.secret))
            .field("public_key", &redact(&self.public_key))
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("history_days", &self.history_days)
            .finish()
    }
}

/// Clearbit enrichment settings
#[derive(Clone)]
pub struct ClearbitSettings {
    pub api_key: String,
    pub base_url: String,
}

impl fmt::Debug for ClearbitSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClearbitSettings")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Gateway configuration, built once and passed to everything that needs it
#[derive(Debug, Clone)]
pub struct Config {
    pub plaid: PlaidSettings,
    pub clearbit: ClearbitSettings,
    pub public_dir: PathBuf,
}

impl Config {
    /// Load config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        let get_set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match get_set("PLAID_ENV") {
            Some(env) => env.parse()?,
            None => PlaidEnvironment::default(),
        };

        let base_url = match get_set("PLAID_BASE_URL") {
            Some(url) => validate_base_url("PLAID_BASE_URL", &url)?,
            None => environment.base_url(),
        };

        let history_days = match get_set("PLAID_HISTORY_DAYS") {
            Some(days) => days.trim().parse::<u32>().map_err(|_| {
                Error::config(format!("PLAID_HISTORY_DAYS must be a positive integer, got '{}'", days))
            })?,
            None => DEFAULT_HISTORY_DAYS,
        };

        let clearbit_base_url = match get_set("CLEARBIT_BASE_URL") {
            Some(url) => validate_base_url("CLEARBIT_BASE_URL", &url)?,
            None => CLEARBIT_PRODUCTION_URL.to_string(),
        };

        let public_dir = get_set("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR));

        Ok(Self {
            plaid: PlaidSettings {
                client_id: get("PLAID_CLIENT_ID"),
                secret: get("PLAID_SECRET"),
                public_key: get("PLAID_PUBLIC_KEY"),
                environment,
                base_url,
                history_days,
            },
            clearbit: ClearbitSettings {
                api_key: get("CLEARBIT_KEY"),
                base_url: clearbit_base_url,
            },
            public_dir,
        })
    }

    /// Names of expected credentials that are missing, for a startup warning
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.plaid.client_id.is_empty() {
            missing.push("PLAID_CLIENT_ID");
        }
        if self.plaid.secret.is_empty() {
            missing.push("PLAID_SECRET");
        }
        if self.plaid.public_key.is_empty() {
            missing.push("PLAID_PUBLIC_KEY");
        }
        if self.clearbit.api_key.is_empty() {
            missing.push("CLEARBIT_KEY");
        }
        missing
    }
}

/// Parse an http(s) URL and strip any trailing slash
fn validate_base_url(key: &str, raw: &str) -> Result<String> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| Error::config(format!("{} is not a valid URL: {}", key, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::config(format!("{} must use http or https", key)));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
