//! Company enrichment record

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Company returned by the enrichment directory
///
/// Known fields are typed; anything else the directory sends is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: None,
            logo: None,
            extra: serde_json::Map::new(),
        }
    }
}
