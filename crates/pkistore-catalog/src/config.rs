//! Store construction configuration.
//!
//! The configuration payload is a JSON document naming the providers to
//! attach, each tagged with its backend type and type-specific parameters:
//!
//! ```json
//! {
//!   "providers": [
//!     { "type": "system", "categories": ["MY", "ROOT", "CA"] },
//!     { "type": "file", "path": "/var/lib/pki-store" }
//!   ]
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

/// One provider to attach at store construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// Platform certificate store provider. An absent or empty category
    /// list selects the default categories.
    System {
        #[serde(default)]
        categories: Vec<String>,
    },
    /// File/descriptor store provider rooted at `path`.
    File { path: PathBuf },
}

impl ProviderConfig {
    /// The provider type string this entry will attach as.
    pub fn provider_type(&self) -> &'static str {
        match self {
            Self::System { .. } => pkistore_provider::SYSTEM_PROVIDER_TYPE,
            Self::File { .. } => pkistore_provider::FILE_PROVIDER_TYPE,
        }
    }
}

/// The full construction payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

impl StoreConfig {
    /// Parse a configuration from its JSON payload.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        serde_json::from_str(json).map_err(|e| CatalogError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_provider_kinds() {
        let config = StoreConfig::from_json(
            r#"{
                "providers": [
                    { "type": "system", "categories": ["MY", "ROOT"] },
                    { "type": "file", "path": "/var/lib/pki-store" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(
            config.providers[0],
            ProviderConfig::System {
                categories: vec!["MY".to_string(), "ROOT".to_string()]
            }
        );
        assert_eq!(config.providers[0].provider_type(), "SYSTEM");
        assert_eq!(config.providers[1].provider_type(), "FILE");
    }

    #[test]
    fn system_categories_default_to_empty() {
        let config =
            StoreConfig::from_json(r#"{"providers":[{"type":"system"}]}"#).unwrap();
        assert_eq!(
            config.providers[0],
            ProviderConfig::System { categories: vec![] }
        );
    }

    #[test]
    fn rejects_unknown_provider_type() {
        let err = StoreConfig::from_json(r#"{"providers":[{"type":"ldap"}]}"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn empty_payload_is_an_empty_store() {
        let config = StoreConfig::from_json("{}").unwrap();
        assert!(config.providers.is_empty());
    }
}
