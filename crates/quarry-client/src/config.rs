//! Client configuration surface.
//!
//! All of this is read-only input to endpoint resolution and connection
//! construction; no pipeline logic depends on where it was loaded from.
//! Field defaults mirror a conservative deployment: caching off, hour-long
//! TTL once enabled, logging off.

use serde::{Deserialize, Serialize};

use quarry_core::{Error, Result};

use crate::connection::ConnectionKind;
use crate::grammar::GrammarKind;
use crate::transformer::TransformerKind;

/// Top-level configuration for an [`crate::ApiContext`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub endpoints: EndpointDefaults,
    /// Emit an observational log line per dispatched call.
    #[serde(default)]
    pub logger: bool,
}

impl ClientConfig {
    /// Parse a TOML configuration document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|err| Error::InvalidConfiguration(err.to_string()))
    }
}

/// Process-wide endpoint defaults, each overridable per descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointDefaults {
    /// Default base URI; endpoints fail at construction when neither this
    /// nor a descriptor override is set.
    #[serde(default)]
    pub base_uri: Option<String>,
    #[serde(default = "default_grammar")]
    pub default_grammar: Option<GrammarKind>,
    #[serde(default = "default_connection")]
    pub default_connection: Option<ConnectionKind>,
    #[serde(default)]
    pub default_transformer: Option<TransformerKind>,
    /// Cache lifetime in seconds for calls without a TTL override.
    #[serde(default = "default_cache_ttl")]
    pub cache_default_ttl: u64,
    #[serde(default)]
    pub cache_enabled: bool,
    /// Deployment-wide cache generation; bump to invalidate everything.
    #[serde(default = "default_cache_version")]
    pub cache_version: u32,
}

impl Default for EndpointDefaults {
    fn default() -> Self {
        Self {
            base_uri: None,
            default_grammar: default_grammar(),
            default_connection: default_connection(),
            default_transformer: None,
            cache_default_ttl: default_cache_ttl(),
            cache_enabled: false,
            cache_version: default_cache_version(),
        }
    }
}

fn default_grammar() -> Option<GrammarKind> {
    Some(GrammarKind::Rest)
}

fn default_connection() -> Option<ConnectionKind> {
    Some(ConnectionKind::Standard)
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_version() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_conservative() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoints.base_uri, None);
        assert_eq!(config.endpoints.default_grammar, Some(GrammarKind::Rest));
        assert_eq!(
            config.endpoints.default_connection,
            Some(ConnectionKind::Standard)
        );
        assert_eq!(config.endpoints.default_transformer, None);
        assert_eq!(config.endpoints.cache_default_ttl, 3600);
        assert!(!config.endpoints.cache_enabled);
        assert_eq!(config.endpoints.cache_version, 1);
        assert!(!config.logger);
    }

    #[test]
    fn toml_documents_parse_with_partial_sections() {
        let config = ClientConfig::from_toml_str(
            r#"
            logger = true

            [endpoints]
            base_uri = "https://api.example.org"
            default_grammar = "search"
            cache_enabled = true
            cache_default_ttl = 300
            "#,
        )
        .unwrap();

        assert!(config.logger);
        assert_eq!(
            config.endpoints.base_uri.as_deref(),
            Some("https://api.example.org")
        );
        assert_eq!(config.endpoints.default_grammar, Some(GrammarKind::Search));
        assert!(config.endpoints.cache_enabled);
        assert_eq!(config.endpoints.cache_default_ttl, 300);
        // Unspecified fields keep their defaults.
        assert_eq!(config.endpoints.cache_version, 1);
    }

    #[test]
    fn invalid_toml_is_a_configuration_error() {
        let err = ClientConfig::from_toml_str("endpoints = 3").unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }
}
