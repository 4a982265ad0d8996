//! Per-resource endpoint resolution.
//!
//! An [`Endpoint`] is built once per logical resource from an
//! [`EndpointDescriptor`] plus the client configuration, resolving each
//! piece override-then-default-then-fail: an explicit descriptor value
//! wins, the configured default backs it up, and a missing both is a
//! configuration error surfaced at construction, not at call time.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use quarry_core::{CacheStore, Connection, Consumer, Error, Grammar, Result};

use crate::config::ClientConfig;
use crate::connection::{ApiConnection, ConnectionKind, ConnectionSettings};
use crate::grammar::GrammarKind;
use crate::transformer::TransformerKind;

static TEMPLATE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("template token pattern is valid"));

/// Declarative description of a logical resource's endpoints.
///
/// Templates map a logical type (`"collection"`, `"show"`, ...) to a path
/// that may contain `{token}` placeholders. Everything else is an optional
/// override of the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct EndpointDescriptor {
    pub templates: HashMap<String, String>,
    pub base_uri: Option<String>,
    pub grammar: Option<GrammarKind>,
    pub connection: Option<ConnectionKind>,
    pub transformer: Option<TransformerKind>,
    pub default_ttl: Option<u64>,
}

impl EndpointDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a path template under a logical type.
    pub fn template(mut self, kind: impl Into<String>, path: impl Into<String>) -> Self {
        self.templates.insert(kind.into(), path.into());
        self
    }

    pub fn base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = Some(uri.into());
        self
    }

    pub fn grammar(mut self, kind: GrammarKind) -> Self {
        self.grammar = Some(kind);
        self
    }

    pub fn connection(mut self, kind: ConnectionKind) -> Self {
        self.connection = Some(kind);
        self
    }

    pub fn transformer(mut self, kind: TransformerKind) -> Self {
        self.transformer = Some(kind);
        self
    }

    pub fn default_ttl(mut self, seconds: u64) -> Self {
        self.default_ttl = Some(seconds);
        self
    }
}

/// Resolved endpoint: base URI, grammar, connection, default TTL, and the
/// path templates for one logical resource.
pub struct Endpoint {
    base_uri: String,
    grammar: Arc<dyn Grammar>,
    connection: Arc<dyn Connection>,
    default_ttl: u64,
    templates: HashMap<String, String>,
}

impl Endpoint {
    pub(crate) fn resolve(
        descriptor: EndpointDescriptor,
        config: &ClientConfig,
        consumer: Arc<dyn Consumer>,
        cache: Arc<dyn CacheStore>,
    ) -> Result<Self> {
        let base_uri = descriptor
            .base_uri
            .or_else(|| config.endpoints.base_uri.clone())
            .filter(|uri| !uri.is_empty())
            .ok_or(Error::MissingConfiguration("base URI"))?;

        let grammar = descriptor
            .grammar
            .or(config.endpoints.default_grammar)
            .ok_or(Error::MissingConfiguration("grammar"))?
            .create();

        let default_ttl = descriptor
            .default_ttl
            .unwrap_or(config.endpoints.cache_default_ttl);

        let connection_kind = descriptor
            .connection
            .or(config.endpoints.default_connection)
            .ok_or(Error::MissingConfiguration("connection"))?;

        let connection: Arc<dyn Connection> = match connection_kind {
            ConnectionKind::Standard => {
                let mut connection = ApiConnection::new(
                    consumer,
                    cache,
                    ConnectionSettings {
                        default_ttl,
                        cache_enabled: config.endpoints.cache_enabled,
                        cache_version: config.endpoints.cache_version,
                        logger: config.logger,
                    },
                );
                if let Some(kind) = descriptor
                    .transformer
                    .or(config.endpoints.default_transformer)
                {
                    connection = connection.with_transformer(kind.create());
                }
                Arc::new(connection)
            }
        };

        Ok(Self {
            base_uri,
            grammar,
            connection,
            default_ttl,
            templates: descriptor.templates,
        })
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn grammar(&self) -> Arc<dyn Grammar> {
        self.grammar.clone()
    }

    pub fn connection(&self) -> Arc<dyn Connection> {
        self.connection.clone()
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// The raw template registered under a logical type.
    pub fn template(&self, kind: &str) -> Result<&str> {
        self.templates
            .get(kind)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownEndpointType(kind.to_string()))
    }

    /// Substitute every `{token}` in the named template with the matching
    /// parameter.
    ///
    /// A template token with no matching parameter fails fast - a silent
    /// blank would produce a malformed URI that is much harder to diagnose
    /// downstream.
    pub fn parse_endpoint(&self, kind: &str, params: &HashMap<String, Value>) -> Result<String> {
        let template = self.template(kind)?;

        let mut parsed = String::with_capacity(template.len());
        let mut last = 0;
        for captures in TEMPLATE_TOKEN.captures_iter(template) {
            let token_match = captures
                .get(0)
                .ok_or(Error::MalformedResponse("template capture without a match"))?;
            let token = &captures[1];
            let value = params
                .get(token)
                .ok_or_else(|| Error::MissingTemplateKey {
                    template: template.to_string(),
                    token: token.to_string(),
                })?;

            parsed.push_str(&template[last..token_match.start()]);
            parsed.push_str(&segment(value));
            last = token_match.end();
        }
        parsed.push_str(&template[last..]);

        Ok(parsed)
    }
}

/// Render a substitution value as a path segment, without JSON quoting for
/// strings.
fn segment(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use quarry_core::test_support::ScriptedConsumer;
    use serde_json::json;

    fn endpoint(descriptor: EndpointDescriptor, config: &ClientConfig) -> Result<Endpoint> {
        Endpoint::resolve(
            descriptor,
            config,
            Arc::new(ScriptedConsumer::new()),
            Arc::new(MemoryCacheStore::new()),
        )
    }

    fn configured() -> ClientConfig {
        let mut config = ClientConfig::default();
        config.endpoints.base_uri = Some("https://api.example.org".into());
        config
    }

    #[test]
    fn descriptor_base_uri_beats_the_configured_default() {
        let descriptor = EndpointDescriptor::new().base_uri("https://override.example.org");
        let endpoint = endpoint(descriptor, &configured()).unwrap();
        assert_eq!(endpoint.base_uri(), "https://override.example.org");
    }

    #[test]
    fn missing_base_uri_everywhere_is_a_configuration_error() {
        let result = endpoint(EndpointDescriptor::new(), &ClientConfig::default());
        assert!(matches!(
            result,
            Err(Error::MissingConfiguration("base URI"))
        ));
    }

    #[test]
    fn empty_configured_base_uri_counts_as_missing() {
        let mut config = ClientConfig::default();
        config.endpoints.base_uri = Some(String::new());
        let result = endpoint(EndpointDescriptor::new(), &config);
        assert!(matches!(
            result,
            Err(Error::MissingConfiguration("base URI"))
        ));
    }

    #[test]
    fn descriptor_ttl_beats_the_configured_default() {
        let endpoint = endpoint(
            EndpointDescriptor::new().default_ttl(60),
            &configured(),
        )
        .unwrap();
        assert_eq!(endpoint.default_ttl(), 60);
        assert_eq!(endpoint.connection().default_ttl(), 60);
    }

    #[test]
    fn tokens_substitute_from_parameters() {
        let descriptor = EndpointDescriptor::new()
            .template("show", "/api/v1/exhibitions/{exhibition_id}/artworks/{id}");
        let endpoint = endpoint(descriptor, &configured()).unwrap();

        let params = HashMap::from([
            ("exhibition_id".to_string(), json!("winter-light")),
            ("id".to_string(), json!(42)),
        ]);
        assert_eq!(
            endpoint.parse_endpoint("show", &params).unwrap(),
            "/api/v1/exhibitions/winter-light/artworks/42"
        );
    }

    #[test]
    fn absent_substitution_keys_fail_instead_of_blanking() {
        let descriptor = EndpointDescriptor::new().template("show", "/items/{id}");
        let endpoint = endpoint(descriptor, &configured()).unwrap();

        let err = endpoint.parse_endpoint("show", &HashMap::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingTemplateKey { ref token, .. } if token == "id"
        ));
    }

    #[test]
    fn unknown_logical_types_fail() {
        let descriptor = EndpointDescriptor::new().template("collection", "/items");
        let endpoint = endpoint(descriptor, &configured()).unwrap();

        let err = endpoint.parse_endpoint("detail", &HashMap::new()).unwrap_err();
        assert!(matches!(err, Error::UnknownEndpointType(ref kind) if kind == "detail"));
    }

    #[test]
    fn templates_without_tokens_pass_through() {
        let descriptor = EndpointDescriptor::new().template("collection", "/api/v1/artworks");
        let endpoint = endpoint(descriptor, &configured()).unwrap();
        assert_eq!(
            endpoint.parse_endpoint("collection", &HashMap::new()).unwrap(),
            "/api/v1/artworks"
        );
    }
}
