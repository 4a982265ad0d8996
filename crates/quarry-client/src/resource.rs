//! Resource-level entry points.
//!
//! A resource is a record type that knows its own endpoints. Implementing
//! [`Resource`] gives it `query`/`search` constructors that resolve the
//! endpoint through an [`ApiContext`] and hand back a ready
//! [`QueryBuilder`], with the resource's default scopes already applied.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use quarry_core::Result;

use crate::builder::QueryBuilder;
use crate::context::ApiContext;
use crate::endpoint::EndpointDescriptor;

pub trait Resource: DeserializeOwned + Sized {
    /// Endpoint templates and overrides for this resource.
    fn descriptor() -> EndpointDescriptor;

    /// Scopes applied to every builder created through [`Resource::query`].
    ///
    /// The default applies nothing. Override to bake in filters every
    /// query against this resource should carry (a published-only filter,
    /// a default ordering, ...).
    fn default_scopes(builder: QueryBuilder<Self>) -> QueryBuilder<Self> {
        builder
    }

    /// New query builder for this resource.
    fn query(ctx: &ApiContext) -> Result<QueryBuilder<Self>> {
        let endpoint = Arc::new(ctx.endpoint(Self::descriptor())?);
        Ok(Self::default_scopes(QueryBuilder::for_endpoint(endpoint)))
    }

    /// New query builder with a free-text search applied.
    fn search(ctx: &ApiContext, text: impl Into<String>) -> Result<QueryBuilder<Self>> {
        Ok(Self::query(ctx)?.search(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use quarry_core::test_support::ScriptedConsumer;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Exhibition {
        #[allow(dead_code)]
        id: u64,
    }

    impl Resource for Exhibition {
        fn descriptor() -> EndpointDescriptor {
            EndpointDescriptor::new()
                .template("collection", "/api/v1/exhibitions")
                .template("show", "/api/v1/exhibitions/{id}")
        }

        fn default_scopes(builder: QueryBuilder<Self>) -> QueryBuilder<Self> {
            builder.order_by("opening_date", "desc")
        }
    }

    fn ctx() -> ApiContext {
        let mut config = ClientConfig::default();
        config.endpoints.base_uri = Some("https://api.example.org".into());
        ApiContext::new(config, Arc::new(ScriptedConsumer::new()))
    }

    #[test]
    fn query_applies_default_scopes() {
        let builder = Exhibition::query(&ctx()).unwrap();
        assert_eq!(builder.state().orders.len(), 1);
        assert_eq!(builder.state().orders[0].field, "opening_date");
    }

    #[test]
    fn search_seeds_the_text_filter() {
        let builder = Exhibition::search(&ctx(), "impressionism").unwrap();
        assert_eq!(
            builder.state().search_text.as_deref(),
            Some("impressionism")
        );
    }

    #[test]
    fn missing_base_uri_surfaces_at_query_construction() {
        let ctx = ApiContext::new(ClientConfig::default(), Arc::new(ScriptedConsumer::new()));
        assert!(Exhibition::query(&ctx).is_err());
    }
}
