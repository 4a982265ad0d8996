//! Fluent accumulation and execution of query intent.
//!
//! A [`QueryBuilder`] is a short-lived, single-owner command object: it
//! accumulates filters through its fluent methods, compiles them through
//! the endpoint's grammar at execution time, and wraps successful
//! envelope-shaped responses into a typed collection. Anything that is not
//! a plain 200 comes back as the raw body for the caller to branch on -
//! never as an error.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use quarry_core::{
    ApiCollection, Connection, Direction, Error, Grammar, Metadata, Method, OrderClause,
    PaginationData, Params, QueryState, ResponseEnvelope, Result,
};

use crate::endpoint::Endpoint;

/// Logical endpoint type used when an execution method is not given one.
pub const DEFAULT_ENDPOINT_TYPE: &str = "collection";

type PageResolver = Arc<dyn Fn(&str) -> Option<u64> + Send + Sync>;

/// Result of `get`/`post`: a typed collection on a 200, the raw body (or
/// serialized envelope when there was no body) on anything else.
#[derive(Debug)]
pub enum QueryOutcome<T> {
    Collection(ApiCollection<T>),
    Raw(Value),
}

impl<T> QueryOutcome<T> {
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    pub fn collection(self) -> Option<ApiCollection<T>> {
        match self {
            Self::Collection(collection) => Some(collection),
            Self::Raw(_) => None,
        }
    }

    pub fn raw(self) -> Option<Value> {
        match self {
            Self::Raw(value) => Some(value),
            Self::Collection(_) => None,
        }
    }
}

/// One page of results with length-aware totals.
#[derive(Debug)]
pub struct Page<T> {
    pub items: ApiCollection<T>,
    pub total: u64,
    pub per_page: u64,
    pub current_page: u64,
}

impl<T> Page<T> {
    pub fn last_page(&self) -> u64 {
        self.total.div_ceil(self.per_page).max(1)
    }
}

/// Result of `paginate`: a page on success, the raw failure body otherwise.
#[derive(Debug)]
pub enum PageOutcome<T> {
    Page(Page<T>),
    Raw(Value),
}

impl<T> PageOutcome<T> {
    pub fn page(self) -> Option<Page<T>> {
        match self {
            Self::Page(page) => Some(page),
            Self::Raw(_) => None,
        }
    }

    pub fn raw(self) -> Option<Value> {
        match self {
            Self::Raw(value) => Some(value),
            Self::Page(_) => None,
        }
    }
}

/// Fluent query builder bound to one resolved endpoint.
///
/// `T` is the record type successful responses deserialize into.
pub struct QueryBuilder<T> {
    endpoint: Arc<Endpoint>,
    connection: Arc<dyn Connection>,
    grammar: Arc<dyn Grammar>,
    state: QueryState,
    path_params: HashMap<String, Value>,
    pagination_data: Option<PaginationData>,
    page_resolver: Option<PageResolver>,
    _record: PhantomData<fn() -> T>,
}

impl<T> QueryBuilder<T> {
    pub fn for_endpoint(endpoint: Arc<Endpoint>) -> Self {
        let connection = endpoint.connection();
        let grammar = endpoint.grammar();
        Self {
            endpoint,
            connection,
            grammar,
            state: QueryState::default(),
            path_params: HashMap::new(),
            pagination_data: None,
            page_resolver: None,
            _record: PhantomData,
        }
    }

    /// The accumulated query intent, read-only.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Pagination block captured by the most recent successful execution.
    pub fn pagination_data(&self) -> Option<&PaginationData> {
        self.pagination_data.as_ref()
    }

    /// Append an ordering clause.
    ///
    /// The direction is case-normalized, and anything that is not "asc"
    /// sorts descending - a typo never raises.
    pub fn order_by(mut self, field: impl Into<String>, direction: &str) -> Self {
        self.state.orders.push(OrderClause {
            field: field.into(),
            direction: Direction::parse(direction),
        });
        self
    }

    /// Replace the id filter. An empty list is a no-op, preserving any
    /// previously set filter.
    pub fn ids<I, V>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let ids: Vec<Value> = ids.into_iter().map(Into::into).collect();
        if !ids.is_empty() {
            self.state.ids = ids;
        }
        self
    }

    /// Request extra fields on the result set. An empty list is a no-op.
    pub fn include<I, S>(mut self, inclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let inclusions: Vec<String> = inclusions.into_iter().map(Into::into).collect();
        if !inclusions.is_empty() {
            self.state.include = inclusions;
        }
        self
    }

    /// Alias for [`QueryBuilder::offset`].
    pub fn skip(self, value: i64) -> Self {
        self.offset(value)
    }

    /// Set the offset, flooring negative input at 0.
    pub fn offset(mut self, value: i64) -> Self {
        self.state.offset = Some(value.max(0) as u64);
        self
    }

    /// Alias for [`QueryBuilder::limit`].
    pub fn take(self, value: i64) -> Self {
        self.limit(value)
    }

    /// Set the limit. Negative input is silently ignored, leaving any
    /// prior limit unchanged.
    pub fn limit(mut self, value: i64) -> Self {
        if value >= 0 {
            self.state.limit = Some(value as u64);
        }
        self
    }

    /// Set the window for a given page: offset `(page - 1) * per_page`,
    /// limit `per_page`. The only path that sets both together.
    pub fn for_page(mut self, page: u64, per_page: u64) -> Self {
        self.state.page = Some(page);
        self.skip((page.saturating_sub(1) * per_page) as i64)
            .take(per_page as i64)
    }

    /// Set the free-text search filter; an empty string clears it.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.state.search_text = if text.is_empty() { None } else { Some(text) };
        self
    }

    /// Merge a raw query fragment into the accumulated one.
    ///
    /// Later fragments augment earlier ones recursively; colliding
    /// array-valued leaves concatenate instead of overwriting.
    pub fn raw_query(mut self, fragment: Params) -> Self {
        quarry_core::deep_merge(&mut self.state.raw_query, fragment);
        self
    }

    /// Merge an aggregation fragment, with the same recursive semantics as
    /// [`QueryBuilder::raw_query`].
    pub fn aggregations(mut self, fragment: Params) -> Self {
        quarry_core::deep_merge(&mut self.state.aggregations, fragment);
        self
    }

    /// Override the cache lifetime for this builder's calls, in seconds.
    pub fn ttl(mut self, seconds: u64) -> Self {
        self.state.ttl = Some(seconds);
        self
    }

    /// Supply a value for a `{token}` placeholder in the endpoint path
    /// template.
    pub fn path_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.path_params.insert(key.into(), value.into());
        self
    }

    /// Install the resolver consulted when `paginate` is called without an
    /// explicit page (typically backed by the surrounding request context).
    pub fn page_resolver(
        mut self,
        resolver: impl Fn(&str) -> Option<u64> + Send + Sync + 'static,
    ) -> Self {
        self.page_resolver = Some(Arc::new(resolver));
        self
    }

    /// Filter by a set of values on a column.
    ///
    /// Only the `id` column is supported - the remote API exposes no
    /// general predicate filtering - and anything else fails immediately
    /// rather than being silently dropped.
    pub fn where_in<I, V>(self, column: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if column == "id" {
            Ok(self.ids(values))
        } else {
            Err(Error::UnsupportedFilter {
                column: column.to_string(),
            })
        }
    }

    /// Accepted and intentionally inert: no filter is applied.
    ///
    /// Kept callable so defensively written chains keep working, but this
    /// is a documented foot-gun - the predicate never reaches the remote
    /// API.
    pub fn where_eq(self, _column: &str, _value: impl Into<Value>) -> Self {
        self
    }

    /// Accepted and intentionally inert: no filter is applied. See
    /// [`QueryBuilder::where_eq`].
    pub fn where_not_in(self, _column: &str, _values: Vec<Value>) -> Self {
        self
    }
}

impl<T: DeserializeOwned> QueryBuilder<T> {
    /// Execute a GET query.
    ///
    /// `columns` applies only when no projection was set earlier and is
    /// restored after a successful call, so the builder can be reused with
    /// a different projection. `endpoint_type` picks the path template
    /// (default `"collection"`).
    pub async fn get(
        &mut self,
        columns: Option<Vec<String>>,
        endpoint_type: Option<&str>,
    ) -> Result<QueryOutcome<T>> {
        self.execute(columns, endpoint_type, Method::Get).await
    }

    /// Execute a POST query. Same result handling as [`QueryBuilder::get`].
    pub async fn post(
        &mut self,
        columns: Option<Vec<String>>,
        endpoint_type: Option<&str>,
    ) -> Result<QueryOutcome<T>> {
        self.execute(columns, endpoint_type, Method::Post).await
    }

    async fn execute(
        &mut self,
        columns: Option<Vec<String>>,
        endpoint_type: Option<&str>,
        verb: Method,
    ) -> Result<QueryOutcome<T>> {
        let original = self.state.columns.clone();
        if original.is_none() {
            self.state.columns = columns;
        }

        let response = self.run(endpoint_type, verb).await?;

        if !response.is_success() {
            // The projection override survives a failed call.
            return Ok(QueryOutcome::Raw(failure_body(response)?));
        }

        self.state.columns = original;

        let body = response
            .body
            .clone()
            .ok_or(Error::MalformedResponse("success response carried no body"))?;
        let data = body
            .get("data")
            .cloned()
            .ok_or(Error::MalformedResponse("response body has no `data` member"))?;

        // A single entity is coerced into a one-element sequence.
        let records: Vec<T> = match data {
            Value::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(Error::from))
                .collect::<Result<_>>()?,
            single => vec![serde_json::from_value(single)?],
        };

        self.pagination_data = body
            .get("pagination")
            .and_then(|block| serde_json::from_value(block.clone()).ok());

        let mut collection = ApiCollection::new(records);
        collection.set_metadata(metadata_from(&body, response));
        Ok(QueryOutcome::Collection(collection))
    }

    /// Paginate the query.
    ///
    /// `per_page` is required and must be positive. The page number is
    /// resolved explicit argument first, then the installed page resolver
    /// (keyed by `page_name`), then 1. The total prefers the pagination
    /// block captured from the response and falls back to the count of
    /// returned records - which under-counts whenever the API paginates
    /// server-side and the current page is not full. That fallback is
    /// long-standing, documented behavior; callers needing exact totals
    /// must rely on APIs that report one.
    pub async fn paginate(
        &mut self,
        per_page: Option<u64>,
        columns: Option<Vec<String>>,
        page_name: &str,
        page: Option<u64>,
    ) -> Result<PageOutcome<T>> {
        let per_page = per_page
            .filter(|size| *size > 0)
            .ok_or(Error::MissingArgument("per_page"))?;

        let page = page
            .or_else(|| {
                self.page_resolver
                    .as_ref()
                    .and_then(|resolver| resolver(page_name))
            })
            .unwrap_or(1);

        self.apply_page(page, per_page);

        match self.get(columns, None).await? {
            QueryOutcome::Collection(items) => {
                let total = self
                    .pagination_data
                    .as_ref()
                    .map(|data| data.total)
                    .unwrap_or(items.len() as u64);
                Ok(PageOutcome::Page(Page {
                    items,
                    total,
                    per_page,
                    current_page: page,
                }))
            }
            QueryOutcome::Raw(body) => Ok(PageOutcome::Raw(body)),
        }
    }

    fn apply_page(&mut self, page: u64, per_page: u64) {
        self.state.page = Some(page);
        self.state.offset = Some(page.saturating_sub(1) * per_page);
        self.state.limit = Some(per_page);
    }

    async fn run(&self, endpoint_type: Option<&str>, verb: Method) -> Result<ResponseEnvelope> {
        let path = self.endpoint.parse_endpoint(
            endpoint_type.unwrap_or(DEFAULT_ENDPOINT_TYPE),
            &self.path_params,
        )?;
        let params = self.grammar.compile_parameters(&self.state);

        match verb {
            Method::Get => self.connection.get(&path, &params, self.state.ttl).await,
            Method::Post => self.connection.post(&path, &params, self.state.ttl).await,
            other => Err(Error::UnsupportedVerb(other)),
        }
    }
}

impl QueryBuilder<Value> {
    /// Execute a GET query and wrap the entire body - not `body.data` -
    /// into a collection. For endpoints whose payload is not
    /// envelope-shaped.
    pub async fn get_raw(
        &mut self,
        columns: Option<Vec<String>>,
        endpoint_type: Option<&str>,
    ) -> Result<ApiCollection<Value>> {
        self.execute_raw(columns, endpoint_type, Method::Get).await
    }

    /// POST variant of [`QueryBuilder::get_raw`].
    pub async fn post_raw(
        &mut self,
        columns: Option<Vec<String>>,
        endpoint_type: Option<&str>,
    ) -> Result<ApiCollection<Value>> {
        self.execute_raw(columns, endpoint_type, Method::Post).await
    }

    async fn execute_raw(
        &mut self,
        columns: Option<Vec<String>>,
        endpoint_type: Option<&str>,
        verb: Method,
    ) -> Result<ApiCollection<Value>> {
        // Unlike `execute`, the projection override is never restored here.
        if self.state.columns.is_none() {
            self.state.columns = columns;
        }

        let response = self.run(endpoint_type, verb).await?;
        let body = response.body.clone().unwrap_or(Value::Null);

        let records = match body.clone() {
            Value::Array(items) => items,
            other => vec![other],
        };

        let mut collection = ApiCollection::new(records);
        collection.set_metadata(metadata_from(&body, response));
        Ok(collection)
    }
}

/// Body of a non-success response, or the serialized envelope when the
/// response carried none.
fn failure_body(mut response: ResponseEnvelope) -> Result<Value> {
    match response.body.take() {
        Some(body) => Ok(body),
        None => Ok(serde_json::to_value(&response)?),
    }
}

/// Side-channel blocks read from an envelope body (objects only; a
/// non-object body has none).
fn metadata_from(body: &Value, response: ResponseEnvelope) -> Metadata {
    Metadata {
        pagination: body.get("pagination").cloned(),
        aggregations: body.get("aggregations").cloned(),
        suggestions: body.get("suggest").cloned(),
        response: Some(response),
    }
}
