//! Scripted consumers for exercising the pipeline without a network stack.
//!
//! [`ScriptedConsumer`] returns queued envelopes in order and records every
//! call it receives, so tests can assert both what the pipeline sent and
//! how often the transport seam was actually crossed (the caching tests
//! depend on the latter).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::traits::{Consumer, TransportError};
use crate::wire::{Method, RequestOptions, ResponseEnvelope};

/// Record of one call that reached the scripted consumer.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub uri: String,
    pub options: RequestOptions,
}

/// Consumer that replays queued responses and records incoming calls.
///
/// When the queue is empty it answers with a `200` envelope carrying an
/// empty `data` list, so tests that only care about call recording do not
/// have to script anything.
#[derive(Clone, Default)]
pub struct ScriptedConsumer {
    responses: Arc<Mutex<VecDeque<Result<ResponseEnvelope, TransportError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an envelope to be returned by the next unanswered request.
    pub fn push_response(&self, response: ResponseEnvelope) {
        self.responses
            .lock()
            .expect("scripted consumer lock poisoned")
            .push_back(Ok(response));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) {
        self.responses
            .lock()
            .expect("scripted consumer lock poisoned")
            .push_back(Err(error));
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .expect("scripted consumer lock poisoned")
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .expect("scripted consumer lock poisoned")
            .len()
    }
}

#[async_trait]
impl Consumer for ScriptedConsumer {
    async fn request(
        &self,
        method: Method,
        uri: &str,
        options: &RequestOptions,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.calls
            .lock()
            .expect("scripted consumer lock poisoned")
            .push(RecordedCall {
                method,
                uri: uri.to_string(),
                options: options.clone(),
            });

        self.responses
            .lock()
            .expect("scripted consumer lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(ResponseEnvelope::with_body(200, json!({"data": []}))))
    }
}

/// Envelope-shaped success body around the given `data` value.
pub fn data_envelope(data: Value) -> ResponseEnvelope {
    ResponseEnvelope::with_body(200, json!({ "data": data }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_responses_in_order_and_records_calls() {
        let consumer = ScriptedConsumer::new();
        consumer.push_response(ResponseEnvelope::status(404));
        consumer.push_response(data_envelope(json!([{"id": 1}])));

        let options = RequestOptions::default();
        let first = consumer
            .request(Method::Get, "/items", &options)
            .await
            .unwrap();
        let second = consumer
            .request(Method::Post, "/items/search", &options)
            .await
            .unwrap();

        assert_eq!(first.status, 404);
        assert_eq!(second.status, 200);

        let calls = consumer.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, Method::Get);
        assert_eq!(calls[0].uri, "/items");
        assert_eq!(calls[1].method, Method::Post);
    }

    #[tokio::test]
    async fn empty_queue_answers_with_an_empty_data_list() {
        let consumer = ScriptedConsumer::new();
        let response = consumer
            .request(Method::Get, "/items", &RequestOptions::default())
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.body, Some(json!({"data": []})));
    }
}
