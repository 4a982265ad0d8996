//! The response transformer seam.

use crate::wire::ResponseEnvelope;

/// Reshapes a raw response envelope into the format the pipeline expects.
///
/// Exists so a connection can normalize a remote API's idiosyncratic
/// envelope before the builder inspects `body.data`.
pub trait Transformer: Send + Sync {
    fn transform(&self, response: ResponseEnvelope) -> ResponseEnvelope;
}

/// Passes the envelope through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransformer;

impl Transformer for IdentityTransformer {
    fn transform(&self, response: ResponseEnvelope) -> ResponseEnvelope {
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identity_returns_the_envelope_unchanged() {
        let envelope = ResponseEnvelope::with_body(200, json!({"data": []}));
        assert_eq!(IdentityTransformer.transform(envelope.clone()), envelope);
    }
}
