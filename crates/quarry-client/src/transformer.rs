//! Transformer selection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use quarry_core::{IdentityTransformer, Transformer};

/// Tag selecting a concrete transformer.
///
/// Connections configured without a transformer skip the transformation
/// step entirely; `Identity` exists for endpoints that want the step in
/// place (e.g. to be swapped later) without changing anything yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformerKind {
    Identity,
}

impl TransformerKind {
    pub fn create(self) -> Arc<dyn Transformer> {
        match self {
            Self::Identity => Arc::new(IdentityTransformer),
        }
    }
}
