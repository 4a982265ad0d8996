//! The parameter grammar seam.

use crate::query::{Params, QueryState};

/// Compiles accumulated query intent into wire-format parameters.
///
/// A grammar is a pure function: deterministic, side-effect-free, and
/// swappable per endpoint, since a plain REST filter API and a
/// search-engine query body need very different compilations of the same
/// builder state.
pub trait Grammar: Send + Sync {
    fn compile_parameters(&self, state: &QueryState) -> Params;
}
