//! Span helpers for layer operations.

use std::future::Future;
use tracing::{info_span, Instrument, Span};

/// Span covering work on a single layer.
pub fn layer_span(layer_id: &str, name: &str) -> Span {
    info_span!("layer", id = %layer_id, name = %name)
}

/// Span covering one manager operation on a layer.
pub fn operation_span(operation: &'static str, layer_id: &str) -> Span {
    info_span!("layer_op", op = operation, id = %layer_id)
}

/// Instrument a future with a span.
pub fn instrument_future<F: Future>(future: F, span: Span) -> impl Future<Output = F::Output> {
    future.instrument(span)
}

/// Re-export of `tracing::instrument` for convenience.
pub use tracing::instrument;
